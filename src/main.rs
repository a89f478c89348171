use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::error;

use polarimeter::{
    analyze_forums, init_default_lexicon, lexicon, report, sqlite, utils, Args, PostSource,
    SqlitePostSource,
};

fn run(args: &Args) -> Result<bool> {
    let archive = sqlite::get_archive_path(args.db.as_deref())?;

    if let Some(import_path) = &args.import {
        let forum = &args.forums[0];
        let count = sqlite::import_json(&archive, forum, import_path)?;
        println!(
            "Imported {} posts into r/{} ({})",
            utils::format_number(count as i64),
            forum,
            archive.display()
        );
        return Ok(true);
    }

    let lexicon =
        lexicon::load_lexicon(args.lexicon.as_deref()).context("Failed to load lexicon")?;
    let language = args.language.as_deref().map(utils::resolve_language);
    let source: Arc<dyn PostSource> = Arc::new(SqlitePostSource::new(archive));

    let reports = analyze_forums(
        source,
        &lexicon,
        &args.forums,
        args.sample_size,
        language.as_deref(),
        args.workers,
    )?;

    if args.json {
        let document = report::reports_to_json(&reports, language.as_deref(), args.redact);
        println!(
            "{}",
            serde_json::to_string_pretty(&document).context("Failed to render JSON")?
        );
    } else {
        for forum_report in &reports {
            match &forum_report.result {
                Ok(outcome) => report::print_analysis_results(outcome, args, language.as_deref()),
                Err(e) => println!("\n--- r/{} ---\nError: {}", forum_report.forum, e),
            }
        }
    }

    for forum_report in &reports {
        if let Err(e) = &forum_report.result {
            error!(action = "analyze", component = "main", forum = %forum_report.forum, kind = ?e.kind(), error = %e, "Forum analysis failed");
        }
    }

    Ok(reports.iter().any(|r| r.result.is_ok()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    if args.init {
        let path = init_default_lexicon()?;
        println!("Created {} with the default lexicon", path.display());
        return Ok(());
    }

    utils::validate_args(&args)?;

    match run(&args) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!(action = "run", component = "main", error = %e, "Error");
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
