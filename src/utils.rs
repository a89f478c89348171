use time::macros::format_description;
use time::UtcOffset;
use tracing::debug;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

use crate::language;
use crate::processor::SAMPLE_SIZE_RANGE;

/// Install the tracing subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Local offset is unavailable on some platforms once threads exist
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(
        offset,
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        debug!(action = "setup", component = "logging", error = %e, "Subscriber already installed, keeping it");
    }
}

pub fn format_number(num: i64) -> String {
    let digits = num.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",");

    if num < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn redact_author(author: &str) -> String {
    let mut chars = author.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let rest = chars.count();
            if rest == 0 {
                "*".to_string()
            } else {
                format!("{}{}", first, "*".repeat(rest))
            }
        }
    }
}

/// Accept an ISO code ("es") or a display name ("Spanish", "Espanhol").
pub fn resolve_language(input: &str) -> String {
    language::code_for_name(input)
        .map(str::to_string)
        .unwrap_or_else(|| input.trim().to_lowercase())
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if !SAMPLE_SIZE_RANGE.contains(&args.sample_size) {
        anyhow::bail!(
            "--sample-size must be between {} and {}",
            SAMPLE_SIZE_RANGE.start(),
            SAMPLE_SIZE_RANGE.end()
        );
    }

    if let Some(top) = args.top {
        if top == 0 {
            anyhow::bail!("--top must be greater than 0");
        }
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    if args.import.is_some() && args.forums.len() != 1 {
        anyhow::bail!("--import needs exactly one forum name");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use clap::Parser;

    #[test]
    fn test_setup_logging_twice_keeps_first_subscriber() {
        setup_logging(false);
        setup_logging(true);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-45210), "-45,210");
    }

    #[test]
    fn test_redact_author() {
        assert_eq!(redact_author(""), "");
        assert_eq!(redact_author("a"), "*");
        assert_eq!(redact_author("someone"), "s******");
        assert_eq!(redact_author("ferris"), "f*****");
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language("Spanish"), "es");
        assert_eq!(resolve_language("Português"), "pt");
        assert_eq!(resolve_language(" EN "), "en");
    }

    #[test]
    fn test_validate_args() {
        let ok = Args::parse_from(["polarimeter", "rust", "-n", "50"]);
        assert!(validate_args(&ok).is_ok());
        assert_eq!(ok.forums, ["rust"]);

        let defaults = Args::parse_from(["polarimeter"]);
        assert_eq!(defaults.forums, ["politics"]);
        assert_eq!(defaults.sample_size, 100);

        let small = Args::parse_from(["polarimeter", "-n", "5"]);
        assert!(validate_args(&small).is_err());

        let zero_top = Args::parse_from(["polarimeter", "--top", "0"]);
        assert!(validate_args(&zero_top).is_err());

        let import_many = Args::parse_from(["polarimeter", "a", "b", "--import", "x.json"]);
        assert!(validate_args(&import_many).is_err());
    }
}
