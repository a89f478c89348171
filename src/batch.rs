use anyhow::{Context, Result};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::error::ProcessError;
use crate::lexicon::Lexicon;
use crate::processor::Processor;
use crate::sentiment::LexiconScorer;
use crate::source::PostSource;
use crate::stats::{Analysis, Statistics};

/// Outcome of analyzing one forum in a batch.
#[derive(Debug)]
pub struct ForumReport {
    pub forum: String,
    pub result: Result<ForumOutcome, ProcessError>,
}

#[derive(Debug)]
pub struct ForumOutcome {
    pub analysis: Arc<Analysis>,
    /// Statistics restricted to the requested language, when one was given.
    pub filtered: Option<Statistics>,
}

impl ForumOutcome {
    /// The statistics a caller should display: filtered if a filter was requested.
    pub fn statistics(&self) -> &Statistics {
        self.filtered.as_ref().unwrap_or(&self.analysis.statistics)
    }
}

/// Number of rayon workers: the requested count, or up to 8 CPUs.
pub fn worker_count(max_workers: Option<usize>) -> usize {
    max_workers.unwrap_or_else(|| {
        let cpu_count = num_cpus::get();
        std::cmp::min(cpu_count, 8)
    })
}

/// Analyze several forums in parallel, one [`Processor`] per forum.
///
/// Reports come back in the order of `forums`. A failing forum does not
/// affect the others.
pub fn analyze_forums(
    source: Arc<dyn PostSource>,
    lexicon: &Lexicon,
    forums: &[String],
    sample_size: usize,
    language: Option<&str>,
    max_workers: Option<usize>,
) -> Result<Vec<ForumReport>> {
    let start_time = Instant::now();
    let workers = worker_count(max_workers).max(1);
    info!(action = "configure", component = "batch", worker_count = workers, forum_count = forums.len(), "Using workers for forum analysis");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;

    let reports: Vec<ForumReport> = pool.install(|| {
        forums
            .par_iter()
            .map(|forum| {
                let mut processor = Processor::new(Arc::clone(&source))
                    .with_scorer(LexiconScorer::new(lexicon.clone()));
                let result = processor.process(forum, sample_size).map(|analysis| {
                    let filtered = language.and_then(|code| processor.reaggregate(Some(code)));
                    ForumOutcome { analysis, filtered }
                });
                ForumReport {
                    forum: forum.clone(),
                    result,
                }
            })
            .collect()
    });

    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    info!(
        action = "complete",
        component = "batch",
        forum_count = reports.len(),
        failed,
        duration_ms = start_time.elapsed().as_millis(),
        "Batch analysis completed"
    );
    Ok(reports)
}
