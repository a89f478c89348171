use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::aggregate;
use crate::error::ProcessError;
use crate::language::{LanguageDetector, StopwordDetector};
use crate::polarization;
use crate::post::{Dataset, Post, RawPost};
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::source::PostSource;
use crate::stats::{Analysis, Statistics};

/// Accepted `sample_size` values for [`Processor::process`].
pub const SAMPLE_SIZE_RANGE: RangeInclusive<usize> = 10..=500;

/// Drives fetch → detect → score → aggregate → polarize and keeps the
/// latest successful result.
///
/// The stored analysis is only replaced once a `process` call has fully
/// succeeded; a failed call leaves the previous dataset and statistics in place.
pub struct Processor {
    source: Box<dyn PostSource>,
    detector: Box<dyn LanguageDetector>,
    scorer: Box<dyn SentimentScorer>,
    current: Option<Arc<Analysis>>,
}

impl Processor {
    pub fn new(source: impl PostSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn PostSource>) -> Self {
        Self {
            source,
            detector: Box::new(StopwordDetector::new()),
            scorer: Box::new(LexiconScorer::default()),
            current: None,
        }
    }

    pub fn with_scorer(mut self, scorer: impl SentimentScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_detector(mut self, detector: impl LanguageDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Fetch and score a fresh sample of `forum`, replacing the stored result.
    pub fn process(
        &mut self,
        forum: &str,
        sample_size: usize,
    ) -> Result<Arc<Analysis>, ProcessError> {
        let total_start_time = Instant::now();
        let forum = validate_request(forum, sample_size)?;
        info!(action = "start", component = "processor", forum = forum, sample_size, source = self.source.name(), "Starting forum analysis");

        let raw_posts = self.source.fetch(forum, sample_size).map_err(|e| {
            warn!(action = "fetch", component = "processor", forum = forum, error = %e, "Post source failed");
            ProcessError::from_source(forum, e)
        })?;

        if raw_posts.is_empty() {
            warn!(action = "fetch", component = "processor", forum = forum, "Post source returned no posts");
            return Err(ProcessError::EmptySample {
                forum: forum.to_string(),
            });
        }

        let scoring_start = Instant::now();
        let posts: Vec<Post> = raw_posts
            .into_iter()
            .take(sample_size)
            .map(|raw| self.score_post(raw))
            .collect();
        info!(
            action = "score",
            component = "processor",
            post_count = posts.len(),
            duration_ms = scoring_start.elapsed().as_millis(),
            "Scored posts"
        );

        let dataset = Arc::new(Dataset::new(posts));
        let statistics = polarization::apply(aggregate::reduce(forum, dataset.iter()));
        let analysis = Arc::new(Analysis {
            dataset,
            statistics,
        });

        // Nothing above touched `current`, so a failure can never half-replace it
        self.current = Some(Arc::clone(&analysis));

        info!(
            action = "complete",
            component = "processor",
            forum = forum,
            total_posts = analysis.statistics.total_posts,
            polarization = ?analysis.statistics.polarization_score,
            duration_ms = total_start_time.elapsed().as_millis(),
            "Analysis completed successfully"
        );
        Ok(analysis)
    }

    /// Recompute statistics over the stored dataset, optionally restricted to
    /// one language. Returns `None` only when nothing has been processed yet.
    pub fn reaggregate(&self, language_filter: Option<&str>) -> Option<Statistics> {
        let analysis = self.current.as_ref()?;
        Some(reaggregate(analysis, language_filter))
    }

    pub fn analysis(&self) -> Option<Arc<Analysis>> {
        self.current.clone()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.current.as_deref().map(|a| a.dataset.as_ref())
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.current.as_deref().map(|a| &a.statistics)
    }

    fn score_post(&self, raw: RawPost) -> Post {
        let (language, compound) = match raw.title.as_deref() {
            None => {
                warn!(action = "score", component = "processor", post_id = %raw.id, "Post has no title, scoring as neutral");
                (self.detector.detect(""), 0.0)
            }
            Some(title) => {
                let compound = self.scorer.score(title).unwrap_or_else(|e| {
                    warn!(action = "score", component = "processor", post_id = %raw.id, error = %e, "Sentiment scoring failed, scoring as neutral");
                    0.0
                });
                (self.detector.detect(title), compound)
            }
        };
        Post::scored(raw, language, compound)
    }
}

/// Aggregate + polarize an existing analysis without fetching or rescoring.
pub fn reaggregate(analysis: &Analysis, language_filter: Option<&str>) -> Statistics {
    let forum = &analysis.statistics.forum_name;
    let mut statistics =
        polarization::apply(aggregate::reduce(forum, analysis.dataset.filtered(language_filter)));
    statistics.language_filter = language_filter.map(str::to_string);
    info!(
        action = "reaggregate",
        component = "processor",
        forum = forum.as_str(),
        language = language_filter.unwrap_or("*"),
        total_posts = statistics.total_posts,
        "Re-aggregated statistics"
    );
    statistics
}

fn validate_request(forum: &str, sample_size: usize) -> Result<&str, ProcessError> {
    let forum = forum.trim();
    if forum.is_empty() {
        return Err(ProcessError::InvalidRequest {
            reason: "forum name must not be blank".into(),
        });
    }
    if !SAMPLE_SIZE_RANGE.contains(&sample_size) {
        return Err(ProcessError::InvalidRequest {
            reason: format!(
                "sample size {} outside {}..={}",
                sample_size,
                SAMPLE_SIZE_RANGE.start(),
                SAMPLE_SIZE_RANGE.end()
            ),
        });
    }
    Ok(forum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::FixtureSource;

    fn raw(i: usize, title: &str) -> RawPost {
        RawPost::new(format!("p{i}"), title).with_score(i as i64)
    }

    fn processor(posts: Vec<RawPost>) -> Processor {
        Processor::new(FixtureSource::new().with_forum("rust", posts))
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let mut p = processor(vec![raw(0, "hello")]);
        for (forum, size) in [("", 50), ("   ", 50), ("rust", 9), ("rust", 501), ("rust", 0)] {
            let err = p.process(forum, size).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{forum:?}/{size}");
        }
        assert!(p.analysis().is_none());
    }

    #[test]
    fn test_accepts_range_bounds() {
        let mut p = processor(vec![raw(0, "hello world")]);
        assert!(p.process("rust", 10).is_ok());
        assert!(p.process("rust", 500).is_ok());
    }

    #[test]
    fn test_forum_name_is_trimmed() {
        let mut p = processor(vec![raw(0, "hello world")]);
        let analysis = p.process("  rust ", 10).unwrap();
        assert_eq!(analysis.statistics.forum_name, "rust");
    }

    #[test]
    fn test_untitled_post_degrades_to_neutral() {
        let mut untitled = raw(1, "");
        untitled.title = None;
        let mut p = processor(vec![raw(0, "What a great and wonderful day"), untitled]);
        let analysis = p.process("rust", 10).unwrap();
        let posts = analysis.dataset.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].sentiment_compound(), 0.0);
        assert_eq!(posts[1].language(), crate::language::UNKNOWN_LANGUAGE);
        assert_eq!(analysis.statistics.neutral_posts, 1);
        assert_eq!(analysis.statistics.positive_posts, 1);
    }

    #[test]
    fn test_malformed_text_degrades_to_neutral() {
        let mut p = processor(vec![raw(0, "great\u{0007}news"), raw(1, "terrible news")]);
        let analysis = p.process("rust", 10).unwrap();
        assert_eq!(analysis.dataset.posts()[0].sentiment_compound(), 0.0);
        assert_eq!(analysis.statistics.total_posts, 2);
        assert_eq!(analysis.statistics.negative_posts, 1);
    }

    #[test]
    fn test_reaggregate_before_process_is_none() {
        let p = processor(vec![]);
        assert!(p.reaggregate(None).is_none());
    }

    #[test]
    fn test_accessors_are_consistent() {
        let mut p = processor(vec![raw(0, "good"), raw(1, "bad")]);
        let analysis = p.process("rust", 10).unwrap();
        assert_eq!(p.statistics(), Some(&analysis.statistics));
        assert_eq!(p.dataset().map(Dataset::len), Some(2));
    }
}
