//! Where raw posts come from.
//!
//! The processor only depends on [`PostSource`]; live clients, the SQLite
//! archive and in-memory fixtures are interchangeable behind it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::SourceError;
use crate::post::RawPost;

/// Supplies up to `limit` raw posts for a named forum.
///
/// Retry and backoff, if any, belong to the implementation; the processor
/// calls `fetch` once per request.
pub trait PostSource: Send + Sync {
    /// At most `limit` posts. Fewer is fine when the forum has fewer.
    fn fetch(&self, forum: &str, limit: usize) -> Result<Vec<RawPost>, SourceError>;

    fn name(&self) -> &str;
}

impl<S: PostSource + ?Sized> PostSource for Arc<S> {
    fn fetch(&self, forum: &str, limit: usize) -> Result<Vec<RawPost>, SourceError> {
        (**self).fetch(forum, limit)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// In-memory source with canned posts per forum.
#[derive(Default)]
pub struct FixtureSource {
    forums: HashMap<String, Vec<RawPost>>,
    offline: AtomicBool,
    fetch_calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a forum with its posts (builder pattern).
    pub fn with_forum(mut self, forum: &str, posts: Vec<RawPost>) -> Self {
        self.forums.insert(forum.to_lowercase(), posts);
        self
    }

    /// While offline every fetch fails with [`SourceError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl PostSource for FixtureSource {
    fn fetch(&self, forum: &str, limit: usize) -> Result<Vec<RawPost>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("fixture source is offline".into()));
        }

        self.forums
            .get(&forum.to_lowercase())
            .map(|posts| posts.iter().take(limit).cloned().collect())
            .ok_or_else(|| SourceError::NotFound(forum.to_string()))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
