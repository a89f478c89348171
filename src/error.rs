//! Typed errors for the analysis pipeline.

use thiserror::Error;

/// Failures reported by a [`crate::source::PostSource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network, auth or storage failure reaching the source
    #[error("post source unavailable: {0}")]
    Unavailable(String),

    /// The named forum does not exist
    #[error("forum not found: {0}")]
    NotFound(String),
}

/// Failures that abort a whole `process` call.
///
/// None of these leave a partially built dataset behind; the processor keeps
/// whatever result it held before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("could not reach the post source for r/{forum}: {reason}")]
    SourceUnavailable { forum: String, reason: String },

    #[error("r/{forum} does not exist")]
    NotFound { forum: String },

    #[error("r/{forum} returned no posts")]
    EmptySample { forum: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Error category without payload, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SourceUnavailable,
    NotFound,
    EmptySample,
    InvalidRequest,
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            ProcessError::NotFound { .. } => ErrorKind::NotFound,
            ProcessError::EmptySample { .. } => ErrorKind::EmptySample,
            ProcessError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    pub(crate) fn from_source(forum: &str, err: SourceError) -> Self {
        match err {
            SourceError::Unavailable(reason) => ProcessError::SourceUnavailable {
                forum: forum.to_string(),
                reason,
            },
            SourceError::NotFound(_) => ProcessError::NotFound {
                forum: forum.to_string(),
            },
        }
    }
}

/// Per-post scoring failure. Never escapes the processor: the post is
/// degraded to a neutral score instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    #[error("text is malformed: {0}")]
    Malformed(String),

    #[error("score is not finite: {0}")]
    NonFinite(f64),
}

/// Errors while loading a sentiment lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("lexicon file not found: {0}")]
    NotFound(String),

    #[error("invalid lexicon entry at line {line}: {reason}")]
    InvalidEntry { line: usize, reason: String },

    #[error("lexicon.txt already exists. Remove it first if you want to reinitialize.")]
    AlreadyExists,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
