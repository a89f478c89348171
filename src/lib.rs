pub mod aggregate;
pub mod args;
pub mod batch;
pub mod error;
pub mod language;
pub mod lexicon;
pub mod polarization;
pub mod post;
pub mod processor;
pub mod report;
pub mod sentiment;
pub mod source;
pub mod sqlite;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use batch::{analyze_forums, ForumOutcome, ForumReport};
pub use error::{ErrorKind, ProcessError, ScoreError, SourceError};
pub use language::{LanguageDetector, StopwordDetector, UNKNOWN_LANGUAGE};
pub use lexicon::{init_default_lexicon, Lexicon};
pub use post::{Dataset, Post, RawPost, SentimentClass};
pub use processor::{Processor, SAMPLE_SIZE_RANGE};
pub use sentiment::{LexiconScorer, SentimentScorer, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
pub use source::{FixtureSource, PostSource};
pub use sqlite::SqlitePostSource;
pub use stats::{Analysis, Statistics};
