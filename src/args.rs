use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "polarimeter",
    about = "Measure how polarized the sentiment of a forum's posts is",
    version,
    long_about = None
)]
pub struct Args {
    /// Forums (subreddits) to analyze
    #[arg(default_value = "politics")]
    pub forums: Vec<String>,

    /// Number of posts to sample per forum (10-500)
    #[arg(short = 'n', long, default_value_t = 100)]
    pub sample_size: usize,

    /// Only report posts in this language (code like "es" or a name like "Spanish")
    #[arg(short, long)]
    pub language: Option<String>,

    /// Path to the post archive database
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to custom sentiment lexicon file
    #[arg(long)]
    pub lexicon: Option<PathBuf>,

    /// Import a JSON array of posts into the archive under the given forum, then exit
    #[arg(long)]
    pub import: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Show a histogram of compound sentiment scores
    #[arg(long)]
    pub histogram: bool,

    /// Number of highest-scored posts to display
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Redact author names for privacy
    #[arg(long)]
    pub redact: bool,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize lexicon.txt with the default lexicon
    #[arg(long)]
    pub init: bool,
}
