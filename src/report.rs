use serde_json::{json, Value};

use crate::args::Args;
use crate::batch::{ForumOutcome, ForumReport};
use crate::post::{Dataset, Post};
use crate::stats::Statistics;
use crate::utils::{format_number, redact_author};

pub const HISTOGRAM_BINS: usize = 20;
const HISTOGRAM_WIDTH: usize = 40;

/// Counts of compound scores in `HISTOGRAM_BINS` equal-width bins over `[-1, 1]`.
pub fn sentiment_histogram<'a>(posts: impl IntoIterator<Item = &'a Post>) -> [usize; HISTOGRAM_BINS] {
    let mut bins = [0; HISTOGRAM_BINS];
    for post in posts {
        let position = (post.sentiment_compound() + 1.0) / 2.0 * HISTOGRAM_BINS as f64;
        let index = (position.floor().max(0.0) as usize).min(HISTOGRAM_BINS - 1);
        bins[index] += 1;
    }
    bins
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.*}", precision, v))
}

fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        "0.0%".to_string()
    } else {
        format!("{:.1}%", count as f64 * 100.0 / total as f64)
    }
}

pub fn print_statistics(stats: &Statistics) {
    println!("\n--- r/{} Sentiment Analysis ---", stats.forum_name);

    if let Some(language) = &stats.language_filter {
        println!("Language filter: {}", language);
        if !stats.has_data() {
            println!("No posts found in the selected language.");
        }
    }

    let total = stats.total_posts;
    println!("Total posts: {}", format_number(total as i64));
    println!("Average score: {}", format_optional(stats.avg_score, 2));
    println!("Average comments: {}", format_optional(stats.avg_comments, 2));
    println!("Average sentiment: {}", format_optional(stats.avg_sentiment, 4));
    println!(
        "Positive posts: {} ({})",
        format_number(stats.positive_posts as i64),
        percentage(stats.positive_posts, total)
    );
    println!(
        "Negative posts: {} ({})",
        format_number(stats.negative_posts as i64),
        percentage(stats.negative_posts, total)
    );
    println!(
        "Neutral posts: {} ({})",
        format_number(stats.neutral_posts as i64),
        percentage(stats.neutral_posts, total)
    );
    println!("Polarization: {}", format_optional(stats.polarization_score, 4));
}

pub fn print_histogram(bins: &[usize; HISTOGRAM_BINS]) {
    let max = bins.iter().copied().max().unwrap_or(0);
    println!("\nSentiment histogram:");
    for (i, count) in bins.iter().enumerate() {
        let low = -1.0 + 2.0 * i as f64 / HISTOGRAM_BINS as f64;
        let high = low + 2.0 / HISTOGRAM_BINS as f64;
        let width = if max == 0 { 0 } else { count * HISTOGRAM_WIDTH / max };
        println!("[{:+.1}, {:+.1}) {:>4} {}", low, high, count, "#".repeat(width));
    }
}

pub fn print_top_posts(dataset: &Dataset, language: Option<&str>, top_count: usize, redact: bool) {
    // Sort posts by upvotes
    let mut sorted: Vec<&Post> = dataset.filtered(language).collect();
    sorted.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.id().cmp(b.id())));

    println!(
        "\nTop {} highest-scored posts:",
        std::cmp::min(top_count, sorted.len())
    );
    for post in sorted.iter().take(top_count) {
        let author = if redact {
            redact_author(post.author())
        } else {
            post.author().to_string()
        };
        println!(
            "- [{} {:+.4}] {} (by {}, {} points, {} comments)",
            post.sentiment_class(),
            post.sentiment_compound(),
            post.title(),
            author,
            format_number(post.score()),
            format_number(post.num_comments() as i64)
        );
    }
}

pub fn print_analysis_results(outcome: &ForumOutcome, args: &Args, language: Option<&str>) {
    print_statistics(outcome.statistics());

    let dataset = &outcome.analysis.dataset;
    if args.histogram {
        print_histogram(&sentiment_histogram(dataset.filtered(language)));
    }

    if let Some(top_count) = args.top {
        print_top_posts(dataset, language, top_count, args.redact);
    }
}

/// JSON document for all reports: statistics, dataset rows and errors.
pub fn reports_to_json(reports: &[ForumReport], language: Option<&str>, redact: bool) -> Value {
    let entries: Vec<Value> = reports
        .iter()
        .map(|report| match &report.result {
            Ok(outcome) => {
                let rows: Vec<Value> = outcome
                    .analysis
                    .dataset
                    .filtered(language)
                    .map(|post| {
                        let mut row = post.row();
                        if redact {
                            row[2] = redact_author(&row[2]);
                        }
                        Value::Object(
                            Dataset::COLUMNS
                                .iter()
                                .zip(row)
                                .map(|(column, cell)| (column.to_string(), Value::String(cell)))
                                .collect(),
                        )
                    })
                    .collect();
                json!({
                    "forum": report.forum,
                    "statistics": outcome.statistics().to_map(),
                    "dataset": rows,
                })
            }
            Err(e) => json!({
                "forum": report.forum,
                "error": format!("{:?}", e.kind()),
                "message": e.to_string(),
            }),
        })
        .collect();
    Value::Array(entries)
}
