use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use polarimeter::sqlite::store_posts;
use polarimeter::{
    analyze_forums, ErrorKind, Lexicon, PostSource, Processor, RawPost, SqlitePostSource,
};

fn temp_archive() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("archive.db");
    (temp_dir, path)
}

fn raw(i: i64, title: &str) -> RawPost {
    RawPost::new(format!("t3_{i}"), title)
        .with_author(format!("user{i}"))
        .with_score(i * 3)
        .with_comments(i as u64)
        .with_created_at(DateTime::<Utc>::from_timestamp(1_720_000_000 + i, 0).unwrap())
}

#[test]
fn test_process_from_archive() {
    let (_temp_dir, path) = temp_archive();
    let titles = [
        "What a great win for the city",
        "This is a terrible and corrupt decision",
        "The vote happens on Tuesday",
        "La noticia es muy buena para el pueblo",
    ];
    let posts: Vec<RawPost> = (0..20)
        .map(|i| raw(i, titles[i as usize % titles.len()]))
        .collect();
    store_posts(&path, "politics", &posts).unwrap();
    store_posts(&path, "quiet", &[]).unwrap();

    let mut processor = Processor::new(SqlitePostSource::new(&path));
    let analysis = processor.process("Politics", 10).unwrap();
    let stats = &analysis.statistics;
    assert_eq!(stats.total_posts, 10);
    assert_eq!(
        stats.positive_posts + stats.negative_posts + stats.neutral_posts,
        10
    );
    assert!(stats.positive_posts > 0);
    assert!(stats.negative_posts > 0);
    assert!(stats.polarization_score.unwrap() > 0.0);

    let spanish = processor.reaggregate(Some("es")).unwrap();
    assert!(spanish.total_posts > 0);
    assert!(spanish.total_posts < stats.total_posts);

    let err = processor.process("quiet", 10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptySample);
    assert_eq!(processor.statistics().unwrap().total_posts, 10);
}

#[test]
fn test_batch_over_archive() {
    let (_temp_dir, path) = temp_archive();
    store_posts(&path, "happy", &[raw(1, "love this great place"), raw(2, "what a wonderful day")]).unwrap();
    store_posts(&path, "angry", &[raw(3, "I hate this awful mess"), raw(4, "worst decision ever")]).unwrap();

    let source: Arc<dyn PostSource> = Arc::new(SqlitePostSource::new(&path));
    let forums = vec!["happy".to_string(), "angry".to_string(), "missing".to_string()];
    let reports = analyze_forums(source, &Lexicon::embedded(), &forums, 10, None, Some(2)).unwrap();

    assert_eq!(reports[0].result.as_ref().unwrap().statistics().positive_posts, 2);
    assert_eq!(reports[1].result.as_ref().unwrap().statistics().negative_posts, 2);
    assert_eq!(reports[2].result.as_ref().unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_archive_is_removed_with_its_directory() {
    let (temp_dir, path) = temp_archive();
    store_posts(&path, "rust", &[raw(1, "hello")]).unwrap();
    assert!(path.starts_with(temp_dir.path()));
    assert!(path.exists());

    drop(temp_dir);
    assert!(!path.exists());
}
