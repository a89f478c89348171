use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};

/// Discrete sentiment bucket of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentClass {
    Positive,
    Neutral,
    Negative,
}

impl SentimentClass {
    /// Fixed banding: `> 0.05` positive, `< -0.05` negative, otherwise neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound > POSITIVE_THRESHOLD {
            SentimentClass::Positive
        } else if compound < NEGATIVE_THRESHOLD {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClass::Positive => "Positive",
            SentimentClass::Neutral => "Neutral",
            SentimentClass::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post as delivered by a source, before language and sentiment are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    /// `None` marks a malformed record; it is still kept, with neutral sentiment.
    pub title: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    pub created_at: DateTime<Utc>,
}

impl RawPost {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            author: String::new(),
            score: 0,
            num_comments: 0,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_comments(mut self, num_comments: u64) -> Self {
        self.num_comments = num_comments;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A fully scored post. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: String,
    title: String,
    author: String,
    score: i64,
    num_comments: u64,
    created_at: DateTime<Utc>,
    language: String,
    sentiment_compound: f64,
    sentiment_class: SentimentClass,
}

impl Post {
    /// The class is always derived here, so it can never disagree with the compound.
    pub fn scored(raw: RawPost, language: String, compound: f64) -> Self {
        let compound = if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            author: raw.author,
            score: raw.score,
            num_comments: raw.num_comments,
            created_at: raw.created_at,
            language,
            sentiment_compound: compound,
            sentiment_class: SentimentClass::from_compound(compound),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn num_comments(&self) -> u64 {
        self.num_comments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn sentiment_compound(&self) -> f64 {
        self.sentiment_compound
    }

    pub fn sentiment_class(&self) -> SentimentClass {
        self.sentiment_class
    }

    /// Cells in [`Dataset::COLUMNS`] order.
    pub fn row(&self) -> [String; 9] {
        [
            self.id.clone(),
            self.title.clone(),
            self.author.clone(),
            self.score.to_string(),
            self.created_at.to_rfc3339(),
            self.num_comments.to_string(),
            self.language.clone(),
            format!("{:.4}", self.sentiment_compound),
            self.sentiment_class.to_string(),
        ]
    }
}

/// Scored sample of one forum. Immutable after the scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    posts: Vec<Post>,
}

impl Dataset {
    pub const COLUMNS: [&'static str; 9] = [
        "id",
        "title",
        "author",
        "score",
        "createdAt",
        "numComments",
        "language",
        "sentimentCompound",
        "sentimentClass",
    ];

    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    /// Posts tagged with exactly `language`, or every post when no filter is given.
    pub fn filtered<'a>(&'a self, language: Option<&'a str>) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts
            .iter()
            .filter(move |post| language.map_or(true, |code| post.language == code))
    }

    pub fn rows(&self) -> Vec<[String; 9]> {
        self.posts.iter().map(Post::row).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(lang: &str, compound: f64) -> Post {
        Post::scored(RawPost::new("id", "title"), lang.to_string(), compound)
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(SentimentClass::from_compound(0.05), SentimentClass::Neutral);
        assert_eq!(SentimentClass::from_compound(-0.05), SentimentClass::Neutral);
        assert_eq!(SentimentClass::from_compound(0.0501), SentimentClass::Positive);
        assert_eq!(SentimentClass::from_compound(-0.0501), SentimentClass::Negative);
        assert_eq!(SentimentClass::from_compound(1.0), SentimentClass::Positive);
        assert_eq!(SentimentClass::from_compound(-1.0), SentimentClass::Negative);
    }

    #[test]
    fn test_scored_post_class_follows_compound() {
        for i in -100..=100 {
            let compound = i as f64 / 100.0;
            let p = post("en", compound);
            assert_eq!(
                p.sentiment_class(),
                SentimentClass::from_compound(p.sentiment_compound())
            );
        }
    }

    #[test]
    fn test_compound_is_clamped() {
        let p = post("en", 3.0);
        assert_eq!(p.sentiment_compound(), 1.0);
        assert_eq!(p.sentiment_class(), SentimentClass::Positive);
    }

    #[test]
    fn test_non_finite_compound_is_neutral() {
        let p = post("en", f64::NAN);
        assert_eq!(p.sentiment_compound(), 0.0);
        assert_eq!(p.sentiment_class(), SentimentClass::Neutral);
    }

    #[test]
    fn test_missing_title_becomes_empty() {
        let mut raw = RawPost::new("x", "ignored");
        raw.title = None;
        let p = Post::scored(raw, "und".into(), 0.0);
        assert_eq!(p.title(), "");
    }

    #[test]
    fn test_row_matches_columns() {
        let raw = RawPost::new("abc", "Hello")
            .with_author("someone")
            .with_score(-3)
            .with_comments(7);
        let row = Post::scored(raw, "en".into(), 0.8).row();
        assert_eq!(row.len(), Dataset::COLUMNS.len());
        assert_eq!(row[0], "abc");
        assert_eq!(row[3], "-3");
        assert_eq!(row[5], "7");
        assert_eq!(row[6], "en");
        assert_eq!(row[7], "0.8000");
        assert_eq!(row[8], "Positive");
    }

    #[test]
    fn test_filtered_exact_match() {
        let ds = Dataset::new(vec![post("en", 0.1), post("es", 0.1), post("en", 0.1)]);
        assert_eq!(ds.filtered(Some("en")).count(), 2);
        assert_eq!(ds.filtered(Some("EN")).count(), 0);
        assert_eq!(ds.filtered(None).count(), 3);
    }
}
