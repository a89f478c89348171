use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::post::Dataset;

/// Aggregate snapshot over a dataset or a language-filtered view of it.
///
/// Means and the polarization score are `None` when `total_posts == 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub forum_name: String,
    pub total_posts: usize,
    pub avg_score: Option<f64>,
    pub avg_comments: Option<f64>,
    pub avg_sentiment: Option<f64>,
    pub positive_posts: usize,
    pub negative_posts: usize,
    pub neutral_posts: usize,
    pub polarization_score: Option<f64>,
    #[serde(skip)]
    pub language_filter: Option<String>,
}

impl Statistics {
    /// Key/value view with the keys downstream reports read.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            other => {
                debug_assert!(false, "statistics did not serialize to an object: {other:?}");
                warn!(action = "serialize", component = "statistics", forum = self.forum_name.as_str(), "Statistics did not serialize to an object");
                Map::new()
            }
        }
    }

    pub fn has_data(&self) -> bool {
        self.total_posts > 0
    }
}

/// A dataset together with the statistics computed from it.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: Arc<Dataset>,
    pub statistics: Statistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keys_and_sentinels() {
        let stats = Statistics {
            forum_name: "rust".into(),
            total_posts: 0,
            avg_score: None,
            avg_comments: None,
            avg_sentiment: None,
            positive_posts: 0,
            negative_posts: 0,
            neutral_posts: 0,
            polarization_score: None,
            language_filter: Some("es".into()),
        };
        let map = stats.to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        for key in [
            "forumName",
            "totalPosts",
            "avgScore",
            "avgComments",
            "avgSentiment",
            "positivePosts",
            "negativePosts",
            "neutralPosts",
            "polarizationScore",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(map.len(), 9);
        assert_eq!(map["polarizationScore"], Value::Null);
        assert_eq!(map["forumName"], Value::from("rust"));
    }

    #[test]
    fn test_map_is_populated_for_real_statistics() {
        let stats = Statistics {
            forum_name: "rust".into(),
            total_posts: 4,
            avg_score: Some(12.5),
            avg_comments: Some(f64::NAN),
            avg_sentiment: Some(0.1),
            positive_posts: 2,
            negative_posts: 1,
            neutral_posts: 1,
            polarization_score: Some(0.5625),
            language_filter: None,
        };
        let map = stats.to_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map["totalPosts"], Value::from(4));
        assert_eq!(map["avgComments"], Value::Null);
        assert_eq!(map["polarizationScore"], Value::from(0.5625));
    }
}
