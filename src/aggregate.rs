use crate::post::{Post, SentimentClass};
use crate::stats::Statistics;

#[derive(Debug, Default)]
struct Totals {
    count: usize,
    score: f64,
    comments: f64,
    sentiment: f64,
    positive: usize,
    negative: usize,
    neutral: usize,
}

/// Reduce scored posts into descriptive statistics.
///
/// Buckets come from each post's stored class. `polarization_score` is left
/// `None`; [`crate::polarization::compute`] fills it in.
pub fn reduce<'a, I>(forum_name: &str, posts: I) -> Statistics
where
    I: IntoIterator<Item = &'a Post>,
{
    let totals = posts.into_iter().fold(Totals::default(), |mut acc, post| {
        acc.count += 1;
        acc.score += post.score() as f64;
        acc.comments += post.num_comments() as f64;
        acc.sentiment += post.sentiment_compound();
        match post.sentiment_class() {
            SentimentClass::Positive => acc.positive += 1,
            SentimentClass::Negative => acc.negative += 1,
            SentimentClass::Neutral => acc.neutral += 1,
        }
        acc
    });

    let mean = |sum: f64| (totals.count > 0).then(|| sum / totals.count as f64);

    Statistics {
        forum_name: forum_name.to_string(),
        total_posts: totals.count,
        avg_score: mean(totals.score),
        avg_comments: mean(totals.comments),
        avg_sentiment: mean(totals.sentiment),
        positive_posts: totals.positive,
        negative_posts: totals.negative,
        neutral_posts: totals.neutral,
        polarization_score: None,
        language_filter: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::RawPost;

    fn post(score: i64, comments: u64, compound: f64) -> Post {
        let raw = RawPost::new("id", "t").with_score(score).with_comments(comments);
        Post::scored(raw, "en".into(), compound)
    }

    #[test]
    fn test_empty_input_has_no_means() {
        let stats = reduce("rust", &Vec::<Post>::new());
        assert_eq!(stats.total_posts, 0);
        assert_eq!(stats.avg_score, None);
        assert_eq!(stats.avg_comments, None);
        assert_eq!(stats.avg_sentiment, None);
        assert_eq!(stats.positive_posts + stats.negative_posts + stats.neutral_posts, 0);
    }

    #[test]
    fn test_means_and_buckets() {
        let posts = vec![post(10, 4, 0.5), post(-2, 0, -0.5), post(1, 2, 0.0)];
        let stats = reduce("rust", &posts);
        assert_eq!(stats.forum_name, "rust");
        assert_eq!(stats.total_posts, 3);
        assert_eq!(stats.avg_score, Some(3.0));
        assert_eq!(stats.avg_comments, Some(2.0));
        assert_eq!(stats.avg_sentiment, Some(0.0));
        assert_eq!(stats.positive_posts, 1);
        assert_eq!(stats.negative_posts, 1);
        assert_eq!(stats.neutral_posts, 1);
        assert_eq!(stats.polarization_score, None);
    }

    #[test]
    fn test_bucket_sum_matches_total() {
        let posts: Vec<Post> = (0..97)
            .map(|i| post(i, i as u64, ((i * 37) % 201 - 100) as f64 / 100.0))
            .collect();
        let stats = reduce("rust", &posts);
        assert_eq!(
            stats.positive_posts + stats.negative_posts + stats.neutral_posts,
            stats.total_posts
        );
    }

    #[test]
    fn test_reduce_is_repeatable() {
        let posts = vec![post(3, 1, 0.3), post(5, 9, -0.9)];
        assert_eq!(reduce("rust", &posts), reduce("rust", &posts));
    }
}
