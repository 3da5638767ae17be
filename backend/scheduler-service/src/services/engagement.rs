/// Engagement Aggregator
///
/// Scores feedback rows and finds the best-performing (format, hour) bucket
/// in an account's recent history.
use chrono::{Local, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::models::FeedbackHistoryRow;
use crate::utils::{mean, parse_timestamp};

/// Format assumed for history rows without one
pub const DEFAULT_CONTENT_TYPE: &str = "reel";

/// Hour bucket for rows whose timestamp cannot be parsed
pub const DEFAULT_HOUR_LABEL: &str = "18:00";

/// `(likes + 2·comments + 0.5·saves) / followers`, 0.0 without followers.
///
/// Unbounded above.
pub fn engagement_score(likes: f64, comments: f64, saves: f64, followers: f64) -> f64 {
    if followers <= 0.0 {
        return 0.0;
    }
    (likes + 2.0 * comments + 0.5 * saves) / followers
}

pub fn score_history_row(row: &FeedbackHistoryRow) -> f64 {
    engagement_score(
        row.likes as f64,
        row.comments as f64,
        row.saves as f64,
        row.followers.unwrap_or(0) as f64,
    )
}

/// Local "HH:00" label for a row's post time.
///
/// Rows without a timestamp count as posted now.
pub fn hour_label(posted_at: Option<&str>) -> String {
    match posted_at {
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.with_timezone(&Local).format("%H:00").to_string(),
            None => DEFAULT_HOUR_LABEL.to_string(),
        },
        None => Utc::now().with_timezone(&Local).format("%H:00").to_string(),
    }
}

/// Winning (content_type, hour) bucket
#[derive(Debug, Clone, PartialEq)]
pub struct BestBucket {
    pub content_type: String,
    pub hour_label: String,
    pub mean_score: f64,
    pub samples: usize,
}

/// Group rows by (content_type, hour) and pick the highest mean score.
///
/// Returns `None` for an empty history. On equal means the first bucket
/// encountered in row order wins, so for history sorted newest first the
/// most recently used bucket is preferred.
pub fn best_bucket(rows: &[FeedbackHistoryRow]) -> Option<BestBucket> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut buckets: HashMap<(String, String), Vec<f64>> = HashMap::new();

    for row in rows {
        let ctype = row
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_lowercase();
        let key = (ctype, hour_label(row.posted_at.as_deref()));

        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(score_history_row(row));
    }

    let mut best: Option<BestBucket> = None;
    for key in order {
        let scores = &buckets[&key];
        let avg = mean(scores);
        if best.as_ref().map_or(true, |b| avg > b.mean_score) {
            best = Some(BestBucket {
                content_type: key.0,
                hour_label: key.1,
                mean_score: avg,
                samples: scores.len(),
            });
        }
    }

    if let Some(b) = &best {
        debug!(
            content_type = %b.content_type,
            hour = %b.hour_label,
            mean_score = b.mean_score,
            samples = b.samples,
            "Best engagement bucket selected"
        );
    }

    best
}
