/// Trend Momentum Calculator
///
/// Weekly momentum per title topic: items created in the last 7 days against
/// the 7 days before that.
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::db::SchedulerStore;
use crate::models::{Item, TrendEntry};
use crate::utils::round_to;

/// Number of recent items scanned for trends
pub const TREND_ITEMS: i64 = 500;

/// Topic for items without a usable title
pub const GENERAL_TOPIC: &str = "General";

const CURRENT_WINDOW_DAYS: i64 = 7;
const PREVIOUS_WINDOW_DAYS: i64 = 14;

/// First two whitespace tokens of a title, or "General"
pub fn topic_of(title: Option<&str>) -> String {
    let tokens: Vec<&str> = title.unwrap_or("").split_whitespace().take(2).collect();
    if tokens.is_empty() {
        GENERAL_TOPIC.to_string()
    } else {
        tokens.join(" ")
    }
}

/// `current / max(1, previous)` when `current > 0`, else 0
pub fn momentum(current: u32, previous: u32) -> f64 {
    if current == 0 {
        return 0.0;
    }
    current as f64 / previous.max(1) as f64
}

/// Rank topics by momentum relative to `now`.
///
/// Ages are counted in whole days; items older than 14 days are ignored.
/// `limit` is raised to at least 1. Ties keep topics in alphabetical order.
pub fn compute_trends_at(items: &[Item], now: DateTime<Utc>, limit: usize) -> Vec<TrendEntry> {
    let mut counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();

    for item in items {
        let age_days = (now - item.created_at).num_days();
        let topic = topic_of(item.title.as_deref());

        if age_days <= CURRENT_WINDOW_DAYS {
            counts.entry(topic).or_default().0 += 1;
        } else if age_days <= PREVIOUS_WINDOW_DAYS {
            counts.entry(topic).or_default().1 += 1;
        }
    }

    let mut entries: Vec<TrendEntry> = counts
        .into_iter()
        .map(|(topic, (current, previous))| TrendEntry {
            topic,
            momentum: round_to(momentum(current, previous), 2),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.momentum
            .partial_cmp(&a.momentum)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(limit.max(1));

    entries
}

/// Trends over the most recent items in the store.
///
/// Never fails: no store or a store error yields an empty list.
pub async fn fetch_trends(store: Option<&dyn SchedulerStore>, limit: usize) -> Vec<TrendEntry> {
    let Some(store) = store else {
        return Vec::new();
    };

    match store.recent_items(TREND_ITEMS).await {
        Ok(items) => {
            let trends = compute_trends_at(&items, Utc::now(), limit);
            debug!(items = items.len(), topics = trends.len(), "Computed trends");
            trends
        }
        Err(e) => {
            warn!(error = %e, "Failed to load items for trends");
            Vec::new()
        }
    }
}
