//! Heuristic fallback when history or the store is unavailable
//!
//! Produces a deterministic recommendation per calendar day, so repeated
//! requests on the same day agree with each other even without data.
//!
//! Algorithm:
//! - Seed: `year * 1000 + day_of_year`
//! - Format: stable choice over reel/carousel/post/story seeded by `seed + weekday`
//! - Time: hour in 17..=20 and minute in {00, 30}, seeded by `seed + 3 * weekday`
//! - Priority: `clip(0.75 + weekday * 0.01, 0.75, 0.9)`
//!
//! Weekday counts from Monday = 0.

use chrono::{Datelike, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::models::{ContentFormat, ScheduleRecommendation};
use crate::utils::{clip, round_to};

/// Posting window, hours `[17, 21)`
const WINDOW_START_HOUR: u32 = 17;
const WINDOW_END_HOUR: u32 = 21;

fn day_seed(date: NaiveDate) -> u64 {
    (date.year() as i64 * 1000 + date.ordinal() as i64).max(0) as u64
}

/// Same seed always yields the same option
pub fn stable_choice<T: Copy>(options: &[T], seed: u64) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Some(options[rng.gen_range(0..options.len())])
}

/// Same seed always yields the same "HH:MM"
pub fn stable_time(seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let hour = rng.gen_range(WINDOW_START_HOUR..WINDOW_END_HOUR);
    let minute = rng.gen_range(0..2u32) * 30;
    format!("{:02}:{:02}", hour, minute)
}

/// Heuristic recommendation for a given local date
///
/// # Arguments
/// * `account` - Account the recommendation is for
/// * `topic` - Topic to carry through unchanged
/// * `date` - Local calendar date driving the seed
pub fn heuristic_for_date(account: &str, topic: &str, date: NaiveDate) -> ScheduleRecommendation {
    let seed = day_seed(date);
    let weekday = date.weekday().num_days_from_monday() as u64;

    let content_type = stable_choice(&ContentFormat::ALL, seed + weekday)
        .unwrap_or(ContentFormat::Reel)
        .to_string();
    let recommended_time = stable_time(seed + 3 * weekday);
    let priority = round_to(clip(0.75 + weekday as f64 * 0.01, 0.75, 0.9), 2);

    debug!(
        account = %account,
        content_type = %content_type,
        recommended_time = %recommended_time,
        "Heuristic recommendation"
    );

    ScheduleRecommendation {
        account: account.to_string(),
        recommended_time,
        content_type,
        topic: topic.to_string(),
        priority,
    }
}

/// Heuristic recommendation for today (local time)
pub fn heuristic_next_post(account: &str, topic: &str) -> ScheduleRecommendation {
    heuristic_for_date(account, topic, Local::now().date_naive())
}
