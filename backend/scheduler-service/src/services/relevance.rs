/// Topical Relevance Estimator
///
/// Token-overlap proxy between a candidate topic and recently ingested items.
/// Advisory only: every failure degrades to a neutral score.
use std::collections::HashSet;
use tracing::warn;

use crate::db::SchedulerStore;
use crate::models::{Item, TextScore};
use crate::utils::round_to;

/// Score returned when there is nothing to compare against
pub const NEUTRAL_RELEVANCE: f64 = 0.5;

/// Number of recent items forming the relevance corpus
pub const CORPUS_ITEMS: i64 = 20;

const EPSILON: f64 = 1e-6;

fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// `min(1, overlap / (|tokens(text)| + ε) · 2)`.
///
/// An empty context yields 0.0 here; the neutral default lives in
/// [`relevance`].
pub fn token_overlap(text: &str, context: &str) -> f64 {
    let text_tokens = token_set(text);
    let context_tokens = token_set(context);
    let overlap = text_tokens.intersection(&context_tokens).count() as f64;

    ((overlap / (text_tokens.len() as f64 + EPSILON)) * 2.0).min(1.0)
}

/// Relevance of `topic` against a prepared corpus, neutral when the corpus
/// is empty.
pub fn relevance(topic: &str, corpus: &str) -> f64 {
    if corpus.trim().is_empty() {
        return NEUTRAL_RELEVANCE;
    }
    token_overlap(topic, corpus)
}

/// Concatenate non-empty titles and summaries, newest item first
pub fn build_corpus(items: &[Item]) -> String {
    items
        .iter()
        .flat_map(|item| [item.title.as_deref(), item.summary.as_deref()])
        .flatten()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(" \n ")
}

/// Relevance of `topic` against the most recent items in the store.
///
/// Never fails: no store, an empty corpus, or a store error all give
/// [`NEUTRAL_RELEVANCE`].
pub async fn topical_relevance(store: Option<&dyn SchedulerStore>, topic: &str) -> f64 {
    let Some(store) = store else {
        return NEUTRAL_RELEVANCE;
    };

    match store.recent_items(CORPUS_ITEMS).await {
        Ok(items) => relevance(topic, &build_corpus(&items)),
        Err(e) => {
            warn!(error = %e, "Failed to load relevance corpus, using neutral score");
            NEUTRAL_RELEVANCE
        }
    }
}

/// Advisory scoring of a free text against an optional context.
///
/// Momentum rewards token diversity; ROI is a fixed 0.6/0.4 blend.
pub fn score_text(text: &str, context: Option<&str>) -> TextScore {
    let text = text.trim();
    let context = context.map(str::trim).unwrap_or("");

    let relevance = token_overlap(text, context);

    let unique = token_set(text).len() as f64;
    let total = text.split_whitespace().count().max(1) as f64;
    let momentum = (0.3 + 0.7 * (unique / total)).clamp(0.05, 1.0);

    let roi_prediction = round_to(0.6 * relevance + 0.4 * momentum, 4);

    TextScore {
        relevance: round_to(relevance, 4),
        momentum: round_to(momentum, 4),
        roi_prediction,
    }
}
