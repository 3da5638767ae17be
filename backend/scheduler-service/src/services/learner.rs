/// Online Learner
///
/// Single-step gradient update of an account's blend weights, run once per
/// feedback event. The observed engagement is both a feature and the label.
///
/// The read-compute-upsert sequence is not conditional: concurrent updates
/// for the same account race and the last upsert wins.
use tracing::{info, warn};

use super::relevance::{build_corpus, relevance, CORPUS_ITEMS, NEUTRAL_RELEVANCE};
use super::weights::WeightStore;
use crate::db::SchedulerStore;
use crate::models::ModelParams;
use crate::utils::clip;

/// One gradient step followed by normalization and clipping.
///
/// Returns `(w_engagement, w_relevance)`.
pub fn update_weights(
    w_engagement: f64,
    w_relevance: f64,
    learning_rate: f64,
    engagement: f64,
    top_relevance: f64,
) -> (f64, f64) {
    let predicted = w_engagement * engagement + w_relevance * top_relevance;
    let err = engagement - predicted;

    let w_e = w_engagement + learning_rate * err * engagement;
    let w_r = w_relevance + learning_rate * err * top_relevance;

    let sum = w_e + w_r;
    let norm = if sum == 0.0 { 1.0 } else { sum };

    (clip(w_e / norm, 0.0, 1.0), clip(w_r / norm, 0.0, 1.0))
}

pub struct OnlineLearner<'a> {
    store: &'a dyn SchedulerStore,
    default_topic: &'a str,
}

impl<'a> OnlineLearner<'a> {
    pub fn new(store: &'a dyn SchedulerStore, default_topic: &'a str) -> Self {
        Self {
            store,
            default_topic,
        }
    }

    /// Apply one update for `engagement` and persist it.
    ///
    /// Never fails; returns the persisted params when the whole pipeline
    /// succeeded.
    pub async fn learn(&self, account: &str, engagement: f64) -> Option<ModelParams> {
        let weights = WeightStore::new(Some(self.store));
        let current = weights.get_params(account).await.params;

        let top_relevance = self.top_relevance().await;

        let (w_e, w_r) = update_weights(
            current.w_engagement,
            current.w_relevance,
            current.learning_rate,
            engagement,
            top_relevance,
        );

        let written = weights
            .put_params(account, w_e, w_r, current.learning_rate)
            .await;

        match &written {
            Some(params) => info!(
                account = %account,
                engagement,
                top_relevance,
                w_engagement = params.w_engagement,
                w_relevance = params.w_relevance,
                "Updated learned weights"
            ),
            None => warn!(account = %account, "Learned weights were not persisted"),
        }

        written
    }

    /// Relevance of the newest item title against the recent-item corpus
    async fn top_relevance(&self) -> f64 {
        match self.store.recent_items(CORPUS_ITEMS).await {
            Ok(items) => {
                let topic = items
                    .first()
                    .and_then(|item| item.title.as_deref())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(self.default_topic);
                relevance(topic, &build_corpus(&items))
            }
            Err(e) => {
                warn!(error = %e, "Failed to load items for learner, using neutral relevance");
                NEUTRAL_RELEVANCE
            }
        }
    }
}
