/// Scheduler Service
///
/// Operation surface of the engine. Every operation except the manual
/// weights override fails open: store problems degrade to heuristics,
/// defaults or empty results and are logged.
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::audit::AuditRecorder;
use super::engagement::{best_bucket, engagement_score};
use super::generator::{ContentGenerator, TemplateGenerator};
use super::heuristic::heuristic_next_post;
use super::learner::OnlineLearner;
use super::priority::combine;
use super::relevance::{score_text, topical_relevance};
use super::trends::fetch_trends;
use super::weights::WeightStore;
use crate::config::SchedulerConfig;
use crate::db::{SchedulerStore, SharedStore};
use crate::error::{Result, StoreError, StoreResult};
use crate::models::{
    AutoGenerateRequest, AutoGenerateResult, FeedbackOutcome, FeedbackRecord, FeedbackRequest,
    GenerateRequest, GeneratedContent, ItemInsertOutcome, NewItem, ParamsSource, RunDailyRequest,
    ScheduleRecommendation, TextScore, TrendEntry, WeightsResponse, WeightsUpdateOutcome,
    WeightsUpdateRequest,
};
use crate::utils::round_to;

/// Source tag for items written by auto-generation
pub const GENERATED_ITEM_SOURCE: &str = "scheduler";

pub const STORE_UNAVAILABLE: &str = "store_unavailable";

#[derive(Clone)]
pub struct SchedulerService {
    store: Option<SharedStore>,
    generator: Arc<dyn ContentGenerator>,
    settings: SchedulerConfig,
}

impl SchedulerService {
    /// `store = None` runs the engine storeless (heuristics and defaults only)
    pub fn new(store: Option<SharedStore>, settings: SchedulerConfig) -> Self {
        Self {
            store,
            generator: Arc::new(TemplateGenerator::new()),
            settings,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn settings(&self) -> &SchedulerConfig {
        &self.settings
    }

    /// Trimmed `account`, or the configured default when missing or blank
    pub fn account_or_default(&self, account: Option<&str>) -> String {
        account
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(self.settings.default_account.as_str())
            .to_string()
    }

    pub fn store(&self) -> Option<&dyn SchedulerStore> {
        self.store.as_deref()
    }

    /// Recommend the next publication for `account`.
    ///
    /// Uses the best (format, hour) bucket of the account's history blended
    /// with topical relevance; falls back to the daily heuristic when there
    /// is no store, no history, or the history cannot be read.
    pub async fn next_post(&self, account: &str) -> ScheduleRecommendation {
        let default_topic = self.settings.default_topic.as_str();

        let Some(store) = self.store() else {
            debug!(account = %account, "No store configured, using heuristic");
            return heuristic_next_post(account, default_topic);
        };

        let topic = self
            .latest_title(store)
            .await
            .unwrap_or_else(|| default_topic.to_string());

        let history = match store
            .feedback_history(account, self.settings.history_limit)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(account = %account, error = %e, "Failed to load feedback history, using heuristic");
                return heuristic_next_post(account, &topic);
            }
        };

        let Some(best) = best_bucket(&history) else {
            debug!(account = %account, "No feedback history, using heuristic");
            return heuristic_next_post(account, &topic);
        };

        let top_relevance = topical_relevance(Some(store), &topic).await;
        let params = WeightStore::new(Some(store)).get_params(account).await.params;
        let priority = combine(&params, best.mean_score, top_relevance);

        ScheduleRecommendation {
            account: account.to_string(),
            recommended_time: best.hour_label,
            content_type: best.content_type,
            topic,
            priority,
        }
    }

    async fn latest_title(&self, store: &dyn SchedulerStore) -> Option<String> {
        match store.recent_items(1).await {
            Ok(items) => items
                .into_iter()
                .next()
                .and_then(|item| item.title)
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to load latest item title");
                None
            }
        }
    }

    /// Score and store feedback, then run one learner update.
    ///
    /// The learner runs whenever a store is configured, even if the feedback
    /// insert itself failed. `status` is "ok" only when the row was stored.
    pub async fn record_feedback(&self, request: &FeedbackRequest) -> FeedbackOutcome {
        let engagement = engagement_score(
            request.likes as f64,
            request.comments as f64,
            request.saves as f64,
            request.followers.unwrap_or(0) as f64,
        );
        let rounded = round_to(engagement, 4);

        let Some(store) = self.store() else {
            warn!(account = %request.account, "No store configured, feedback not stored");
            return FeedbackOutcome {
                status: "error".to_string(),
                stored: false,
                engagement_score: rounded,
            };
        };

        let record = FeedbackRecord {
            account: request.account.clone(),
            post_id: request.post_id.clone(),
            likes: request.likes,
            comments: request.comments,
            saves: request.saves,
            reach: request.reach,
            followers: request.followers,
            content_type: request
                .content_type
                .as_deref()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty()),
            engagement_score: engagement,
            posted_at: Utc::now(),
        };

        let stored = match store.insert_feedback(&record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    account = %record.account,
                    post_id = %record.post_id,
                    error = %e,
                    "Failed to store feedback"
                );
                false
            }
        };

        OnlineLearner::new(store, &self.settings.default_topic)
            .learn(&record.account, engagement)
            .await;

        FeedbackOutcome {
            status: if stored { "ok" } else { "error" }.to_string(),
            stored,
            engagement_score: rounded,
        }
    }

    pub async fn trends(&self, limit: usize) -> Vec<TrendEntry> {
        fetch_trends(self.store(), limit).await
    }

    /// Current weights for `account`, tagged with how they were obtained
    pub async fn get_weights(&self, account: &str) -> WeightsResponse {
        let lookup = WeightStore::new(self.store()).get_params(account).await;
        let params = lookup.params;

        let (message, error) = match lookup.source {
            ParamsSource::Stored => (None, None),
            ParamsSource::Defaults => (
                Some("No stored params for account, returning defaults".to_string()),
                None,
            ),
            ParamsSource::Unavailable => (
                Some("Store unavailable, returning defaults".to_string()),
                Some(STORE_UNAVAILABLE.to_string()),
            ),
        };

        WeightsResponse {
            account: account.to_string(),
            w_engagement: params.w_engagement,
            w_relevance: params.w_relevance,
            learning_rate: params.learning_rate,
            updated_at: params.updated_at,
            message,
            error,
        }
    }

    /// Manual override; the only operation that can fail
    pub async fn update_weights(
        &self,
        request: &WeightsUpdateRequest,
        token: Option<&str>,
    ) -> Result<WeightsUpdateOutcome> {
        AuditRecorder::new(self.store(), self.settings.admin_token.as_deref())
            .update_weights(request, token)
            .await
    }

    /// Recommend, generate copy for the recommended topic, and store it as
    /// an item (best-effort).
    pub async fn auto_generate(&self, request: &AutoGenerateRequest) -> AutoGenerateResult {
        let account = self.account_or_default(request.account.as_deref());
        let scheduled = self.next_post(&account).await;

        let content = self.generator.generate(&GenerateRequest {
            topic: scheduled.topic.clone(),
            account: Some(account),
            brand_voice: request.brand_voice.clone(),
            keywords: request.keywords.clone(),
            length: Some(
                request
                    .length
                    .unwrap_or(self.settings.default_generate_length),
            ),
        });

        let item = NewItem {
            source: GENERATED_ITEM_SOURCE.to_string(),
            title: scheduled.topic.clone(),
            url: None,
            summary: Some(content.text.clone()),
        };
        let item_id = self.store_item(&item).await;

        info!(
            account = %scheduled.account,
            content_type = %scheduled.content_type,
            recommended_time = %scheduled.recommended_time,
            item_id = ?item_id,
            "Auto-generated content"
        );

        AutoGenerateResult {
            scheduled,
            content,
            item_id,
        }
    }

    /// [`Self::auto_generate`] for each account, in order
    pub async fn run_daily(&self, request: &RunDailyRequest) -> Vec<AutoGenerateResult> {
        let accounts = match &request.accounts {
            Some(accounts) => accounts.clone(),
            None => vec![self.settings.default_account.clone()],
        };
        let mut results = Vec::with_capacity(accounts.len());

        for account in accounts {
            let result = self
                .auto_generate(&AutoGenerateRequest {
                    account: Some(account),
                    brand_voice: request.brand_voice.clone(),
                    keywords: request.keywords.clone(),
                    length: request.length,
                })
                .await;
            results.push(result);
        }

        results
    }

    /// Generate copy without scheduling or storing anything
    pub fn generate(&self, request: &GenerateRequest) -> GeneratedContent {
        self.generator.generate(request)
    }

    /// Store an item supplied by a caller
    pub async fn insert_item(&self, item: &NewItem) -> ItemInsertOutcome {
        match self.try_store_item(item).await {
            Ok(inserted_id) => ItemInsertOutcome {
                status: "ok".to_string(),
                inserted_id,
            },
            Err(_) => ItemInsertOutcome {
                status: "error".to_string(),
                inserted_id: None,
            },
        }
    }

    pub fn score_text(&self, text: &str, context: Option<&str>) -> TextScore {
        score_text(text, context)
    }

    async fn store_item(&self, item: &NewItem) -> Option<i64> {
        self.try_store_item(item).await.ok().flatten()
    }

    async fn try_store_item(&self, item: &NewItem) -> StoreResult<Option<i64>> {
        let store = self
            .store()
            .ok_or_else(|| StoreError::Unavailable("no store configured".to_string()))?;

        store.insert_item(item).await.map_err(|e| {
            warn!(title = %item.title, error = %e, "Failed to store item");
            e
        })
    }
}
