use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default learned weights for an account with no stored params
pub const DEFAULT_W_ENGAGEMENT: f64 = 0.6;
pub const DEFAULT_W_RELEVANCE: f64 = 0.4;
pub const DEFAULT_LEARNING_RATE: f64 = 0.05;

/// Publishing format recommended by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Reel,
    Carousel,
    Post,
    Story,
}

impl ContentFormat {
    /// Candidate order used by the heuristic fallback
    pub const ALL: [ContentFormat; 4] = [
        ContentFormat::Reel,
        ContentFormat::Carousel,
        ContentFormat::Post,
        ContentFormat::Story,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reel => "reel",
            Self::Carousel => "carousel",
            Self::Post => "post",
            Self::Story => "story",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Feedback for a published post, as submitted and stored.
///
/// Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub account: String,
    pub post_id: String,
    pub likes: u64,
    pub comments: u64,
    pub saves: u64,
    pub reach: u64,
    pub followers: Option<u64>,
    /// Lowercased publishing format, when the caller knows it
    pub content_type: Option<String>,
    pub engagement_score: f64,
    pub posted_at: DateTime<Utc>,
}

/// Historical feedback row as read back for bucketing.
///
/// `posted_at` is kept as the store's textual timestamp; rows whose
/// timestamp does not parse fall into the default hour bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackHistoryRow {
    pub likes: i64,
    pub comments: i64,
    pub saves: i64,
    pub followers: Option<i64>,
    pub content_type: Option<String>,
    pub posted_at: Option<String>,
}

/// Per-account learned blend weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModelParams {
    pub account: String,
    pub w_engagement: f64,
    pub w_relevance: f64,
    pub learning_rate: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ModelParams {
    pub fn defaults(account: &str) -> Self {
        Self {
            account: account.to_string(),
            w_engagement: DEFAULT_W_ENGAGEMENT,
            w_relevance: DEFAULT_W_RELEVANCE,
            learning_rate: DEFAULT_LEARNING_RATE,
            updated_at: None,
        }
    }
}

/// Append-only record of a manual weight override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub account: String,
    pub prev_w_engagement: f64,
    pub prev_w_relevance: f64,
    pub new_w_engagement: f64,
    pub new_w_relevance: f64,
    pub learning_rate: f64,
    pub updated_by: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Ingested content item, read-only for the engine
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub source: Option<String>,
}

/// Item written by auto-generation or a manual insert
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewItem {
    #[serde(default = "default_item_source")]
    pub source: String,
    #[validate(length(min = 1, max = 512))]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

fn default_item_source() -> String {
    "manual".to_string()
}

/// Recommendation for the next publication of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecommendation {
    pub account: String,
    /// Local time, "HH:MM"
    pub recommended_time: String,
    pub content_type: String,
    pub topic: String,
    pub priority: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub topic: String,
    pub momentum: f64,
}

/// Outcome of a feedback submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    /// "ok" when the feedback row was stored, "error" otherwise
    pub status: String,
    pub stored: bool,
    pub engagement_score: f64,
}

/// How a weights lookup was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsSource {
    Stored,
    Defaults,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct ParamsLookup {
    pub params: ModelParams,
    pub source: ParamsSource,
}

/// Weights view returned by GetWeights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsResponse {
    pub account: String,
    pub w_engagement: f64,
    pub w_relevance: f64,
    pub learning_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    pub w_engagement: f64,
    pub w_relevance: f64,
}

/// Tolerance on `w_engagement + w_relevance` for a manual override
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.05;

/// Manual weight override
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeightsUpdateRequest {
    #[validate(length(min = 1, max = 128))]
    pub account: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub w_engagement: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub w_relevance: f64,
    #[validate(range(min = 0.001, max = 0.1))]
    pub learning_rate: f64,
}

/// Result of a manual weight override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsUpdateOutcome {
    pub status: String,
    pub account: String,
    pub previous_weights: WeightPair,
    pub new_weights: ModelParams,
    pub persisted: bool,
    pub audited: bool,
}

/// Input for the content generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub account: Option<String>,
    pub brand_voice: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub text: String,
    pub hashtags: Vec<String>,
    pub visual_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoGenerateResult {
    pub scheduled: ScheduleRecommendation,
    pub content: GeneratedContent,
    pub item_id: Option<i64>,
}

/// Advisory scoring of a free text against an optional context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextScore {
    pub relevance: f64,
    pub momentum: f64,
    pub roi_prediction: f64,
}

/// Feedback submitted for a published post
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 128))]
    pub account: String,
    #[validate(length(min = 1, max = 256))]
    pub post_id: String,
    pub likes: u64,
    pub comments: u64,
    pub saves: u64,
    pub reach: u64,
    /// Followers at the time of the post
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AutoGenerateRequest {
    /// Falls back to the configured default account
    #[serde(default)]
    #[validate(length(max = 128))]
    pub account: Option<String>,
    #[serde(default)]
    pub brand_voice: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RunDailyRequest {
    /// Omitted means just the configured default account
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub accounts: Option<Vec<String>>,
    #[serde(default)]
    pub brand_voice: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDailyResult {
    pub results: Vec<AutoGenerateResult>,
}

/// Outcome of a manual item insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInsertOutcome {
    pub status: String,
    pub inserted_id: Option<i64>,
}
