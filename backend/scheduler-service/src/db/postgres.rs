use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use super::SchedulerStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{AuditEntry, FeedbackHistoryRow, FeedbackRecord, Item, ModelParams, NewItem};

const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3_000;

/// `posted_at` comes back as RFC 3339 text; ordering uses the column, not
/// the text alias.
const FEEDBACK_HISTORY_SQL: &str = r#"
    SELECT likes, comments, saves, followers, content_type,
           to_char(posted_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS posted_at
    FROM posts_feedback
    WHERE account = $1
    ORDER BY posts_feedback.posted_at DESC
    LIMIT $2
"#;

/// Postgres-backed store (items, posts_feedback, scheduler_model_params,
/// scheduler_model_audit)
#[derive(Clone)]
pub struct PgSchedulerStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgSchedulerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    async fn run<F, T>(&self, query: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(self.query_timeout, query).await {
            Ok(res) => res.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable(format!(
                "query timed out after {}ms",
                self.query_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl SchedulerStore for PgSchedulerStore {
    async fn recent_items(&self, limit: i64) -> StoreResult<Vec<Item>> {
        self.run(
            sqlx::query_as::<_, Item>(
                r#"
                SELECT title, summary, created_at, source
                FROM items
                ORDER BY created_at DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn feedback_history(
        &self,
        account: &str,
        limit: i64,
    ) -> StoreResult<Vec<FeedbackHistoryRow>> {
        self.run(
            sqlx::query_as::<_, FeedbackHistoryRow>(FEEDBACK_HISTORY_SQL)
            .bind(account)
            .bind(limit)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn get_model_params(&self, account: &str) -> StoreResult<Option<ModelParams>> {
        self.run(
            sqlx::query_as::<_, ModelParams>(
                r#"
                SELECT account, w_engagement, w_relevance, learning_rate, updated_at
                FROM scheduler_model_params
                WHERE account = $1
                LIMIT 1
                "#,
            )
            .bind(account)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn upsert_model_params(&self, params: &ModelParams) -> StoreResult<()> {
        self.run(
            sqlx::query(
                r#"
                INSERT INTO scheduler_model_params
                    (account, w_engagement, w_relevance, learning_rate, updated_at)
                VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
                ON CONFLICT (account) DO UPDATE SET
                    w_engagement = EXCLUDED.w_engagement,
                    w_relevance = EXCLUDED.w_relevance,
                    learning_rate = EXCLUDED.learning_rate,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(&params.account)
            .bind(params.w_engagement)
            .bind(params.w_relevance)
            .bind(params.learning_rate)
            .bind(params.updated_at)
            .execute(&self.pool),
        )
        .await
        .map(|_| ())
    }

    async fn insert_feedback(&self, record: &FeedbackRecord) -> StoreResult<()> {
        self.run(
            sqlx::query(
                r#"
                INSERT INTO posts_feedback
                    (account, post_id, likes, comments, saves, reach, followers,
                     content_type, engagement_score, posted_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(&record.account)
            .bind(&record.post_id)
            .bind(to_i64(record.likes))
            .bind(to_i64(record.comments))
            .bind(to_i64(record.saves))
            .bind(to_i64(record.reach))
            .bind(record.followers.map(to_i64))
            .bind(&record.content_type)
            .bind(record.engagement_score)
            .bind(record.posted_at)
            .execute(&self.pool),
        )
        .await
        .map(|_| ())
    }

    async fn insert_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        self.run(
            sqlx::query(
                r#"
                INSERT INTO scheduler_model_audit
                    (account, prev_w_engagement, prev_w_relevance, new_w_engagement,
                     new_w_relevance, learning_rate, updated_by, source, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&entry.account)
            .bind(entry.prev_w_engagement)
            .bind(entry.prev_w_relevance)
            .bind(entry.new_w_engagement)
            .bind(entry.new_w_relevance)
            .bind(entry.learning_rate)
            .bind(&entry.updated_by)
            .bind(&entry.source)
            .bind(entry.created_at)
            .execute(&self.pool),
        )
        .await
        .map(|_| ())
    }

    async fn insert_item(&self, item: &NewItem) -> StoreResult<Option<i64>> {
        self.run(
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO items (source, title, url, summary)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(&item.source)
            .bind(&item.title)
            .bind(&item.url)
            .bind(&item.summary)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.run(sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }
}

/// Counts are stored as BIGINT; saturate instead of wrapping
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
