use sqlx::PgPool;
use tracing::info;

use crate::error::StoreResult;

/// Ensure the scheduler tables exist.
///
/// Lazily created at startup when `DB_ENSURE_SCHEMA` is set, for environments
/// where migrations have not been applied yet.
pub async fn ensure_scheduler_tables(pool: &PgPool) -> StoreResult<()> {
    info!("Ensuring scheduler tables exist");

    for ddl in [
        ITEMS_TABLE,
        POSTS_FEEDBACK_TABLE,
        POSTS_FEEDBACK_INDEX,
        MODEL_PARAMS_TABLE,
        MODEL_AUDIT_TABLE,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    Ok(())
}

const ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id BIGSERIAL PRIMARY KEY,
    source TEXT DEFAULT 'manual',
    title TEXT,
    url TEXT,
    summary TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const POSTS_FEEDBACK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts_feedback (
    id BIGSERIAL PRIMARY KEY,
    account TEXT NOT NULL,
    post_id TEXT NOT NULL,
    likes BIGINT NOT NULL DEFAULT 0,
    comments BIGINT NOT NULL DEFAULT 0,
    saves BIGINT NOT NULL DEFAULT 0,
    reach BIGINT NOT NULL DEFAULT 0,
    followers BIGINT,
    content_type TEXT,
    engagement_score DOUBLE PRECISION NOT NULL DEFAULT 0,
    posted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const POSTS_FEEDBACK_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_posts_feedback_account_posted_at
    ON posts_feedback (account, posted_at DESC)
"#;

const MODEL_PARAMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS scheduler_model_params (
    account TEXT PRIMARY KEY,
    w_engagement DOUBLE PRECISION NOT NULL DEFAULT 0.6,
    w_relevance DOUBLE PRECISION NOT NULL DEFAULT 0.4,
    learning_rate DOUBLE PRECISION NOT NULL DEFAULT 0.05,
    updated_at TIMESTAMPTZ DEFAULT NOW()
)
"#;

const MODEL_AUDIT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS scheduler_model_audit (
    id BIGSERIAL PRIMARY KEY,
    account TEXT NOT NULL,
    prev_w_engagement DOUBLE PRECISION,
    prev_w_relevance DOUBLE PRECISION,
    new_w_engagement DOUBLE PRECISION NOT NULL,
    new_w_relevance DOUBLE PRECISION NOT NULL,
    learning_rate DOUBLE PRECISION NOT NULL,
    updated_by TEXT NOT NULL,
    source TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;
