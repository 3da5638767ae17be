/// Store access layer
///
/// The engine consumes the store only through [`SchedulerStore`]. The
/// composition root decides which implementation (if any) is injected.
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::models::{AuditEntry, FeedbackHistoryRow, FeedbackRecord, Item, ModelParams, NewItem};

pub use postgres::PgSchedulerStore;
pub use schema::ensure_scheduler_tables;

/// Table-like operations the scheduler needs from persistent storage.
///
/// Implement this trait to plug the engine into another backend.
#[async_trait]
pub trait SchedulerStore: Send + Sync {
    /// Most recently created items, newest first
    async fn recent_items(&self, limit: i64) -> StoreResult<Vec<Item>>;

    /// Feedback rows for an account, most recent post first
    async fn feedback_history(
        &self,
        account: &str,
        limit: i64,
    ) -> StoreResult<Vec<FeedbackHistoryRow>>;

    async fn get_model_params(&self, account: &str) -> StoreResult<Option<ModelParams>>;

    /// Insert-or-replace keyed by account
    async fn upsert_model_params(&self, params: &ModelParams) -> StoreResult<()>;

    async fn insert_feedback(&self, record: &FeedbackRecord) -> StoreResult<()>;

    async fn insert_audit(&self, entry: &AuditEntry) -> StoreResult<()>;

    /// Returns the new item id when the backend reports one
    async fn insert_item(&self, item: &NewItem) -> StoreResult<Option<i64>>;

    /// Cheap connectivity probe
    async fn ping(&self) -> StoreResult<()>;
}

pub type SharedStore = Arc<dyn SchedulerStore>;

#[cfg(test)]
mockall::mock! {
    pub Store {}

    #[async_trait]
    impl SchedulerStore for Store {
        async fn recent_items(&self, limit: i64) -> StoreResult<Vec<Item>>;
        async fn feedback_history(&self, account: &str, limit: i64) -> StoreResult<Vec<FeedbackHistoryRow>>;
        async fn get_model_params(&self, account: &str) -> StoreResult<Option<ModelParams>>;
        async fn upsert_model_params(&self, params: &ModelParams) -> StoreResult<()>;
        async fn insert_feedback(&self, record: &FeedbackRecord) -> StoreResult<()>;
        async fn insert_audit(&self, entry: &AuditEntry) -> StoreResult<()>;
        async fn insert_item(&self, item: &NewItem) -> StoreResult<Option<i64>>;
        async fn ping(&self) -> StoreResult<()>;
    }
}
