#![allow(dead_code)]
//! Test fixtures: in-memory and failing store implementations
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use scheduler_service::config::SchedulerConfig;
use scheduler_service::db::{SchedulerStore, SharedStore};
use scheduler_service::error::{StoreError, StoreResult};
use scheduler_service::models::{
    AuditEntry, FeedbackHistoryRow, FeedbackRecord, Item, ModelParams, NewItem,
};
use scheduler_service::services::SchedulerService;

pub const ADMIN_TOKEN: &str = "secret";

#[derive(Default)]
struct State {
    items: Vec<Item>,
    feedback: Vec<FeedbackRecord>,
    params: HashMap<String, ModelParams>,
    audit: Vec<AuditEntry>,
    calls: Vec<String>,
    next_item_id: i64,
}

/// Store backed by process memory; records every call as "op:table"
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_feedback_insert: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback inserts fail, everything else works
    pub fn failing_feedback_insert() -> Self {
        Self {
            fail_feedback_insert: true,
            ..Self::default()
        }
    }

    pub fn add_item(&self, title: &str, summary: Option<&str>, created_at: DateTime<Utc>) {
        self.state.lock().unwrap().items.push(Item {
            title: Some(title.to_string()),
            summary: summary.map(String::from),
            created_at,
            source: Some("rss".to_string()),
        });
    }

    pub fn add_feedback(
        &self,
        account: &str,
        likes: u64,
        followers: u64,
        content_type: &str,
        posted_at: DateTime<Utc>,
    ) {
        self.state.lock().unwrap().feedback.push(FeedbackRecord {
            account: account.to_string(),
            post_id: format!("seed-{}", posted_at.timestamp()),
            likes,
            comments: 0,
            saves: 0,
            reach: followers,
            followers: Some(followers),
            content_type: Some(content_type.to_string()),
            engagement_score: likes as f64 / followers as f64,
            posted_at,
        });
    }

    pub fn set_params(&self, params: ModelParams) {
        self.state
            .lock()
            .unwrap()
            .params
            .insert(params.account.clone(), params);
    }

    pub fn params(&self, account: &str) -> Option<ModelParams> {
        self.state.lock().unwrap().params.get(account).cloned()
    }

    pub fn audit(&self) -> Vec<AuditEntry> {
        self.state.lock().unwrap().audit.clone()
    }

    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        self.state.lock().unwrap().feedback.clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: &str) {
        self.state.lock().unwrap().calls.push(call.to_string());
    }
}

#[async_trait]
impl SchedulerStore for InMemoryStore {
    async fn recent_items(&self, limit: i64) -> StoreResult<Vec<Item>> {
        self.record("select:items");
        let mut items = self.state.lock().unwrap().items.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn feedback_history(
        &self,
        account: &str,
        limit: i64,
    ) -> StoreResult<Vec<FeedbackHistoryRow>> {
        self.record("select:posts_feedback");
        let mut rows: Vec<FeedbackRecord> = self
            .state
            .lock()
            .unwrap()
            .feedback
            .iter()
            .filter(|f| f.account == account)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        rows.truncate(limit.max(0) as usize);

        Ok(rows
            .into_iter()
            .map(|f| FeedbackHistoryRow {
                likes: f.likes as i64,
                comments: f.comments as i64,
                saves: f.saves as i64,
                followers: f.followers.map(|v| v as i64),
                content_type: f.content_type,
                posted_at: Some(f.posted_at.to_rfc3339()),
            })
            .collect())
    }

    async fn get_model_params(&self, account: &str) -> StoreResult<Option<ModelParams>> {
        self.record("select:scheduler_model_params");
        Ok(self.params(account))
    }

    async fn upsert_model_params(&self, params: &ModelParams) -> StoreResult<()> {
        self.record("upsert:scheduler_model_params");
        self.set_params(params.clone());
        Ok(())
    }

    async fn insert_feedback(&self, record: &FeedbackRecord) -> StoreResult<()> {
        self.record("insert:posts_feedback");
        if self.fail_feedback_insert {
            return Err(StoreError::Query("relation \"posts_feedback\" does not exist".into()));
        }
        self.state.lock().unwrap().feedback.push(record.clone());
        Ok(())
    }

    async fn insert_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        self.record("insert:scheduler_model_audit");
        self.state.lock().unwrap().audit.push(entry.clone());
        Ok(())
    }

    async fn insert_item(&self, item: &NewItem) -> StoreResult<Option<i64>> {
        self.record("insert:items");
        let mut state = self.state.lock().unwrap();
        state.next_item_id += 1;
        let id = state.next_item_id;
        state.items.push(Item {
            title: Some(item.title.clone()),
            summary: item.summary.clone(),
            created_at: Utc::now(),
            source: Some(item.source.clone()),
        });
        Ok(Some(id))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Store whose every call fails as unreachable
pub struct FailingStore;

fn unreachable_store<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".into()))
}

#[async_trait]
impl SchedulerStore for FailingStore {
    async fn recent_items(&self, _limit: i64) -> StoreResult<Vec<Item>> {
        unreachable_store()
    }

    async fn feedback_history(
        &self,
        _account: &str,
        _limit: i64,
    ) -> StoreResult<Vec<FeedbackHistoryRow>> {
        unreachable_store()
    }

    async fn get_model_params(&self, _account: &str) -> StoreResult<Option<ModelParams>> {
        unreachable_store()
    }

    async fn upsert_model_params(&self, _params: &ModelParams) -> StoreResult<()> {
        unreachable_store()
    }

    async fn insert_feedback(&self, _record: &FeedbackRecord) -> StoreResult<()> {
        unreachable_store()
    }

    async fn insert_audit(&self, _entry: &AuditEntry) -> StoreResult<()> {
        unreachable_store()
    }

    async fn insert_item(&self, _item: &NewItem) -> StoreResult<Option<i64>> {
        unreachable_store()
    }

    async fn ping(&self) -> StoreResult<()> {
        unreachable_store()
    }
}

pub fn settings() -> SchedulerConfig {
    SchedulerConfig {
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..SchedulerConfig::default()
    }
}

pub fn service_with(store: Arc<InMemoryStore>) -> SchedulerService {
    let shared: SharedStore = store;
    SchedulerService::new(Some(shared), settings())
}

pub fn storeless_service() -> SchedulerService {
    SchedulerService::new(None, settings())
}

pub fn failing_service() -> SchedulerService {
    let shared: SharedStore = Arc::new(FailingStore);
    SchedulerService::new(Some(shared), settings())
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}
