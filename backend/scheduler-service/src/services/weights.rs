/// Weight Store Accessor
///
/// Reads, lazily creates and writes per-account model parameters. Neither
/// operation ever returns an error: reads fall back to defaults and writes
/// report success as a flag.
use chrono::Utc;
use tracing::{debug, warn};

use crate::db::SchedulerStore;
use crate::models::{ModelParams, ParamsLookup, ParamsSource};

pub struct WeightStore<'a> {
    store: Option<&'a dyn SchedulerStore>,
}

impl<'a> WeightStore<'a> {
    pub fn new(store: Option<&'a dyn SchedulerStore>) -> Self {
        Self { store }
    }

    /// Current params for `account`.
    ///
    /// A missing row is created with defaults (best-effort) and the defaults
    /// are returned either way.
    pub async fn get_params(&self, account: &str) -> ParamsLookup {
        let Some(store) = self.store else {
            return ParamsLookup {
                params: ModelParams::defaults(account),
                source: ParamsSource::Unavailable,
            };
        };

        match store.get_model_params(account).await {
            Ok(Some(params)) => ParamsLookup {
                params,
                source: ParamsSource::Stored,
            },
            Ok(None) => {
                let mut defaults = ModelParams::defaults(account);
                defaults.updated_at = Some(Utc::now());
                match store.upsert_model_params(&defaults).await {
                    Ok(()) => debug!(account = %account, "Created default model params"),
                    Err(e) => warn!(
                        account = %account,
                        error = %e,
                        "Failed to create default model params"
                    ),
                }
                ParamsLookup {
                    params: defaults,
                    source: ParamsSource::Defaults,
                }
            }
            Err(e) => {
                warn!(account = %account, error = %e, "Failed to read model params, using defaults");
                ParamsLookup {
                    params: ModelParams::defaults(account),
                    source: ParamsSource::Unavailable,
                }
            }
        }
    }

    /// Upsert params stamped with the current time.
    ///
    /// Returns the written params, or `None` when the write did not reach
    /// the store. Failures are logged.
    pub async fn put_params(
        &self,
        account: &str,
        w_engagement: f64,
        w_relevance: f64,
        learning_rate: f64,
    ) -> Option<ModelParams> {
        let store = self.store?;

        let params = ModelParams {
            account: account.to_string(),
            w_engagement,
            w_relevance,
            learning_rate,
            updated_at: Some(Utc::now()),
        };

        match store.upsert_model_params(&params).await {
            Ok(()) => Some(params),
            Err(e) => {
                warn!(account = %account, error = %e, "Failed to persist model params");
                None
            }
        }
    }
}
