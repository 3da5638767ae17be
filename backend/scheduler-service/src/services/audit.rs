/// Audit Recorder
///
/// Manual weight overrides: authorize, validate, persist, then append an
/// audit row. The audit append is best-effort and never rolls back the
/// weight change.
use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use super::weights::WeightStore;
use crate::db::SchedulerStore;
use crate::error::{AppError, Result};
use crate::models::{
    AuditEntry, ModelParams, WeightPair, WeightsUpdateOutcome, WeightsUpdateRequest,
    WEIGHT_SUM_TOLERANCE,
};

/// Actor tag written on every manual override
pub const AUDIT_UPDATED_BY: &str = "admin_api";
pub const AUDIT_SOURCE: &str = "manual";

/// Slack absorbing f64 error when the sum sits exactly on the tolerance edge
const SUM_EPSILON: f64 = 1e-9;

/// Range and sum-tolerance checks for a manual override.
///
/// `|w_engagement + w_relevance - 1| <= 0.05`, boundary included.
pub fn validate_override(request: &WeightsUpdateRequest) -> Result<()> {
    request.validate()?;

    let sum = request.w_engagement + request.w_relevance;
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE + SUM_EPSILON {
        return Err(AppError::Validation(format!(
            "w_engagement + w_relevance must be within {} of 1.0 (got {:.4})",
            WEIGHT_SUM_TOLERANCE, sum
        )));
    }

    Ok(())
}

/// `true` only when an admin token is configured and matches
pub fn authorize(configured: Option<&str>, provided: Option<&str>) -> bool {
    match (configured, provided) {
        (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
        _ => false,
    }
}

pub struct AuditRecorder<'a> {
    store: Option<&'a dyn SchedulerStore>,
    admin_token: Option<&'a str>,
}

impl<'a> AuditRecorder<'a> {
    pub fn new(store: Option<&'a dyn SchedulerStore>, admin_token: Option<&'a str>) -> Self {
        Self { store, admin_token }
    }

    /// Apply a manual override.
    ///
    /// Fails with `Unauthorized` before touching the store, or with
    /// `Validation` before any mutation. Store failures after that point are
    /// reported through `persisted` / `audited`.
    pub async fn update_weights(
        &self,
        request: &WeightsUpdateRequest,
        token: Option<&str>,
    ) -> Result<WeightsUpdateOutcome> {
        if !authorize(self.admin_token, token) {
            warn!(account = %request.account, "Rejected weights update: invalid admin token");
            return Err(AppError::Unauthorized);
        }

        validate_override(request)?;

        let previous = self.previous_params(&request.account).await;

        let written = WeightStore::new(self.store)
            .put_params(
                &request.account,
                request.w_engagement,
                request.w_relevance,
                request.learning_rate,
            )
            .await;
        let persisted = written.is_some();

        let new_params = written.unwrap_or_else(|| ModelParams {
            account: request.account.clone(),
            w_engagement: request.w_engagement,
            w_relevance: request.w_relevance,
            learning_rate: request.learning_rate,
            updated_at: None,
        });

        let audited = self.append_audit(&previous, &new_params).await;

        info!(
            account = %request.account,
            prev_w_engagement = previous.w_engagement,
            prev_w_relevance = previous.w_relevance,
            w_engagement = new_params.w_engagement,
            w_relevance = new_params.w_relevance,
            persisted,
            audited,
            "Manual weights override"
        );

        Ok(WeightsUpdateOutcome {
            status: if persisted { "updated" } else { "not_persisted" }.to_string(),
            account: request.account.clone(),
            previous_weights: WeightPair {
                w_engagement: previous.w_engagement,
                w_relevance: previous.w_relevance,
            },
            new_weights: new_params,
            persisted,
            audited,
        })
    }

    /// Stored params, or defaults when absent or unreadable (no lazy create)
    async fn previous_params(&self, account: &str) -> ModelParams {
        let Some(store) = self.store else {
            return ModelParams::defaults(account);
        };

        match store.get_model_params(account).await {
            Ok(Some(params)) => params,
            Ok(None) => ModelParams::defaults(account),
            Err(e) => {
                warn!(account = %account, error = %e, "Failed to read prior params, auditing against defaults");
                ModelParams::defaults(account)
            }
        }
    }

    async fn append_audit(&self, previous: &ModelParams, new_params: &ModelParams) -> bool {
        let Some(store) = self.store else {
            return false;
        };

        let entry = AuditEntry {
            account: new_params.account.clone(),
            prev_w_engagement: previous.w_engagement,
            prev_w_relevance: previous.w_relevance,
            new_w_engagement: new_params.w_engagement,
            new_w_relevance: new_params.w_relevance,
            learning_rate: new_params.learning_rate,
            updated_by: AUDIT_UPDATED_BY.to_string(),
            source: AUDIT_SOURCE.to_string(),
            created_at: Utc::now(),
        };

        match store.insert_audit(&entry).await {
            Ok(()) => true,
            Err(e) => {
                warn!(account = %entry.account, error = %e, "Failed to append weights audit entry");
                false
            }
        }
    }
}
