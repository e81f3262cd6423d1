use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::error;

use crate::domain::{
    repositories::activity_logs::ActivityLogRepository,
    value_objects::{
        activity_logs::{ActivityLogModel, CollectorStat},
        enums::action_types::ActionType,
    },
};

/// Operator-facing audit window, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum ActivityLogError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ActivityLogError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ActivityLogError>;

pub struct ActivityLogUseCase<L>
where
    L: ActivityLogRepository + Send + Sync + 'static,
{
    activity_log_repo: Arc<L>,
}

impl<L> ActivityLogUseCase<L>
where
    L: ActivityLogRepository + Send + Sync + 'static,
{
    pub fn new(activity_log_repo: Arc<L>) -> Self {
        Self { activity_log_repo }
    }

    /// Entries from the rolling window, newest first.
    pub async fn list_recent(
        &self,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> UseCaseResult<Vec<ActivityLogModel>> {
        let cutoff = now - Duration::days(window_days);
        let entries = self
            .activity_log_repo
            .list_since(cutoff)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "activity_logs: failed to list entries");
                ActivityLogError::Internal(err)
            })?;

        Ok(entries.into_iter().map(ActivityLogModel::from).collect())
    }

    /// Per-operator collection totals over the window, computed from the
    /// payment entries, largest collector first.
    pub async fn collector_totals(
        &self,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> UseCaseResult<Vec<CollectorStat>> {
        let entries = self.list_recent(window_days, now).await?;

        let mut totals: Vec<CollectorStat> = Vec::new();
        for entry in entries {
            if ActionType::from_str(&entry.action_type) != Some(ActionType::PaymentRecorded) {
                continue;
            }
            let Some(amount) = entry.amount else {
                continue;
            };

            match totals
                .iter_mut()
                .find(|stat| stat.username == entry.performed_by_username)
            {
                Some(stat) => {
                    stat.total_collected += amount;
                    stat.payment_count += 1;
                }
                None => totals.push(CollectorStat {
                    username: entry.performed_by_username,
                    total_collected: amount,
                    payment_count: 1,
                }),
            }
        }

        totals.sort_by(|a, b| b.total_collected.cmp(&a.total_collected));
        Ok(totals)
    }
}
