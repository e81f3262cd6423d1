use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::activity_logs::{ActivityLogEntity, InsertActivityLogEntity};

#[async_trait]
#[automock]
pub trait ActivityLogRepository {
    async fn insert(&self, entry: InsertActivityLogEntity) -> Result<Uuid>;

    /// Entries created on or after the cutoff, newest first.
    async fn list_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ActivityLogEntity>>;
}
