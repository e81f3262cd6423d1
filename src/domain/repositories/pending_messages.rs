use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::pending_messages::{InsertPendingMessageEntity, PendingMessageEntity};

#[async_trait]
#[automock]
pub trait PendingMessageRepository {
    async fn insert(&self, message: InsertPendingMessageEntity) -> Result<Uuid>;

    async fn find_by_id(&self, message_id: Uuid) -> Result<Option<PendingMessageEntity>>;

    /// Newest first, optionally restricted to one lifecycle status.
    async fn list(&self, status: Option<String>) -> Result<Vec<PendingMessageEntity>>;

    /// Flips `pending -> sent` and stamps the resolution fields. Returns the
    /// number of affected rows; 0 means the message was missing or already
    /// resolved, and the stored resolution fields stay untouched.
    async fn mark_sent(
        &self,
        message_id: Uuid,
        resolved_by_username: String,
        resolved_at: DateTime<Utc>,
    ) -> Result<usize>;

    async fn delete(&self, message_id: Uuid) -> Result<usize>;

    async fn count_pending_for(&self, subscriber_id: Uuid) -> Result<i64>;
}
