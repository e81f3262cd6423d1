use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::subscribers::{
    InsertSubscriberEntity, StampPaymentEntity, SubscriberEntity, UpdateSubscriberEntity,
};

#[async_trait]
#[automock]
pub trait SubscriberRepository {
    async fn list_all(&self) -> Result<Vec<SubscriberEntity>>;

    async fn find_by_id(&self, subscriber_id: Uuid) -> Result<Option<SubscriberEntity>>;

    async fn insert(&self, subscriber: InsertSubscriberEntity) -> Result<Uuid>;

    async fn update(&self, subscriber_id: Uuid, update: UpdateSubscriberEntity) -> Result<usize>;

    /// Writes the post-payment denormalization (last payment date, validity
    /// end, status). Separate statement from the payment insert.
    async fn stamp_payment(&self, subscriber_id: Uuid, stamp: StampPaymentEntity)
    -> Result<usize>;

    async fn delete(&self, subscriber_id: Uuid) -> Result<usize>;

    /// Candidate set for historical statistics: every subscriber created
    /// strictly before the cutoff instant.
    async fn list_created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<SubscriberEntity>>;
}
