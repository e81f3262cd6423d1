use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity, UpdatePaymentEntity};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    async fn insert(&self, payment: InsertPaymentEntity) -> Result<Uuid>;

    async fn list_by_subscriber(&self, subscriber_id: Uuid) -> Result<Vec<PaymentEntity>>;

    /// Payments dated inside `[start, end]`, both bounds inclusive.
    async fn list_in_window(&self, start: NaiveDate, end: NaiveDate)
    -> Result<Vec<PaymentEntity>>;

    async fn update(&self, payment_id: Uuid, update: UpdatePaymentEntity) -> Result<usize>;

    async fn delete(&self, payment_id: Uuid) -> Result<usize>;

    async fn delete_by_subscriber(&self, subscriber_id: Uuid) -> Result<usize>;
}
