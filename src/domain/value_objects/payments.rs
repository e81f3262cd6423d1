use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::payments::PaymentEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentModel {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub recorded_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentModel {
    fn from(entity: PaymentEntity) -> Self {
        Self {
            id: entity.id,
            subscriber_id: entity.subscriber_id,
            amount: entity.amount,
            payment_date: entity.payment_date,
            recorded_by_username: entity.recorded_by_username,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentModel {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentModel {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}
