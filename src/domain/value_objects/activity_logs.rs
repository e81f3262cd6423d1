use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::activity_logs::ActivityLogEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLogModel {
    pub id: Uuid,
    pub action_type: String,
    pub performed_by_username: String,
    pub subscriber_name: String,
    pub amount: Option<Decimal>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogEntity> for ActivityLogModel {
    fn from(entity: ActivityLogEntity) -> Self {
        Self {
            id: entity.id,
            action_type: entity.action_type,
            performed_by_username: entity.performed_by_username,
            subscriber_name: entity.subscriber_name,
            amount: entity.amount,
            details: entity.details,
            created_at: entity.created_at,
        }
    }
}

/// Collections totals for one operator over the reporting window.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectorStat {
    pub username: String,
    pub total_collected: Decimal,
    pub payment_count: i64,
}
