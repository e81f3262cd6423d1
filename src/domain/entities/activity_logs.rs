use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::activity_logs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = activity_logs)]
pub struct ActivityLogEntity {
    pub id: Uuid,
    pub action_type: String,
    pub performed_by_user_id: Uuid,
    pub performed_by_username: String,
    pub subscriber_id: Option<Uuid>,
    pub subscriber_name: String,
    pub amount: Option<Decimal>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activity_logs)]
pub struct InsertActivityLogEntity {
    pub action_type: String,
    pub performed_by_user_id: Uuid,
    pub performed_by_username: String,
    pub subscriber_id: Option<Uuid>,
    pub subscriber_name: String,
    pub amount: Option<Decimal>,
    pub details: Option<String>,
}
