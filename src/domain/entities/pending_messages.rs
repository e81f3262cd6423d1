use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::pending_messages;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = pending_messages)]
pub struct PendingMessageEntity {
    pub id: Uuid,
    pub subscriber_id: Option<Uuid>,
    pub subscriber_name: String,
    pub subscriber_phone: String,
    pub vehicle_plate: String,
    pub message: String,
    pub requested_by_user_id: Uuid,
    pub requested_by_username: String,
    pub is_bulk: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by_username: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pending_messages)]
pub struct InsertPendingMessageEntity {
    pub subscriber_id: Option<Uuid>,
    pub subscriber_name: String,
    pub subscriber_phone: String,
    pub vehicle_plate: String,
    pub message: String,
    pub requested_by_user_id: Uuid,
    pub requested_by_username: String,
    pub is_bulk: bool,
    pub status: String,
}
