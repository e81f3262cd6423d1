use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub recorded_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = payments)]
pub struct UpdatePaymentEntity {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub subscriber_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub recorded_by_username: Option<String>,
}
