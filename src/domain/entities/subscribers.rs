use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::subscribers;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscribers)]
pub struct SubscriberEntity {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub car: String,
    pub vehicle_plate: String,
    pub monthly_fee: Decimal,
    pub last_payment_date: Option<NaiveDate>,
    pub validity_end: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subscribers)]
pub struct UpdateSubscriberEntity {
    pub name: String,
    pub phone: String,
    pub car: String,
    pub vehicle_plate: String,
    pub monthly_fee: Decimal,
}

/// Denormalized columns written right after a payment is recorded. The next
/// read re-derives the status either way.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subscribers)]
pub struct StampPaymentEntity {
    pub last_payment_date: NaiveDate,
    pub validity_end: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscribers)]
pub struct InsertSubscriberEntity {
    pub name: String,
    pub phone: String,
    pub car: String,
    pub vehicle_plate: String,
    pub monthly_fee: Decimal,
    pub last_payment_date: Option<NaiveDate>,
    pub validity_end: Option<NaiveDate>,
    pub status: String,
}
