use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::subscribers::{InsertSubscriberEntity, SubscriberEntity};
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;

/// Placeholder stored when no vehicle descriptor was captured.
pub const UNKNOWN_CAR: &str = "Not Available";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriberModel {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub car: String,
    pub vehicle_plate: String,
    pub monthly_fee: Decimal,
    pub last_payment_date: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl SubscriberModel {
    /// Maps a stored row to the API model, re-deriving the status from the
    /// validity-end date instead of trusting the persisted column.
    pub fn from_entity(entity: SubscriberEntity, today: NaiveDate) -> Self {
        let status = PaymentStatus::evaluate(entity.validity_end, today);
        Self {
            id: entity.id,
            name: entity.name,
            phone: entity.phone,
            car: entity.car,
            vehicle_plate: entity.vehicle_plate,
            monthly_fee: entity.monthly_fee,
            last_payment_date: entity.last_payment_date,
            valid_until: entity.validity_end,
            status,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertSubscriberModel {
    pub name: String,
    pub phone: String,
    pub car: Option<String>,
    pub vehicle_plate: String,
    pub monthly_fee: Decimal,
    pub last_payment_date: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl InsertSubscriberModel {
    pub fn into_entity(self, today: NaiveDate) -> InsertSubscriberEntity {
        let status = PaymentStatus::evaluate(self.valid_until, today);
        InsertSubscriberEntity {
            name: self.name,
            phone: self.phone,
            car: self.car.unwrap_or_else(|| UNKNOWN_CAR.to_string()),
            vehicle_plate: self.vehicle_plate,
            monthly_fee: self.monthly_fee,
            last_payment_date: self.last_payment_date,
            validity_end: self.valid_until,
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriberModel {
    pub name: String,
    pub phone: String,
    pub car: Option<String>,
    pub vehicle_plate: String,
    pub monthly_fee: Decimal,
}
