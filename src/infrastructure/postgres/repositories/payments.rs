use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity, UpdatePaymentEntity},
        repositories::payments::PaymentRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::payments},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn insert(&self, payment: InsertPaymentEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment_id = insert_into(payments::table)
            .values(&payment)
            .returning(payments::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(payment_id)
    }

    async fn list_by_subscriber(&self, subscriber_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::subscriber_id.eq(subscriber_id))
            .order((payments::payment_date.desc(), payments::created_at.desc()))
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::payment_date.ge(start))
            .filter(payments::payment_date.le(end))
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, payment_id: Uuid, update_entity: UpdatePaymentEntity) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(payments::table.filter(payments::id.eq(payment_id)))
            .set(&update_entity)
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn delete(&self, payment_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected =
            delete(payments::table.filter(payments::id.eq(payment_id))).execute(&mut conn)?;

        Ok(affected)
    }

    async fn delete_by_subscriber(&self, subscriber_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(payments::table.filter(payments::subscriber_id.eq(subscriber_id)))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
