use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscribers::{
            InsertSubscriberEntity, StampPaymentEntity, SubscriberEntity, UpdateSubscriberEntity,
        },
        repositories::subscribers::SubscriberRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscribers},
};

pub struct SubscriberPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriberPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberRepository for SubscriberPostgres {
    async fn list_all(&self) -> Result<Vec<SubscriberEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscribers::table
            .order(subscribers::created_at.desc())
            .load::<SubscriberEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, subscriber_id: Uuid) -> Result<Option<SubscriberEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscribers::table
            .find(subscriber_id)
            .first::<SubscriberEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert(&self, subscriber: InsertSubscriberEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscriber_id = insert_into(subscribers::table)
            .values(&subscriber)
            .returning(subscribers::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(subscriber_id)
    }

    async fn update(
        &self,
        subscriber_id: Uuid,
        update_entity: UpdateSubscriberEntity,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(subscribers::table.filter(subscribers::id.eq(subscriber_id)))
            .set(&update_entity)
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn stamp_payment(&self, subscriber_id: Uuid, stamp: StampPaymentEntity) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(subscribers::table.filter(subscribers::id.eq(subscriber_id)))
            .set(&stamp)
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn delete(&self, subscriber_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(subscribers::table.filter(subscribers::id.eq(subscriber_id)))
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn list_created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<SubscriberEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscribers::table
            .filter(subscribers::created_at.lt(cutoff))
            .load::<SubscriberEntity>(&mut conn)?;

        Ok(results)
    }
}
