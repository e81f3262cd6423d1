use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::pending_messages::{InsertPendingMessageEntity, PendingMessageEntity},
        repositories::pending_messages::PendingMessageRepository,
        value_objects::enums::message_statuses::MessageStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::pending_messages},
};

pub struct PendingMessagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PendingMessagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PendingMessageRepository for PendingMessagePostgres {
    async fn insert(&self, message: InsertPendingMessageEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let message_id = insert_into(pending_messages::table)
            .values(&message)
            .returning(pending_messages::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(message_id)
    }

    async fn find_by_id(&self, message_id: Uuid) -> Result<Option<PendingMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = pending_messages::table
            .find(message_id)
            .first::<PendingMessageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, status: Option<String>) -> Result<Vec<PendingMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = pending_messages::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(pending_messages::status.eq(status));
        }

        let results = query
            .order(pending_messages::created_at.desc())
            .load::<PendingMessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_sent(
        &self,
        message_id: Uuid,
        resolved_by_username: String,
        resolved_at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The status guard keeps an already resolved message from being
        // stamped twice; zero affected rows tells the caller which case it hit.
        let affected = update(
            pending_messages::table
                .filter(pending_messages::id.eq(message_id))
                .filter(pending_messages::status.eq(MessageStatus::Pending.to_string())),
        )
        .set((
            pending_messages::status.eq(MessageStatus::Sent.to_string()),
            pending_messages::resolved_at.eq(Some(resolved_at)),
            pending_messages::resolved_by_username.eq(Some(resolved_by_username)),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }

    async fn delete(&self, message_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(pending_messages::table.filter(pending_messages::id.eq(message_id)))
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn count_pending_for(&self, subscriber_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = pending_messages::table
            .filter(pending_messages::subscriber_id.eq(subscriber_id))
            .filter(pending_messages::status.eq(MessageStatus::Pending.to_string()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}
