use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::activity_logs::{ActivityLogEntity, InsertActivityLogEntity},
        repositories::activity_logs::ActivityLogRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::activity_logs},
};

pub struct ActivityLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ActivityLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ActivityLogRepository for ActivityLogPostgres {
    async fn insert(&self, log: InsertActivityLogEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let log_id = insert_into(activity_logs::table)
            .values(&log)
            .returning(activity_logs::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(log_id)
    }

    async fn list_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ActivityLogEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = activity_logs::table
            .filter(activity_logs::created_at.ge(cutoff))
            .order(activity_logs::created_at.desc())
            .load::<ActivityLogEntity>(&mut conn)?;

        Ok(results)
    }
}
