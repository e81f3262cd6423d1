use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::profiles::{InsertProfileEntity, InsertUserRoleEntity, ProfileEntity},
        repositories::user_accounts::UserAccountRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{profiles, user_roles},
    },
};

pub struct UserAccountPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserAccountPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserAccountRepository for UserAccountPostgres {
    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let roles = user_roles::table
            .filter(user_roles::user_id.eq(user_id))
            .select(user_roles::role)
            .load::<String>(&mut conn)?;

        Ok(roles)
    }

    async fn find_profile_by_username(&self, username: String) -> Result<Option<ProfileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = profiles::table
            .filter(profiles::username.eq(username))
            .select(ProfileEntity::as_select())
            .first::<ProfileEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert_user(&self, profile: InsertProfileEntity, role: String) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user_id = conn.transaction::<Uuid, diesel::result::Error, _>(|conn| {
            let user_id = insert_into(profiles::table)
                .values(&profile)
                .returning(profiles::id)
                .get_result::<Uuid>(conn)?;

            insert_into(user_roles::table)
                .values(&InsertUserRoleEntity { user_id, role })
                .execute(conn)?;

            Ok(user_id)
        })?;

        Ok(user_id)
    }

    async fn update_password_hash(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(profiles::table.filter(profiles::username.eq(username)))
            .set(profiles::password_hash.eq(password_hash))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
