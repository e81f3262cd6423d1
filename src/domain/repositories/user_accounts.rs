use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::profiles::{InsertProfileEntity, ProfileEntity};

#[async_trait]
#[automock]
pub trait UserAccountRepository {
    /// All role rows stored for the user, in store order. Callers collapse
    /// them with the precedence rule.
    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>>;

    async fn find_profile_by_username(&self, username: String) -> Result<Option<ProfileEntity>>;

    /// Inserts the profile and its role row together.
    async fn insert_user(&self, profile: InsertProfileEntity, role: String) -> Result<Uuid>;

    async fn update_password_hash(&self, username: String, password_hash: String)
    -> Result<usize>;
}
