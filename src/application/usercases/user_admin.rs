use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    entities::profiles::InsertProfileEntity,
    repositories::user_accounts::UserAccountRepository,
    value_objects::{enums::app_roles::AppRole, operators::Operator},
};

const USERNAME_MIN_LEN: usize = 5;
const USERNAME_MAX_LEN: usize = 10;
const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("{0}")]
    Validation(String),
    #[error("operator is not allowed to manage accounts")]
    Forbidden,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserAdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserAdminError::Validation(_) => StatusCode::BAD_REQUEST,
            UserAdminError::Forbidden => StatusCode::FORBIDDEN,
            UserAdminError::UsernameTaken => StatusCode::CONFLICT,
            UserAdminError::UserNotFound => StatusCode::NOT_FOUND,
            UserAdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UserAdminError>;

pub struct UserAdminUseCase<U>
where
    U: UserAccountRepository + Send + Sync + 'static,
{
    user_account_repo: Arc<U>,
}

impl<U> UserAdminUseCase<U>
where
    U: UserAccountRepository + Send + Sync + 'static,
{
    pub fn new(user_account_repo: Arc<U>) -> Self {
        Self { user_account_repo }
    }

    /// Creates an operator account. Input is validated before any store
    /// call; the caller must hold an admin-or-higher role; the new account
    /// defaults to the lowest-privilege tier.
    pub async fn create_user(
        &self,
        caller: &Operator,
        username: &str,
        password: &str,
        role: Option<AppRole>,
    ) -> UseCaseResult<Uuid> {
        validate_username(username)?;
        validate_password(password)?;
        self.require_admin(caller).await?;

        if self
            .user_account_repo
            .find_profile_by_username(username.to_string())
            .await
            .map_err(UserAdminError::Internal)?
            .is_some()
        {
            return Err(UserAdminError::UsernameTaken);
        }

        let password_hash = hash_password(password)?;
        let user_id = self
            .user_account_repo
            .insert_user(
                InsertProfileEntity {
                    username: username.to_string(),
                    password_hash,
                },
                role.unwrap_or(AppRole::Employee).to_string(),
            )
            .await
            .map_err(|err| {
                error!(db_error = ?err, "user_admin: failed to insert user");
                UserAdminError::Internal(err)
            })?;

        info!(%user_id, username, "user_admin: user created");
        Ok(user_id)
    }

    pub async fn reset_password(
        &self,
        caller: &Operator,
        username: &str,
        new_password: &str,
    ) -> UseCaseResult<()> {
        validate_password(new_password)?;
        self.require_admin(caller).await?;

        let password_hash = hash_password(new_password)?;
        let affected = self
            .user_account_repo
            .update_password_hash(username.to_string(), password_hash)
            .await
            .map_err(UserAdminError::Internal)?;

        if affected == 0 {
            return Err(UserAdminError::UserNotFound);
        }
        info!(username, "user_admin: password reset");
        Ok(())
    }

    async fn require_admin(&self, caller: &Operator) -> UseCaseResult<()> {
        let roles = self
            .user_account_repo
            .roles_for(caller.user_id)
            .await
            .map_err(UserAdminError::Internal)?;

        match AppRole::resolve(&roles) {
            Some(role) if role.is_admin_or_higher() => Ok(()),
            _ => Err(UserAdminError::Forbidden),
        }
    }
}

fn validate_username(username: &str) -> UseCaseResult<()> {
    let letters_only = username.chars().all(|c| c.is_ascii_alphabetic());
    if !letters_only || username.len() < USERNAME_MIN_LEN || username.len() > USERNAME_MAX_LEN {
        return Err(UserAdminError::Validation(
            "username must be 5-10 letters".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> UseCaseResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(UserAdminError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> UseCaseResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| UserAdminError::Internal(anyhow::anyhow!("failed to hash password: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::user_accounts::MockUserAccountRepository;

    fn operator() -> Operator {
        Operator {
            user_id: Uuid::new_v4(),
            username: "manager".to_string(),
        }
    }

    #[tokio::test]
    async fn malformed_username_is_rejected_before_any_store_call() {
        // No expectations set: any repository call panics the test
        let usecase = UserAdminUseCase::new(Arc::new(MockUserAccountRepository::new()));

        for username in ["abc", "averylongusername", "user1", "user name"] {
            let result = usecase
                .create_user(&operator(), username, "secret99", None)
                .await;
            assert!(
                matches!(result, Err(UserAdminError::Validation(_))),
                "username {:?}",
                username
            );
        }
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_any_store_call() {
        let usecase = UserAdminUseCase::new(Arc::new(MockUserAccountRepository::new()));

        let result = usecase
            .create_user(&operator(), "kareem", "12345", None)
            .await;
        assert!(matches!(result, Err(UserAdminError::Validation(_))));

        let result = usecase.reset_password(&operator(), "kareem", "12345").await;
        assert!(matches!(result, Err(UserAdminError::Validation(_))));
    }

    #[tokio::test]
    async fn employee_caller_is_forbidden() {
        let mut user_account_repo = MockUserAccountRepository::new();
        user_account_repo
            .expect_roles_for()
            .returning(|_| Box::pin(async { Ok(vec!["employee".to_string()]) }));

        let usecase = UserAdminUseCase::new(Arc::new(user_account_repo));
        let result = usecase
            .create_user(&operator(), "kareem", "secret99", None)
            .await;
        assert!(matches!(result, Err(UserAdminError::Forbidden)));
    }

    #[tokio::test]
    async fn created_user_defaults_to_employee_role() {
        let user_id = Uuid::new_v4();

        let mut user_account_repo = MockUserAccountRepository::new();
        user_account_repo
            .expect_roles_for()
            .returning(|_| Box::pin(async { Ok(vec!["admin".to_string()]) }));
        user_account_repo
            .expect_find_profile_by_username()
            .returning(|_| Box::pin(async { Ok(None) }));
        user_account_repo
            .expect_insert_user()
            .withf(|profile, role| {
                profile.username == "kareem" && !profile.password_hash.is_empty() && role == "employee"
            })
            .returning(move |_, _| Box::pin(async move { Ok(user_id) }));

        let usecase = UserAdminUseCase::new(Arc::new(user_account_repo));
        let created = usecase
            .create_user(&operator(), "kareem", "secret99", None)
            .await
            .unwrap();
        assert_eq!(created, user_id);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        use crate::domain::entities::profiles::ProfileEntity;
        use chrono::Utc;

        let mut user_account_repo = MockUserAccountRepository::new();
        user_account_repo
            .expect_roles_for()
            .returning(|_| Box::pin(async { Ok(vec!["backend_admin".to_string()]) }));
        user_account_repo
            .expect_find_profile_by_username()
            .returning(|username| {
                Box::pin(async move {
                    Ok(Some(ProfileEntity {
                        id: Uuid::new_v4(),
                        username,
                        password_hash: "hash".to_string(),
                        created_at: Utc::now(),
                    }))
                })
            });

        let usecase = UserAdminUseCase::new(Arc::new(user_account_repo));
        let result = usecase
            .create_user(&operator(), "kareem", "secret99", None)
            .await;
        assert!(matches!(result, Err(UserAdminError::UsernameTaken)));
    }
}
