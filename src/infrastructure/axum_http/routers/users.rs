use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde::Deserialize;

use crate::{
    application::usercases::user_admin::UserAdminUseCase,
    domain::{
        repositories::user_accounts::UserAccountRepository,
        value_objects::enums::app_roles::AppRole,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad, repositories::user_accounts::UserAccountPostgres,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub password: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_account_repository = UserAccountPostgres::new(Arc::clone(&db_pool));
    let user_admin_usecase = UserAdminUseCase::new(Arc::new(user_account_repository));

    Router::new()
        .route("/", post(create_user))
        .route("/reset-password", post(reset_password))
        .with_state(Arc::new(user_admin_usecase))
}

pub async fn create_user<U>(
    State(user_admin_usecase): State<Arc<UserAdminUseCase<U>>>,
    auth: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse
where
    U: UserAccountRepository + Send + Sync,
{
    let role = match request.role.as_deref() {
        Some(value) => match AppRole::from_str(value) {
            Some(role) => Some(role),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("{} is not a valid role", value),
                );
            }
        },
        None => None,
    };

    let operator = auth.operator();
    match user_admin_usecase
        .create_user(&operator, &request.username, &request.password, role)
        .await
    {
        Ok(user_id) => (StatusCode::CREATED, Json(user_id)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn reset_password<U>(
    State(user_admin_usecase): State<Arc<UserAdminUseCase<U>>>,
    auth: AuthUser,
    Json(request): Json<ResetPasswordRequest>,
) -> impl IntoResponse
where
    U: UserAccountRepository + Send + Sync,
{
    let operator = auth.operator();
    match user_admin_usecase
        .reset_password(&operator, &request.username, &request.password)
        .await
    {
        Ok(()) => (StatusCode::OK, "Password reset").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
