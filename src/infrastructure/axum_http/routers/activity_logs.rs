use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    application::usercases::activity_logs::{ActivityLogUseCase, DEFAULT_WINDOW_DAYS},
    domain::repositories::activity_logs::ActivityLogRepository,
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad, repositories::activity_logs::ActivityLogPostgres,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let activity_log_repository = ActivityLogPostgres::new(Arc::clone(&db_pool));
    let activity_log_usecase = ActivityLogUseCase::new(Arc::new(activity_log_repository));

    Router::new()
        .route("/", get(list_recent))
        .route("/collectors", get(collector_totals))
        .with_state(Arc::new(activity_log_usecase))
}

pub async fn list_recent<L>(
    State(activity_log_usecase): State<Arc<ActivityLogUseCase<L>>>,
    _auth: AuthUser,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse
where
    L: ActivityLogRepository + Send + Sync,
{
    let window_days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    match activity_log_usecase
        .list_recent(window_days, Utc::now())
        .await
    {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn collector_totals<L>(
    State(activity_log_usecase): State<Arc<ActivityLogUseCase<L>>>,
    _auth: AuthUser,
    Query(query): Query<WindowQuery>,
) -> impl IntoResponse
where
    L: ActivityLogRepository + Send + Sync,
{
    let window_days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    match activity_log_usecase
        .collector_totals(window_days, Utc::now())
        .await
    {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
