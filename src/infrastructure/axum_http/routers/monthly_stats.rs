use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    application::usercases::monthly_stats::MonthlyStatsUseCase,
    domain::repositories::{payments::PaymentRepository, subscribers::SubscriberRepository},
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{payments::PaymentPostgres, subscribers::SubscriberPostgres},
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub year: i32,
    pub month: u32,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscriber_repository = SubscriberPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));

    let monthly_stats_usecase =
        MonthlyStatsUseCase::new(Arc::new(subscriber_repository), Arc::new(payment_repository));

    Router::new()
        .route("/", get(get_stats))
        .with_state(Arc::new(monthly_stats_usecase))
}

pub async fn get_stats<S, P>(
    State(monthly_stats_usecase): State<Arc<MonthlyStatsUseCase<S, P>>>,
    _auth: AuthUser,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
{
    let Some(reference) = NaiveDate::from_ymd_opt(query.year, query.month, 1) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("{}-{} is not a valid month", query.year, query.month),
        );
    };

    match monthly_stats_usecase
        .get_stats(reference, Utc::now().date_naive())
        .await
    {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
