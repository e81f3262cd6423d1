use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    application::usercases::subscribers::SubscriberUseCase,
    domain::{
        repositories::{
            activity_logs::ActivityLogRepository, payments::PaymentRepository,
            subscribers::SubscriberRepository, user_accounts::UserAccountRepository,
        },
        value_objects::{
            payments::{RecordPaymentModel, UpdatePaymentModel},
            subscribers::{InsertSubscriberModel, UpdateSubscriberModel},
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                activity_logs::ActivityLogPostgres, payments::PaymentPostgres,
                subscribers::SubscriberPostgres, user_accounts::UserAccountPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscriber_repository = SubscriberPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let activity_log_repository = ActivityLogPostgres::new(Arc::clone(&db_pool));
    let user_account_repository = UserAccountPostgres::new(Arc::clone(&db_pool));

    let subscriber_usecase = SubscriberUseCase::new(
        Arc::new(subscriber_repository),
        Arc::new(payment_repository),
        Arc::new(activity_log_repository),
        Arc::new(user_account_repository),
    );

    Router::new()
        .route("/", get(list).post(add))
        .route("/:subscriber_id", put(update).delete(remove))
        .route(
            "/:subscriber_id/payments",
            get(payment_history).post(record_payment),
        )
        .route(
            "/payments/:payment_id",
            put(update_payment).delete(delete_payment),
        )
        .with_state(Arc::new(subscriber_usecase))
}

pub async fn list<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    match subscriber_usecase.list(Utc::now().date_naive()).await {
        Ok(subscribers) => (StatusCode::OK, Json(subscribers)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn add<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    auth: AuthUser,
    Json(insert_subscriber_model): Json<InsertSubscriberModel>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    let operator = auth.operator();
    match subscriber_usecase
        .add(insert_subscriber_model, &operator, Utc::now().date_naive())
        .await
    {
        Ok(subscriber_id) => (StatusCode::CREATED, Json(subscriber_id)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    _auth: AuthUser,
    Path(subscriber_id): Path<Uuid>,
    Json(update_subscriber_model): Json<UpdateSubscriberModel>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    match subscriber_usecase
        .update(subscriber_id, update_subscriber_model)
        .await
    {
        Ok(()) => (StatusCode::OK, "Subscriber updated").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn remove<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    _auth: AuthUser,
    Path(subscriber_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    match subscriber_usecase.delete(subscriber_id).await {
        Ok(()) => (StatusCode::OK, "Subscriber deleted").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn record_payment<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    auth: AuthUser,
    Path(subscriber_id): Path<Uuid>,
    Json(record_payment_model): Json<RecordPaymentModel>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    let operator = auth.operator();
    match subscriber_usecase
        .record_payment(
            subscriber_id,
            record_payment_model.amount,
            &operator,
            Utc::now().date_naive(),
        )
        .await
    {
        Ok(payment_id) => (StatusCode::CREATED, Json(payment_id)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn payment_history<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    _auth: AuthUser,
    Path(subscriber_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    match subscriber_usecase.payment_history(subscriber_id).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update_payment<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(update_payment_model): Json<UpdatePaymentModel>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    let operator = auth.operator();
    match subscriber_usecase
        .update_payment(payment_id, update_payment_model, &operator)
        .await
    {
        Ok(()) => (StatusCode::OK, "Payment updated").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn delete_payment<S, P, L, U>(
    State(subscriber_usecase): State<Arc<SubscriberUseCase<S, P, L, U>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync,
    P: PaymentRepository + Send + Sync,
    L: ActivityLogRepository + Send + Sync,
    U: UserAccountRepository + Send + Sync,
{
    let operator = auth.operator();
    match subscriber_usecase
        .delete_payment(payment_id, &operator)
        .await
    {
        Ok(()) => (StatusCode::OK, "Payment deleted").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
