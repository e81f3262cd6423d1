use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::usercases::message_queue::{MessageQueueUseCase, SmsSender},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::pending_messages::PendingMessageRepository,
        value_objects::{
            enums::message_statuses::MessageStatus, pending_messages::EnqueueMessageModel,
            subscribers::SubscriberModel,
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::pending_messages::PendingMessagePostgres,
        },
        sms::broadnet::BroadnetClient,
    },
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueueBulkRequest {
    pub template: String,
    pub subscribers: Vec<SubscriberModel>,
}

#[derive(Debug, Deserialize)]
pub struct MarkGroupSentRequest {
    pub message_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DispatchGroupRequest {
    pub message: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Result<Router> {
    let pending_message_repository = PendingMessagePostgres::new(Arc::clone(&db_pool));
    let broadnet_client = BroadnetClient::new(&config.sms)?;

    let message_queue_usecase = MessageQueueUseCase::new(
        Arc::new(pending_message_repository),
        Arc::new(broadnet_client),
        config.sms.country_code.clone(),
    );

    Ok(Router::new()
        .route("/", get(list).post(enqueue))
        .route("/bulk", post(queue_bulk))
        .route("/pending", get(list_pending))
        .route("/pending-count/:subscriber_id", get(pending_count))
        .route("/groups", get(bulk_groups))
        .route("/groups/mark-sent", post(mark_group_sent))
        .route("/groups/dispatch", post(dispatch_bulk_group))
        .route("/:message_id", delete(dismiss))
        .route("/:message_id/mark-sent", post(mark_sent))
        .route("/:message_id/dispatch", post(dispatch_message))
        .with_state(Arc::new(message_queue_usecase)))
}

pub async fn list<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let status = match query.status.as_deref() {
        Some(value) => match MessageStatus::from_str(value) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("{} is not a valid message status", value),
                );
            }
        },
        None => None,
    };

    match message_queue_usecase.list_all(status).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn enqueue<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    auth: AuthUser,
    Json(enqueue_message_model): Json<EnqueueMessageModel>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let operator = auth.operator();
    match message_queue_usecase
        .enqueue(enqueue_message_model, &operator)
        .await
    {
        Ok(message_id) => (StatusCode::CREATED, Json(message_id)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn queue_bulk<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    auth: AuthUser,
    Json(request): Json<QueueBulkRequest>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let operator = auth.operator();
    match message_queue_usecase
        .queue_bulk(&request.template, &request.subscribers, &operator)
        .await
    {
        Ok(queued) => (StatusCode::CREATED, Json(queued)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_pending<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    match message_queue_usecase.list_pending().await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn pending_count<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    _auth: AuthUser,
    Path(subscriber_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    match message_queue_usecase.pending_count_for(subscriber_id).await {
        Ok(count) => (StatusCode::OK, Json(count)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn bulk_groups<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    match message_queue_usecase.bulk_groups().await {
        Ok(groups) => (StatusCode::OK, Json(groups)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn mark_group_sent<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    auth: AuthUser,
    Json(request): Json<MarkGroupSentRequest>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let operator = auth.operator();
    match message_queue_usecase
        .mark_group_sent(request.message_ids, &operator)
        .await
    {
        Ok(sent) => (StatusCode::OK, Json(sent)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn dispatch_bulk_group<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    auth: AuthUser,
    Json(request): Json<DispatchGroupRequest>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let operator = auth.operator();
    match message_queue_usecase
        .dispatch_bulk_group(&request.message, &operator)
        .await
    {
        Ok(sent) => (StatusCode::OK, Json(sent)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn dismiss<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    _auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    match message_queue_usecase.dismiss(message_id).await {
        Ok(()) => (StatusCode::OK, "Message dismissed").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn mark_sent<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let operator = auth.operator();
    match message_queue_usecase.mark_sent(message_id, &operator).await {
        Ok(()) => (StatusCode::OK, "Message marked sent").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn dispatch_message<M, G>(
    State(message_queue_usecase): State<Arc<MessageQueueUseCase<M, G>>>,
    auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: PendingMessageRepository + Send + Sync,
    G: SmsSender + Send + Sync,
{
    let operator = auth.operator();
    match message_queue_usecase
        .dispatch_message(message_id, &operator)
        .await
    {
        Ok(()) => (StatusCode::OK, "Message dispatched").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
