use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::pending_messages::InsertPendingMessageEntity,
    repositories::pending_messages::PendingMessageRepository,
    value_objects::{
        enums::message_statuses::MessageStatus,
        operators::Operator,
        pending_messages::{BulkGroup, EnqueueMessageModel, PendingMessageModel,
            group_bulk_pending},
        phone_numbers::normalize_phone,
        subscribers::SubscriberModel,
    },
};

/// Outbound SMS port. The gateway takes the full recipient list in one
/// call; transport failures and `ERROR`-prefixed gateway replies both come
/// back as errors.
#[async_trait]
#[automock]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phones: Vec<String>, text: String) -> AnyResult<String>;
}

#[derive(Debug, Error)]
pub enum MessageQueueError {
    #[error("message not found")]
    MessageNotFound,
    #[error("message was already marked sent")]
    AlreadySent,
    #[error("no pending bulk group with that text")]
    GroupNotFound,
    #[error("{} message(s) failed, {} resolved", .failed.len(), .sent.len())]
    PartialBulkFailure { sent: Vec<Uuid>, failed: Vec<Uuid> },
    #[error("sms dispatch failed: {0}")]
    DispatchFailed(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MessageQueueError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MessageQueueError::MessageNotFound | MessageQueueError::GroupNotFound => {
                StatusCode::NOT_FOUND
            }
            MessageQueueError::AlreadySent => StatusCode::CONFLICT,
            MessageQueueError::PartialBulkFailure { .. } => StatusCode::BAD_GATEWAY,
            MessageQueueError::DispatchFailed(_) => StatusCode::BAD_GATEWAY,
            MessageQueueError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, MessageQueueError>;

pub struct MessageQueueUseCase<M, G>
where
    M: PendingMessageRepository + Send + Sync + 'static,
    G: SmsSender + Send + Sync + 'static,
{
    message_repo: Arc<M>,
    sms_sender: Arc<G>,
    country_code: String,
}

impl<M, G> MessageQueueUseCase<M, G>
where
    M: PendingMessageRepository + Send + Sync + 'static,
    G: SmsSender + Send + Sync + 'static,
{
    pub fn new(message_repo: Arc<M>, sms_sender: Arc<G>, country_code: String) -> Self {
        Self {
            message_repo,
            sms_sender,
            country_code,
        }
    }

    /// Appends a reminder request to the mailbox. Duplicates against
    /// existing pending messages for the same subscriber are allowed; the
    /// operator clears them with `dismiss`.
    pub async fn enqueue(
        &self,
        enqueue_message_model: EnqueueMessageModel,
        operator: &Operator,
    ) -> UseCaseResult<Uuid> {
        let message_id = self
            .message_repo
            .insert(InsertPendingMessageEntity {
                subscriber_id: enqueue_message_model.subscriber_id,
                subscriber_name: enqueue_message_model.subscriber_name,
                subscriber_phone: enqueue_message_model.subscriber_phone,
                vehicle_plate: enqueue_message_model.vehicle_plate,
                message: enqueue_message_model.message,
                requested_by_user_id: operator.user_id,
                requested_by_username: operator.username.clone(),
                is_bulk: enqueue_message_model.is_bulk,
                status: MessageStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "message_queue: failed to enqueue message");
                MessageQueueError::Internal(err)
            })?;

        info!(%message_id, "message_queue: message enqueued");
        Ok(message_id)
    }

    /// Renders the template per subscriber and queues one bulk-flagged
    /// reminder each. Returns how many were queued; individual insert
    /// failures are logged and skipped, matching the one-by-one queueing
    /// behavior of the bulk dialog.
    pub async fn queue_bulk(
        &self,
        template: &str,
        subscribers: &[SubscriberModel],
        operator: &Operator,
    ) -> UseCaseResult<usize> {
        let mut queued = 0;

        for subscriber in subscribers {
            let result = self
                .enqueue(
                    EnqueueMessageModel {
                        subscriber_id: Some(subscriber.id),
                        subscriber_name: subscriber.name.clone(),
                        subscriber_phone: subscriber.phone.clone(),
                        vehicle_plate: subscriber.vehicle_plate.clone(),
                        message: render_template(template, subscriber),
                        is_bulk: true,
                    },
                    operator,
                )
                .await;

            match result {
                Ok(_) => queued += 1,
                Err(err) => {
                    warn!(subscriber_id = %subscriber.id, error = ?err,
                        "message_queue: failed to queue bulk message");
                }
            }
        }

        info!(queued, total = subscribers.len(), "message_queue: bulk messages queued");
        Ok(queued)
    }

    pub async fn list_pending(&self) -> UseCaseResult<Vec<PendingMessageModel>> {
        let messages = self
            .message_repo
            .list(Some(MessageStatus::Pending.to_string()))
            .await
            .map_err(MessageQueueError::Internal)?;

        Ok(messages.into_iter().map(PendingMessageModel::from).collect())
    }

    pub async fn list_all(
        &self,
        status: Option<MessageStatus>,
    ) -> UseCaseResult<Vec<PendingMessageModel>> {
        let messages = self
            .message_repo
            .list(status.map(|s| s.to_string()))
            .await
            .map_err(MessageQueueError::Internal)?;

        Ok(messages.into_iter().map(PendingMessageModel::from).collect())
    }

    pub async fn pending_count_for(&self, subscriber_id: Uuid) -> UseCaseResult<i64> {
        self.message_repo
            .count_pending_for(subscriber_id)
            .await
            .map_err(MessageQueueError::Internal)
    }

    /// One-way `pending -> sent` transition. The repository only updates
    /// rows still pending, so an already-resolved message keeps its original
    /// resolution time and operator.
    pub async fn mark_sent(&self, message_id: Uuid, operator: &Operator) -> UseCaseResult<()> {
        let affected = self
            .message_repo
            .mark_sent(message_id, operator.username.clone(), Utc::now())
            .await
            .map_err(MessageQueueError::Internal)?;

        if affected > 0 {
            info!(%message_id, "message_queue: message marked sent");
            return Ok(());
        }

        match self
            .message_repo
            .find_by_id(message_id)
            .await
            .map_err(MessageQueueError::Internal)?
        {
            Some(_) => Err(MessageQueueError::AlreadySent),
            None => Err(MessageQueueError::MessageNotFound),
        }
    }

    /// Hard delete, valid for any status. Used to clear duplicates before
    /// sending.
    pub async fn dismiss(&self, message_id: Uuid) -> UseCaseResult<()> {
        let affected = self
            .message_repo
            .delete(message_id)
            .await
            .map_err(MessageQueueError::Internal)?;

        if affected == 0 {
            return Err(MessageQueueError::MessageNotFound);
        }
        info!(%message_id, "message_queue: message dismissed");
        Ok(())
    }

    /// Pending bulk messages grouped by identical trimmed text.
    pub async fn bulk_groups(&self) -> UseCaseResult<Vec<BulkGroup>> {
        let pending = self.list_pending().await?;
        Ok(group_bulk_pending(pending, &self.country_code))
    }

    /// Marks every listed message sent, one network round trip at a time.
    /// There is no rollback: messages resolved before a failure stay
    /// resolved, the rest stay pending and must be retried individually.
    pub async fn mark_group_sent(
        &self,
        message_ids: Vec<Uuid>,
        operator: &Operator,
    ) -> UseCaseResult<Vec<Uuid>> {
        let mut sent = Vec::new();
        let mut failed = Vec::new();

        for message_id in message_ids {
            match self.mark_sent(message_id, operator).await {
                Ok(()) => sent.push(message_id),
                Err(err) => {
                    warn!(%message_id, error = ?err, "message_queue: group member failed");
                    failed.push(message_id);
                }
            }
        }

        if failed.is_empty() {
            Ok(sent)
        } else {
            Err(MessageQueueError::PartialBulkFailure { sent, failed })
        }
    }

    /// Dispatches one pending message through the gateway, then resolves it.
    pub async fn dispatch_message(&self, message_id: Uuid, operator: &Operator) -> UseCaseResult<()> {
        let message = self
            .message_repo
            .find_by_id(message_id)
            .await
            .map_err(MessageQueueError::Internal)?
            .ok_or(MessageQueueError::MessageNotFound)?;

        if MessageStatus::from_str(&message.status) == Some(MessageStatus::Sent) {
            return Err(MessageQueueError::AlreadySent);
        }

        let phone = normalize_phone(&message.subscriber_phone, &self.country_code);
        self.sms_sender
            .send(vec![phone], message.message.clone())
            .await
            .map_err(|err| MessageQueueError::DispatchFailed(err.to_string()))?;

        self.mark_sent(message_id, operator).await
    }

    /// Dispatches a whole bulk group in one gateway call (recipients
    /// comma-joined downstream), then resolves the members sequentially.
    pub async fn dispatch_bulk_group(
        &self,
        group_text: &str,
        operator: &Operator,
    ) -> UseCaseResult<Vec<Uuid>> {
        let groups = self.bulk_groups().await?;
        let group = groups
            .into_iter()
            .find(|group| group.message == group_text.trim())
            .ok_or(MessageQueueError::GroupNotFound)?;

        self.sms_sender
            .send(group.phones.clone(), group.message.clone())
            .await
            .map_err(|err| MessageQueueError::DispatchFailed(err.to_string()))?;

        let member_ids = group.messages.iter().map(|m| m.id).collect();
        self.mark_group_sent(member_ids, operator).await
    }
}

/// Fills `{name}`, `{fee}` and `{plate}` placeholders, first occurrence
/// each, the way the bulk dialog template works.
pub fn render_template(template: &str, subscriber: &SubscriberModel) -> String {
    template
        .replacen("{name}", &subscriber.name, 1)
        .replacen("{fee}", &subscriber.monthly_fee.to_string(), 1)
        .replacen("{plate}", &subscriber.vehicle_plate, 1)
}
