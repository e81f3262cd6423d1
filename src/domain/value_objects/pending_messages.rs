use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::pending_messages::PendingMessageEntity;
use crate::domain::value_objects::enums::message_statuses::MessageStatus;
use crate::domain::value_objects::phone_numbers::normalize_phone;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingMessageModel {
    pub id: Uuid,
    pub subscriber_id: Option<Uuid>,
    pub subscriber_name: String,
    pub subscriber_phone: String,
    pub vehicle_plate: String,
    pub message: String,
    pub requested_by_username: String,
    pub is_bulk: bool,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by_username: Option<String>,
}

impl From<PendingMessageEntity> for PendingMessageModel {
    fn from(entity: PendingMessageEntity) -> Self {
        Self {
            id: entity.id,
            subscriber_id: entity.subscriber_id,
            subscriber_name: entity.subscriber_name,
            subscriber_phone: entity.subscriber_phone,
            vehicle_plate: entity.vehicle_plate,
            message: entity.message,
            requested_by_username: entity.requested_by_username,
            is_bulk: entity.is_bulk,
            status: MessageStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            resolved_at: entity.resolved_at,
            resolved_by_username: entity.resolved_by_username,
        }
    }
}

/// Reminder request as submitted by an operator. Subscriber fields are
/// snapshots taken at request time so the message stays meaningful even if
/// the subscriber record is edited or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueMessageModel {
    pub subscriber_id: Option<Uuid>,
    pub subscriber_name: String,
    pub subscriber_phone: String,
    pub vehicle_plate: String,
    pub message: String,
    #[serde(default)]
    pub is_bulk: bool,
}

/// Pending bulk messages sharing the same trimmed text, dispatched and
/// resolved together. There is no stored grouping key; the text itself is
/// the key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BulkGroup {
    pub message: String,
    pub phones: Vec<String>,
    pub messages: Vec<PendingMessageModel>,
}

/// Groups the bulk-flagged pending messages by exact equality of their
/// trimmed text, first-seen order. Recipient phones are normalized and
/// deduplicated per group.
pub fn group_bulk_pending(
    messages: Vec<PendingMessageModel>,
    country_code: &str,
) -> Vec<BulkGroup> {
    let mut groups: Vec<BulkGroup> = Vec::new();

    for message in messages {
        if !message.is_bulk || message.status != MessageStatus::Pending {
            continue;
        }

        let text = message.message.trim().to_string();
        let phone = normalize_phone(&message.subscriber_phone, country_code);

        match groups.iter_mut().find(|group| group.message == text) {
            Some(group) => {
                if !group.phones.contains(&phone) {
                    group.phones.push(phone);
                }
                group.messages.push(message);
            }
            None => groups.push(BulkGroup {
                message: text,
                phones: vec![phone],
                messages: vec![message],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str, phone: &str, is_bulk: bool) -> PendingMessageModel {
        PendingMessageModel {
            id: Uuid::new_v4(),
            subscriber_id: Some(Uuid::new_v4()),
            subscriber_name: "Subscriber".to_string(),
            subscriber_phone: phone.to_string(),
            vehicle_plate: "B 123456".to_string(),
            message: text.to_string(),
            requested_by_username: "operator".to_string(),
            is_bulk,
            status: MessageStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
            resolved_by_username: None,
        }
    }

    #[test]
    fn identical_trimmed_text_forms_one_group() {
        let groups = group_bulk_pending(
            vec![
                message("Please pay your fee", "03 111 222", true),
                message("  Please pay your fee  ", "03 333 444", true),
                message("A different reminder", "03 555 666", true),
            ],
            "961",
        );

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].messages.len(), 2);
        assert_eq!(groups[0].message, "Please pay your fee");
        assert_eq!(groups[1].messages.len(), 1);
    }

    #[test]
    fn group_phones_are_normalized_and_deduplicated() {
        let groups = group_bulk_pending(
            vec![
                message("Reminder", "03 111 222", true),
                message("Reminder", "+961 3 111 222", true),
                message("Reminder", "03 333 444", true),
            ],
            "961",
        );

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].phones, vec!["9613111222", "9613333444"]);
    }

    #[test]
    fn non_bulk_and_resolved_messages_are_excluded() {
        let mut sent = message("Reminder", "03 111 222", true);
        sent.status = MessageStatus::Sent;
        let individual = message("Reminder", "03 333 444", false);

        let groups = group_bulk_pending(vec![sent, individual], "961");
        assert!(groups.is_empty());
    }
}
