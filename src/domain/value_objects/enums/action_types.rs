use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionType {
    PaymentRecorded,
    SubscriberAdded,
}

impl Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            ActionType::PaymentRecorded => "payment_recorded",
            ActionType::SubscriberAdded => "subscriber_added",
        };
        write!(f, "{}", action)
    }
}

impl ActionType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "payment_recorded" => Some(ActionType::PaymentRecorded),
            "subscriber_added" => Some(ActionType::SubscriberAdded),
            _ => None,
        }
    }
}
