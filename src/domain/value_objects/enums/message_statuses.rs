use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageStatus {
    #[default]
    Pending,
    Sent,
}

impl Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
        };
        write!(f, "{}", status)
    }
}

impl MessageStatus {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(MessageStatus::Pending),
            "sent" => Some(MessageStatus::Sent),
            _ => None,
        }
    }
}
