pub mod activity_logs;
pub mod payments;
pub mod pending_messages;
pub mod profiles;
pub mod subscribers;
