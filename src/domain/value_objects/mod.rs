pub mod activity_logs;
pub mod enums;
pub mod monthly_stats;
pub mod operators;
pub mod payments;
pub mod pending_messages;
pub mod phone_numbers;
pub mod subscribers;
