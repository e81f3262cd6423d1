pub mod activity_logs;
pub mod monthly_stats;
pub mod pending_messages;
pub mod subscribers;
pub mod users;
