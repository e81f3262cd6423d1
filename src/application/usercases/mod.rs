pub mod activity_logs;
pub mod message_queue;
pub mod monthly_stats;
pub mod subscribers;
pub mod user_admin;
