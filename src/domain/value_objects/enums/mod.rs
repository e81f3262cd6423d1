pub mod action_types;
pub mod app_roles;
pub mod message_statuses;
pub mod payment_statuses;
