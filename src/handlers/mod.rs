pub mod admin_handlers;
pub mod auth_handlers;
pub mod feedback_handlers;
pub mod hub_handlers;
pub mod pulse_handlers;
