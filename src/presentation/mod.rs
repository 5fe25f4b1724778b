// Presentation layer - HTTP handlers and responses
pub mod app_state;
pub mod error;
pub mod handlers;
