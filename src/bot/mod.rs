/// Telegram implementation of the dispatch gateway
pub mod gateway;
/// Command handlers and message conversion
pub mod handlers;

pub use gateway::TelegramGateway;
pub use handlers::{inbound_event, Command};
