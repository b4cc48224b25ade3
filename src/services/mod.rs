// Service exports
pub mod ai;
pub mod anthropic;
pub mod postgres;

pub use ai::{fallback_conversation_starters, AiError, AiService};
pub use anthropic::{AnthropicClient, GatewayError};
pub use postgres::{birth_date_window, PostgresClient, PostgresError, MAX_EVENT_CANDIDATES};
