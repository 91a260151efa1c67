pub mod config;
pub mod error;
pub mod logging;
pub mod moderation;
mod retry;
mod service;
mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{ModerationError, Result, ServiceError};
pub use moderation::{HttpModerator, KeywordModerator, Moderator};
pub use retry::calculate_backoff_delay;
pub use service::AvatarJobService;
pub use store::JobStore;
