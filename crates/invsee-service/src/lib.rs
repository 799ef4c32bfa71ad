//! Remote container access service.
//!
//! Wires the core access logic to a host game server: a single-writer
//! interactive loop processes open and search requests, hands slow loads of
//! disconnected players to the blocking pool, and delivers every outcome
//! back through the host (messages) or the presenter (views).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod search;

pub use config::ServiceConfig;
pub use coordinator::{AccessService, ServiceHandle, ViewPresenter};
pub use error::OpenError;
pub use search::EnchantQuery;
