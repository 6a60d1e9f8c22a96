//! Shared types, config, and error definitions for lolstats.

pub mod config;
pub mod error;
pub mod region;
pub mod riot_id;
pub mod types;

pub use config::AppConfig;
pub use error::Error;
pub use riot_id::RiotId;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
