//! Riot Games API client library.
//!
//! Provides a token-bucket rate limiter and an authenticated REST client that
//! classifies upstream failures into typed errors, retries throttled calls and
//! serves finished matches from the match cache.

pub mod outcome;
pub mod rate_limit;
pub mod rest;

pub use outcome::UpstreamOutcome;
pub use rate_limit::RateLimiter;
pub use rest::{RetryPolicy, RiotClient};
