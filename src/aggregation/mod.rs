//! Gamepass aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! Identity (handle | id)
//!     → pipeline.rs (resolve, list, enumerate, fetch details, merge)
//!     → pagination.rs (cursor tracking with loop guards)
//!     → types.rs (AggregateResult / GamesResult)
//! ```
//!
//! # Failure Policy
//! - Resolution failure and listing failure abort the request
//! - Page and detail failures are absorbed and logged
//! - Nothing is retried

pub mod error;
pub mod pagination;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::AggregateError;
pub use pipeline::Aggregator;
pub use types::{
    AggregateResult, AggregatedGamepass, Experience, GameSummary, GamepassDetail,
    GamepassSummary, GamesResult, Identity, ParseUserIdError, UserId,
};
