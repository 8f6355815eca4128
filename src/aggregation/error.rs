//! Failures that abort an aggregation.
//!
//! Enumeration and detail failures never show up here: they are absorbed
//! inside the pipeline and only logged.

use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// Handle lookup failed or matched nobody.
    #[error("user '{handle}' could not be resolved")]
    Resolution { handle: String },

    /// The experience listing call failed.
    #[error("Failed to fetch user experiences: {0}")]
    Listing(#[source] UpstreamError),
}
