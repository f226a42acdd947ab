//! Coordinator error types.

use super::handle::HandleError;
use thiserror::Error;

/// Failures of the coordinator's external calls.
///
/// None of these reach the controller. Public coordinator operations log
/// them and abort.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The request to the embed-config endpoint could not be completed
    #[error("Embed config request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Embed config endpoint returned {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response body was not the expected JSON shape
    #[error("Embed config response could not be decoded: {0}")]
    Decode(String),

    #[error("Page retrieval failed: {0}")]
    Pages(#[source] HandleError),

    #[error("Report has no pages")]
    NoPages,

    #[error("Filter application failed: {0}")]
    Filters(#[source] HandleError),
}
