//! Error types for the merge layer.

use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Hard merge failures. These are caller bugs; ordinary conflicts are
/// reported as [`crate::MergeConflict`] values instead.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The two sides are different entities.
    #[error("cannot merge {kind} {local} with {kind} {remote}: ids differ")]
    IdMismatch {
        kind: &'static str,
        local: String,
        remote: String,
    },

    /// The two snapshots belong to different trips.
    #[error("cannot merge snapshots of trip {local} and trip {remote}")]
    TripMismatch { local: String, remote: String },
}
