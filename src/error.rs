// topo2d: planar topology graph and distance engine
// License: MIT

use thiserror::Error;

/// Failure kinds for the topology/distance engine.
///
/// `InvalidArgument` means the caller handed us input the operation cannot be
/// defined on (e.g. asking for nearest points of an empty geometry).
/// `InternalInvariant` means a bookkeeping invariant of this engine was
/// violated; it indicates a bug here, not malformed input, and retrying with
/// the same input will fail identically.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
