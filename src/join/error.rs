//! Error types for fragment reassembly.

use serde::Serialize;
use thiserror::Error;

/// The concatenation command for one fragment set did not succeed.
///
/// The source fragments are left in place when this is reported.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("failed to join {base} (exit code {code}): {stderr}")]
pub struct ConcatenationFailure {
    /// Base name of the fragment set.
    pub base: String,
    /// Exit code of the command; -1 if it could not be started or was killed.
    pub code: i32,
    /// Captured standard error.
    pub stderr: String,
}
