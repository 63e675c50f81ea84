//! Dispatcher error types.

use storage::StorageError;
use thiserror::Error;

/// Failure that aborts a processing chain. Upstream service failures never surface here; the
/// facades turn them into fallback values.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
