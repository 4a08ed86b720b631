//! Error types for the Triangle engine
//!
//! This module defines the error types used throughout the engine,
//! including initialization, frame recording and backend failures.

use std::fmt;

/// Result type for Triangle engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Triangle engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Direct3D 12, DXGI, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (handle, shader file, descriptor index, etc.)
    InvalidResource(String),

    /// Initialization failed (device, adapter, swap chain, configuration)
    InitializationFailed(String),

    /// Operation issued before `initialize()` or after `cleanup()`
    NotInitialized(String),

    /// Resource barrier does not match the tracked resource state
    InvalidResourceState(String),

    /// Command list used in the wrong recording state
    InvalidCommandListState(String),

    /// The GPU device was removed or reset
    DeviceLost(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::NotInitialized(msg) => write!(f, "Not initialized: {}", msg),
            Error::InvalidResourceState(msg) => write!(f, "Invalid resource state: {}", msg),
            Error::InvalidCommandListState(msg) => write!(f, "Invalid command list state: {}", msg),
            Error::DeviceLost(msg) => write!(f, "Device lost: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Whether this error invalidates the whole graphics context
    ///
    /// Frame errors such as a bad barrier only abort the current frame.
    /// Device loss and initialization failures leave nothing to render with.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::DeviceLost(_)
                | Error::OutOfMemory
                | Error::InitializationFailed(_)
                | Error::NotInitialized(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
