//! Error types for the Nebula3D engine
//!
//! This module defines the error types used throughout the engine,
//! covering argument validation, device failures, malformed assets,
//! and buffer layout invariants.

use std::fmt;

/// Result type for Nebula3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nebula3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, DirectX, etc.)
    BackendError(String),

    /// Out of GPU memory or a fixed-capacity pool is exhausted
    OutOfMemory,

    /// Invalid argument passed to an engine API (bad key, cycle, duplicate)
    InvalidArgument(String),

    /// Malformed or unsupported source asset data
    InvalidAsset(String),

    /// Repacked buffer layout does not match the precomputed offsets
    LayoutMismatch(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::InvalidAsset(msg) => write!(f, "Invalid asset: {}", msg),
            Error::LayoutMismatch(msg) => write!(f, "Buffer layout mismatch: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`] value and log it through `engine_error!`.
///
/// The variant must be one of the `String`-carrying [`Error`] variants.
///
/// # Example
///
/// ```no_run
/// use nebula_3d_engine::engine_err;
///
/// # fn demo() -> nebula_3d_engine::nebula3d::Result<()> {
/// let err = engine_err!("nebula3d::Scene", InvalidArgument, "Unknown node key");
/// # Err(err)
/// # }
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::nebula3d::Error::$variant(message)
    }};
}

/// Build an [`Error`] value, log it, and return it from the enclosing function.
///
/// # Example
///
/// ```no_run
/// use nebula_3d_engine::engine_bail;
///
/// # fn check(size: u64) -> nebula_3d_engine::nebula3d::Result<()> {
/// if size == 0 {
///     engine_bail!("nebula3d::Mesh", InvalidArgument, "Buffer size must be non-zero");
/// }
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $variant, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
