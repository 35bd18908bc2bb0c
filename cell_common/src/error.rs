//! Shared error taxonomy.
//!
//! This module defines:
//! - `CellError` enum - Errors returned by driver-level operations
//! - `PortError` struct - Failure reported by a port (GPIO) primitive
//! - `CellResult` type alias
//!
//! Every error maps onto the shared numeric code convention through
//! [`CellError::code`], so layers that still speak integer return codes
//! can convert without a bespoke table.

use crate::port::Pin;
use thiserror::Error;

/// Numeric code for success.
pub const ERROR_CODE_SUCCESS: i32 = 0;

/// Numeric code for "not initialised".
pub const ERROR_CODE_NOT_INITIALISED: i32 = -2;

/// Numeric code for a platform (port) failure.
pub const ERROR_CODE_PLATFORM: i32 = -3;

/// Numeric code for an invalid parameter.
pub const ERROR_CODE_INVALID_PARAMETER: i32 = -5;

/// Numeric code for a failed allocation.
pub const ERROR_CODE_NO_MEMORY: i32 = -6;

/// Error types for cellular driver operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Driver-level operation called before `init()`
    #[error("Cellular driver not initialised")]
    NotInitialised,

    /// Bad module type, duplicate AT handle or unknown instance handle
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Record or handle allocation failed
    #[error("Out of memory")]
    NoMemory,

    /// GPIO configuration, read or write failed during bring-up
    #[error("Platform error: {0}")]
    Platform(String),
}

impl CellError {
    /// Numeric code of this error in the shared taxonomy.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotInitialised => ERROR_CODE_NOT_INITIALISED,
            Self::InvalidParameter(_) => ERROR_CODE_INVALID_PARAMETER,
            Self::NoMemory => ERROR_CODE_NO_MEMORY,
            Self::Platform(_) => ERROR_CODE_PLATFORM,
        }
    }
}

/// Result alias for cellular driver operations.
pub type CellResult<T> = Result<T, CellError>;

/// Failure reported by a GPIO port primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{op} on pin {pin} returned error code {code}")]
pub struct PortError {
    /// Primitive that failed
    pub op: PortOp,
    /// Pin the primitive was applied to
    pub pin: Pin,
    /// Platform error code (negative)
    pub code: i32,
}

/// Port primitive identifier, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortOp {
    /// `GpioPort::configure`
    Configure,
    /// `GpioPort::set`
    Set,
    /// `GpioPort::get`
    Get,
}

impl std::fmt::Display for PortOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configure => f.write_str("gpio configure"),
            Self::Set => f.write_str("gpio set"),
            Self::Get => f.write_str("gpio get"),
        }
    }
}

impl From<PortError> for CellError {
    fn from(err: PortError) -> Self {
        CellError::Platform(err.to_string())
    }
}
