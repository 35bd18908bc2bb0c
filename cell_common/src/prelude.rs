//! Prelude module for common re-exports.
//!
//! ```rust
//! use cell_common::prelude::*;
//! ```

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{CellError, CellResult, PortError, PortOp};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{CellConfig, ConfigError, ConfigLoader, LogLevel, ModuleEntry, SharedConfig};

// ─── Limits ─────────────────────────────────────────────────────────
pub use crate::consts::{CELL_HANDLE_MAX, CELL_HANDLE_MIN, NUM_NET_REG_DOMAINS};

// ─── Ports ──────────────────────────────────────────────────────────
pub use crate::port::{
    AtClient, AtHandle, GpioConfig, GpioDirection, GpioDriveMode, GpioLevel, GpioPort,
    GpioPullMode, Pin,
};

// ─── Modules & network values ───────────────────────────────────────
pub use crate::module::{MODULE_PROFILES, ModuleProfile, ModuleType, Rats};
pub use crate::net::{
    NetRegDomain, NetStatus, NetworkStatus, RadioParameters, ScanResults, SecurityContext,
};
