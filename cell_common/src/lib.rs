//! Cellular Common Library
//!
//! This crate provides the shared types used by the cellular driver
//! workspace: the error taxonomy, handle limits, the collaborator
//! interfaces consumed by the driver (GPIO port and AT channel), the static
//! module-description table and the per-instance network value types.
//!
//! # Module Structure
//!
//! - [`consts`] - Handle ranges and fixed sizes
//! - [`error`] - Shared error taxonomy (`CellError`, `PortError`)
//! - [`port`] - GPIO and AT channel interfaces
//! - [`module`] - Module types and their static timing profiles
//! - [`net`] - Network status, radio parameters, scan results, security context
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use cell_common::prelude::*;
//!
//! let profile = ModuleType::SaraR5.profile();
//! assert!(profile.at_timeout().as_secs() > 0);
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod module;
pub mod net;
pub mod port;
pub mod prelude;
