//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! for the cellular driver and describes the modules attached to a board.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "cell-01"
//!
//! [driver]
//! handle_min = 100
//! handle_max = 109
//!
//! [[modules]]
//! module_type = "sara-r5"
//! at_channel = "uart1"
//! pin_enable_power = 5
//! pin_pwr_on = 26
//! pin_vint = -1
//! leave_power_alone = false
//! ```

use crate::consts::{CELL_HANDLE_MAX, CELL_HANDLE_MIN};
use crate::module::ModuleType;
use crate::port::Pin;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_handle_min() -> i32 {
    CELL_HANDLE_MIN
}

fn default_handle_max() -> i32 {
    CELL_HANDLE_MAX
}

fn not_connected() -> i32 {
    -1
}

/// `[driver]` section: handle range used for new instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverSection {
    /// Lowest handle handed out.
    #[serde(default = "default_handle_min")]
    pub handle_min: i32,

    /// Highest handle handed out.
    #[serde(default = "default_handle_max")]
    pub handle_max: i32,
}

impl Default for DriverSection {
    fn default() -> Self {
        Self {
            handle_min: CELL_HANDLE_MIN,
            handle_max: CELL_HANDLE_MAX,
        }
    }
}

/// One `[[modules]]` entry: a cellular module wired to the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
    /// Module type name, e.g. `"sara-r5"`.
    pub module_type: String,

    /// Name of the AT channel the module is attached to.
    pub at_channel: String,

    /// Enable-power pin; negative means not connected.
    #[serde(default = "not_connected")]
    pub pin_enable_power: i32,

    /// PWR_ON pin; negative means not connected.
    #[serde(default = "not_connected")]
    pub pin_pwr_on: i32,

    /// VINT monitor pin; negative means not connected.
    #[serde(default = "not_connected")]
    pub pin_vint: i32,

    /// Configure pins without forcing their level.
    #[serde(default)]
    pub leave_power_alone: bool,
}

impl ModuleEntry {
    /// Parsed module type.
    pub fn module_type(&self) -> Result<ModuleType, ConfigError> {
        self.module_type
            .parse()
            .map_err(|e: crate::error::CellError| ConfigError::ValidationError(e.to_string()))
    }

    /// Enable-power pin, if connected.
    pub fn enable_power(&self) -> Option<Pin> {
        Pin::from_raw(self.pin_enable_power)
    }

    /// PWR_ON pin, if connected.
    pub fn pwr_on(&self) -> Option<Pin> {
        Pin::from_raw(self.pin_pwr_on)
    }

    /// VINT pin, if connected.
    pub fn vint(&self) -> Option<Pin> {
        Pin::from_raw(self.pin_vint)
    }
}

/// Top-level cellular configuration (`cell.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellConfig {
    /// Common fields.
    pub shared: SharedConfig,

    /// Driver settings.
    #[serde(default)]
    pub driver: DriverSection,

    /// Attached modules.
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

impl CellConfig {
    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `shared` is valid
    /// 2. `handle_min <= handle_max`, both within the cellular handle range
    /// 3. Every `module_type` is known
    /// 4. AT channel names are unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let d = &self.driver;
        if d.handle_min > d.handle_max {
            return Err(ConfigError::ValidationError(format!(
                "handle_min {} is greater than handle_max {}",
                d.handle_min, d.handle_max
            )));
        }
        if d.handle_min < CELL_HANDLE_MIN || d.handle_max > CELL_HANDLE_MAX {
            return Err(ConfigError::ValidationError(format!(
                "handle range [{}, {}] outside cellular range [{CELL_HANDLE_MIN}, {CELL_HANDLE_MAX}]",
                d.handle_min, d.handle_max
            )));
        }

        let mut channels = HashSet::new();
        for entry in &self.modules {
            entry.module_type()?;
            if !channels.insert(entry.at_channel.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "AT channel '{}' used by more than one module",
                    entry.at_channel
                )));
            }
        }

        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
