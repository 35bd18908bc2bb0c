//! Port interfaces consumed by the cellular driver.
//!
//! The driver does not touch hardware or the AT transport directly. It
//! consumes two narrow interfaces:
//! - [`GpioPort`] - blocking configure/get/set primitives for GPIO pins
//! - [`AtClient`] - the AT channel, used only to push timing constants
//!
//! # Timing Contracts
//!
//! | Operation | Blocking | Called under driver lock |
//! |-----------|----------|--------------------------|
//! | `GpioPort::configure()` | yes (bounded) | yes |
//! | `GpioPort::set()` / `get()` | yes (bounded) | yes |
//! | `AtClient::set_timeout()` / `set_command_delay()` | no | yes |

use crate::error::PortError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A connected GPIO pin number.
///
/// Pins that are not connected are represented as `Option::<Pin>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pin(u32);

impl Pin {
    /// Create a pin from a non-negative pin number.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Interpret a signed pin number, where negative means "not connected".
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    /// The pin number.
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.0, self.0)
    }
}

/// GPIO pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpioDirection {
    /// Input only.
    #[default]
    Input,
    /// Output only.
    Output,
    /// Output that can also be read back.
    InputOutput,
}

/// GPIO output drive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpioDriveMode {
    /// Push-pull.
    #[default]
    Normal,
    /// Open drain: drives low, floats when released.
    OpenDrain,
}

/// GPIO pull resistor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpioPullMode {
    /// No pull resistor.
    #[default]
    None,
    /// Pull-up.
    PullUp,
    /// Pull-down.
    PullDown,
}

/// GPIO logic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpioLevel {
    /// Logic 0.
    #[default]
    Low,
    /// Logic 1.
    High,
}

impl From<bool> for GpioLevel {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Electrical configuration for one GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioConfig {
    /// Pin to configure
    pub pin: Pin,
    /// Direction
    pub direction: GpioDirection,
    /// Output drive mode
    pub drive_mode: GpioDriveMode,
    /// Pull resistor
    pub pull_mode: GpioPullMode,
}

impl GpioConfig {
    /// Default configuration for a pin: input, normal drive, no pull.
    pub fn new(pin: Pin) -> Self {
        Self {
            pin,
            direction: GpioDirection::default(),
            drive_mode: GpioDriveMode::default(),
            pull_mode: GpioPullMode::default(),
        }
    }

    /// Set the direction.
    pub fn direction(mut self, direction: GpioDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the drive mode.
    pub fn drive_mode(mut self, drive_mode: GpioDriveMode) -> Self {
        self.drive_mode = drive_mode;
        self
    }

    /// Set the pull mode.
    pub fn pull_mode(mut self, pull_mode: GpioPullMode) -> Self {
        self.pull_mode = pull_mode;
        self
    }
}

/// Blocking GPIO primitives.
///
/// Implementations may block for a bounded, hardware-dependent time.
/// The driver calls these while holding its lock.
pub trait GpioPort: Send + Sync {
    /// Apply an electrical configuration to a pin.
    fn configure(&self, config: &GpioConfig) -> Result<(), PortError>;

    /// Drive a pin to a level.
    fn set(&self, pin: Pin, level: GpioLevel) -> Result<(), PortError>;

    /// Read the current level of a pin.
    fn get(&self, pin: Pin) -> Result<GpioLevel, PortError>;
}

impl<T: GpioPort + ?Sized> GpioPort for Arc<T> {
    fn configure(&self, config: &GpioConfig) -> Result<(), PortError> {
        (**self).configure(config)
    }

    fn set(&self, pin: Pin, level: GpioLevel) -> Result<(), PortError> {
        (**self).set(pin, level)
    }

    fn get(&self, pin: Pin) -> Result<GpioLevel, PortError> {
        (**self).get(pin)
    }
}

/// AT command channel, as far as the driver needs it.
///
/// The driver never issues AT commands; it only pushes the per-module
/// response timeout and inter-command delay when an instance is added.
pub trait AtClient: Send + Sync {
    /// Set the response timeout for AT commands.
    fn set_timeout(&self, timeout: Duration);

    /// Set the minimum delay between consecutive AT commands.
    fn set_command_delay(&self, delay: Duration);
}

/// Opaque, cloneable reference to an AT channel.
///
/// Two handles are equal only if they refer to the same channel object;
/// channel contents are never compared.
#[derive(Clone)]
pub struct AtHandle(Arc<dyn AtClient>);

impl AtHandle {
    /// Wrap a shared AT channel.
    pub fn new(client: Arc<dyn AtClient>) -> Self {
        Self(client)
    }

    /// Access the underlying channel.
    pub fn client(&self) -> &dyn AtClient {
        self.0.as_ref()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for AtHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for AtHandle {}

impl fmt::Debug for AtHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtHandle({:p})", self.addr())
    }
}
