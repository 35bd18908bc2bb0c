//! Simulated GPIO port.
//!
//! The `SimGpioPort` keeps:
//! - Applied pin configurations
//! - Driven output levels, and externally applied input levels
//! - Per-pin failure injection for each primitive
//! - A journal of every primitive that succeeded, in call order

use cell_common::error::{PortError, PortOp};
use cell_common::port::{GpioConfig, GpioLevel, GpioPort, Pin};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::trace;

/// Error code returned by injected failures.
pub const SIM_PORT_ERROR_CODE: i32 = -1;

/// One primitive applied to the simulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioOp {
    /// `configure()` with this configuration
    Configure(GpioConfig),
    /// `set()` of a pin to a level
    Set(Pin, GpioLevel),
    /// `get()` of a pin
    Get(Pin),
}

#[derive(Debug, Default)]
struct SimGpioState {
    configs: HashMap<Pin, GpioConfig>,
    driven: HashMap<Pin, GpioLevel>,
    inputs: HashMap<Pin, GpioLevel>,
    failures: HashSet<(PortOp, Pin)>,
    journal: Vec<GpioOp>,
}

/// In-memory GPIO port.
#[derive(Debug, Default)]
pub struct SimGpioPort {
    state: Mutex<SimGpioState>,
}

impl SimGpioPort {
    /// Create a port with every pin unconfigured and low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `op` fail on `pin` until cleared.
    pub fn fail_on(&self, op: PortOp, pin: Pin) {
        self.lock().failures.insert((op, pin));
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Level applied to a pin from outside (what `get()` sees before the
    /// pin is driven).
    pub fn set_input_level(&self, pin: Pin, level: GpioLevel) {
        self.lock().inputs.insert(pin, level);
    }

    /// Last configuration applied to a pin.
    pub fn config(&self, pin: Pin) -> Option<GpioConfig> {
        self.lock().configs.get(&pin).copied()
    }

    /// Last level driven onto a pin.
    pub fn level(&self, pin: Pin) -> Option<GpioLevel> {
        self.lock().driven.get(&pin).copied()
    }

    /// Successful primitives, in call order.
    pub fn journal(&self) -> Vec<GpioOp> {
        self.lock().journal.clone()
    }

    /// Forget the journal, keeping pin state.
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimGpioState> {
        self.state.lock().expect("SimGpioPort lock poisoned")
    }

    fn check(state: &SimGpioState, op: PortOp, pin: Pin) -> Result<(), PortError> {
        if state.failures.contains(&(op, pin)) {
            trace!("Injected {op} failure on pin {pin}");
            return Err(PortError {
                op,
                pin,
                code: SIM_PORT_ERROR_CODE,
            });
        }
        Ok(())
    }
}

impl GpioPort for SimGpioPort {
    fn configure(&self, config: &GpioConfig) -> Result<(), PortError> {
        let mut state = self.lock();
        Self::check(&state, PortOp::Configure, config.pin)?;
        state.configs.insert(config.pin, *config);
        state.journal.push(GpioOp::Configure(*config));
        trace!("Configured pin {}: {:?}", config.pin, config);
        Ok(())
    }

    fn set(&self, pin: Pin, level: GpioLevel) -> Result<(), PortError> {
        let mut state = self.lock();
        Self::check(&state, PortOp::Set, pin)?;
        state.driven.insert(pin, level);
        state.journal.push(GpioOp::Set(pin, level));
        Ok(())
    }

    fn get(&self, pin: Pin) -> Result<GpioLevel, PortError> {
        let mut state = self.lock();
        Self::check(&state, PortOp::Get, pin)?;
        let level = state
            .driven
            .get(&pin)
            .or_else(|| state.inputs.get(&pin))
            .copied()
            .unwrap_or_default();
        state.journal.push(GpioOp::Get(pin));
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_prefers_driven_level() {
        let gpio = SimGpioPort::new();
        let pin = Pin::new(4);
        assert_eq!(gpio.get(pin).unwrap(), GpioLevel::Low);

        gpio.set_input_level(pin, GpioLevel::High);
        assert_eq!(gpio.get(pin).unwrap(), GpioLevel::High);

        gpio.set(pin, GpioLevel::Low).unwrap();
        assert_eq!(gpio.get(pin).unwrap(), GpioLevel::Low);
    }

    #[test]
    fn injected_failure_and_clear() {
        let gpio = SimGpioPort::new();
        let pin = Pin::new(9);
        gpio.fail_on(PortOp::Configure, pin);

        let err = gpio.configure(&GpioConfig::new(pin)).unwrap_err();
        assert_eq!(err.code, SIM_PORT_ERROR_CODE);
        assert_eq!(err.op, PortOp::Configure);
        assert!(gpio.config(pin).is_none());
        assert!(gpio.journal().is_empty());

        gpio.clear_failures();
        gpio.configure(&GpioConfig::new(pin)).unwrap();
        assert_eq!(gpio.config(pin), Some(GpioConfig::new(pin)));
    }

    #[test]
    fn failure_is_per_op() {
        let gpio = SimGpioPort::new();
        let pin = Pin::new(2);
        gpio.fail_on(PortOp::Set, pin);
        assert!(gpio.configure(&GpioConfig::new(pin)).is_ok());
        assert!(gpio.set(pin, GpioLevel::High).is_err());
        assert!(gpio.get(pin).is_ok());
    }
}
