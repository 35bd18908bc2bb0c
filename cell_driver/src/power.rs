//! Power-pin bring-up for a new instance.
//!
//! Pins are configured in a fixed order and the sequence stops at the
//! first failure:
//!
//! | Step | Pin | Level (unless leave-power-alone) | Configuration |
//! |------|-----|----------------------------------|---------------|
//! | 1 | PWR_ON | driven high first | output, open drain, pull-up |
//! | 2 | enable-power | forced off (else read back and kept) | input/output, normal, no pull |
//! | 3 | VINT | never driven | input |
//!
//! Pins already configured when a later step fails are left as they are.

use crate::instance::PinAssignment;
use cell_common::error::{CellResult, PortError};
use cell_common::port::{
    GpioConfig, GpioDirection, GpioDriveMode, GpioLevel, GpioPort, GpioPullMode, Pin,
};
use tracing::{debug, error, info};

/// Applies the bring-up sequence through a GPIO port.
pub struct PowerSequencer<'a, G: GpioPort + ?Sized> {
    gpio: &'a G,
}

impl<'a, G: GpioPort + ?Sized> PowerSequencer<'a, G> {
    /// Create a sequencer over a GPIO port.
    pub fn new(gpio: &'a G) -> Self {
        Self { gpio }
    }

    /// Run the full sequence.
    ///
    /// # Errors
    /// `CellError::Platform` carrying the first port failure.
    pub fn sequence(&self, pins: &PinAssignment, leave_power_alone: bool) -> CellResult<()> {
        info!(
            "Initialising with enable power pin {}, PWR_ON pin {}{} and VInt pin {}",
            describe(pins.enable_power),
            describe(pins.pwr_on),
            if leave_power_alone {
                ", leaving the level of both those pins alone,"
            } else {
                ""
            },
            describe(pins.vint),
        );

        if let Some(pin) = pins.pwr_on {
            self.pwr_on(pin, leave_power_alone)
                .inspect_err(|e| error!("PWR_ON pin setup failed: {e}"))?;
        }
        if let Some(pin) = pins.enable_power {
            self.enable_power(pin, leave_power_alone)
                .inspect_err(|e| error!("Enable power pin setup failed: {e}"))?;
        }
        if let Some(pin) = pins.vint {
            self.vint(pin)
                .inspect_err(|e| error!("VInt pin setup failed: {e}"))?;
        }
        Ok(())
    }

    /// PWR_ON: high first so it can later be pulled low, then open drain
    /// with pull-up so the module's own pull-up floats it when released.
    fn pwr_on(&self, pin: Pin, leave_power_alone: bool) -> Result<(), PortError> {
        if !leave_power_alone {
            self.gpio.set(pin, GpioLevel::High)?;
        }
        self.gpio.configure(
            &GpioConfig::new(pin)
                .direction(GpioDirection::Output)
                .drive_mode(GpioDriveMode::OpenDrain)
                .pull_mode(GpioPullMode::PullUp),
        )?;
        debug!("PWR_ON pin {pin} configured");
        Ok(())
    }

    /// Enable-power: input/output so the level can be read back.
    fn enable_power(&self, pin: Pin, leave_power_alone: bool) -> Result<(), PortError> {
        self.gpio.configure(
            &GpioConfig::new(pin)
                .direction(GpioDirection::InputOutput)
                .drive_mode(GpioDriveMode::Normal)
                .pull_mode(GpioPullMode::None),
        )?;
        let current = self.gpio.get(pin)?;
        let level = if leave_power_alone {
            current
        } else {
            GpioLevel::Low
        };
        self.gpio.set(pin, level)?;
        debug!("Enable power pin {pin} configured, level {level:?}");
        Ok(())
    }

    /// VINT: monitored only, never driven.
    fn vint(&self, pin: Pin) -> Result<(), PortError> {
        self.gpio.configure(
            &GpioConfig::new(pin)
                .direction(GpioDirection::Input)
                .drive_mode(GpioDriveMode::Normal)
                .pull_mode(GpioPullMode::None),
        )?;
        debug!("VInt pin {pin} configured");
        Ok(())
    }
}

/// Run the bring-up sequence, mapping failures to `CellError`.
pub fn power_up_pins<G: GpioPort + ?Sized>(
    gpio: &G,
    pins: &PinAssignment,
    leave_power_alone: bool,
) -> CellResult<()> {
    PowerSequencer::new(gpio).sequence(pins, leave_power_alone)
}

fn describe(pin: Option<Pin>) -> String {
    pin.map_or_else(|| "not connected".to_string(), |p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::simulation::{GpioOp, SimGpioPort};
    use cell_common::error::{CellError, PortOp};

    fn pins(enable: i32, pwr_on: i32, vint: i32) -> PinAssignment {
        PinAssignment::from_raw(enable, pwr_on, vint)
    }

    #[test]
    fn no_pins_does_nothing() {
        let gpio = SimGpioPort::new();
        power_up_pins(&gpio, &pins(-1, -1, -1), false).unwrap();
        assert!(gpio.journal().is_empty());
    }

    #[test]
    fn full_sequence_order() {
        let gpio = SimGpioPort::new();
        power_up_pins(&gpio, &pins(5, 26, 27), false).unwrap();

        let ops = gpio.journal();
        assert_eq!(
            ops,
            vec![
                GpioOp::Set(Pin::new(26), GpioLevel::High),
                GpioOp::Configure(
                    GpioConfig::new(Pin::new(26))
                        .direction(GpioDirection::Output)
                        .drive_mode(GpioDriveMode::OpenDrain)
                        .pull_mode(GpioPullMode::PullUp)
                ),
                GpioOp::Configure(
                    GpioConfig::new(Pin::new(5)).direction(GpioDirection::InputOutput)
                ),
                GpioOp::Get(Pin::new(5)),
                GpioOp::Set(Pin::new(5), GpioLevel::Low),
                GpioOp::Configure(GpioConfig::new(Pin::new(27))),
            ]
        );
    }

    #[test]
    fn enable_power_forced_off() {
        let gpio = SimGpioPort::new();
        gpio.set_input_level(Pin::new(5), GpioLevel::High);
        power_up_pins(&gpio, &pins(5, -1, -1), false).unwrap();
        assert_eq!(gpio.level(Pin::new(5)), Some(GpioLevel::Low));
    }

    #[test]
    fn leave_power_alone_keeps_levels() {
        let gpio = SimGpioPort::new();
        gpio.set_input_level(Pin::new(5), GpioLevel::High);
        power_up_pins(&gpio, &pins(5, 26, -1), true).unwrap();

        // Enable power read back and written unchanged.
        assert_eq!(gpio.level(Pin::new(5)), Some(GpioLevel::High));
        // PWR_ON never driven, only configured.
        assert!(
            !gpio
                .journal()
                .contains(&GpioOp::Set(Pin::new(26), GpioLevel::High))
        );
        assert!(gpio.config(Pin::new(26)).is_some());
    }

    #[test]
    fn pwr_on_set_failure_aborts_before_configure() {
        let gpio = SimGpioPort::new();
        gpio.fail_on(PortOp::Set, Pin::new(26));
        let err = power_up_pins(&gpio, &pins(5, 26, 27), false).unwrap_err();
        assert!(matches!(err, CellError::Platform(_)));
        assert!(gpio.config(Pin::new(26)).is_none());
        assert!(gpio.config(Pin::new(5)).is_none());
        assert!(gpio.config(Pin::new(27)).is_none());
    }

    #[test]
    fn enable_power_failure_skips_vint_and_keeps_pwr_on() {
        let gpio = SimGpioPort::new();
        gpio.fail_on(PortOp::Configure, Pin::new(5));
        let err = power_up_pins(&gpio, &pins(5, 26, 27), false).unwrap_err();
        assert!(matches!(err, CellError::Platform(_)));
        // Earlier step is not rolled back.
        assert!(gpio.config(Pin::new(26)).is_some());
        assert!(gpio.config(Pin::new(27)).is_none());
    }

    #[test]
    fn enable_power_read_failure_is_platform_error() {
        let gpio = SimGpioPort::new();
        gpio.fail_on(PortOp::Get, Pin::new(5));
        let err = power_up_pins(&gpio, &pins(5, -1, -1), false).unwrap_err();
        assert!(matches!(err, CellError::Platform(_)));
        assert!(gpio.level(Pin::new(5)).is_none());
    }

    #[test]
    fn vint_is_plain_input_after_open_drain_pwr_on() {
        let gpio = SimGpioPort::new();
        power_up_pins(&gpio, &pins(-1, 26, 27), false).unwrap();
        assert_eq!(
            gpio.config(Pin::new(27)),
            Some(
                GpioConfig::new(Pin::new(27))
                    .direction(GpioDirection::Input)
                    .drive_mode(GpioDriveMode::Normal)
                    .pull_mode(GpioPullMode::None)
            )
        );
    }

    #[test]
    fn vint_failure_reported() {
        let gpio = SimGpioPort::new();
        gpio.fail_on(PortOp::Configure, Pin::new(27));
        assert!(power_up_pins(&gpio, &pins(-1, -1, 27), false).is_err());
    }
}
