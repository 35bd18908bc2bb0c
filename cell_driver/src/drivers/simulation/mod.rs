//! Simulation backend.
//!
//! This module provides an in-memory GPIO port and AT channel for
//! development and testing without physical hardware.

mod at;
mod gpio;

pub use at::SimAtClient;
pub use gpio::{GpioOp, SimGpioPort, SIM_PORT_ERROR_CODE};
