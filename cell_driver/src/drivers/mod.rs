//! Port backends.
//!
//! This module contains implementations of the port interfaces consumed by
//! the driver:
//!
//! - [`simulation`] - In-memory GPIO and AT channel for development and testing
//!
//! # Adding New Backends
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement `GpioPort` and `AtClient` from `cell_common::port`
//! 3. Hand the GPIO port to `CellDriver::new()`

pub mod simulation;
