//! # Cellular Driver Library
//!
//! Instance lifecycle for cellular modules attached over an AT channel.
//!
//! This crate provides the `CellDriver` (one per process) and the pieces it
//! is built from. Port collaborators (`GpioPort`, `AtClient`) and shared
//! types live in `cell_common`.
//!
//! # Module Structure
//!
//! - [`driver`] - CellDriver: init/deinit, add/remove, AT handle lookup
//! - [`handle`] - Handle range and round-robin allocator
//! - [`registry`] - Arena of live instances
//! - [`instance`] - Instance record and pin assignment
//! - [`power`] - Power-pin bring-up sequence
//! - [`observer`] - Driver event observers
//! - [`drivers`] - Port backends (simulation)
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    CellDriver (one lock)                   │
//! │  ┌────────────────┐   ┌──────────────────┐                 │
//! │  │ HandleAllocator│   │ InstanceRegistry │                 │
//! │  └────────────────┘   └──────────────────┘                 │
//! │            │ add()                                         │
//! │            ▼                                               │
//! │  ┌────────────────┐        ┌──────────────┐                │
//! │  │ PowerSequencer │───────►│  GpioPort    │ (trait)        │
//! │  └────────────────┘        └──────────────┘                │
//! │            │               ┌──────────────┐                │
//! │            └──────────────►│  AtClient    │ (trait)        │
//! │                            └──────────────┘                │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use cell_driver::drivers::simulation::{SimAtClient, SimGpioPort};
//! use cell_driver::{CellDriver, PinAssignment};
//! use cell_common::module::ModuleType;
//! use cell_common::port::AtHandle;
//! use std::sync::Arc;
//!
//! let driver = CellDriver::new(SimGpioPort::new());
//! driver.init().unwrap();
//!
//! let at = AtHandle::new(Arc::new(SimAtClient::new("uart1")));
//! let pins = PinAssignment::from_raw(5, -1, -1);
//! let handle = driver.add(ModuleType::SaraR5, &at, pins, false).unwrap();
//! assert_eq!(driver.at_client_handle(handle).unwrap(), at);
//!
//! driver.deinit();
//! ```

#![deny(missing_docs)]

pub mod driver;
pub mod drivers;
pub mod handle;
pub mod instance;
pub mod observer;
pub mod power;
pub mod registry;

// Re-export key types for convenience
pub use crate::driver::CellDriver;
pub use crate::handle::{CellHandle, HandleAllocator, HandleRange};
pub use crate::instance::{CellInstance, InstanceSummary, PinAssignment, ReleasedResources};
pub use crate::observer::{DriverEvent, DriverObserver, TracingObserver};
pub use crate::registry::InstanceRegistry;
