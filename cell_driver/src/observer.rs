//! Driver event observers.
//!
//! Observers receive a `DriverEvent` after the state transition it
//! describes has completed and the driver lock has been released. They
//! cannot change the result of the operation that produced the event, and
//! ordering holds per calling thread only.

use crate::handle::CellHandle;
use crate::instance::ReleasedResources;
use cell_common::error::CellError;
use cell_common::module::ModuleType;
use tracing::{info, warn};

/// State transitions reported by `CellDriver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// `init()` created the driver state.
    Initialised,
    /// An instance was added and is now live.
    InstanceAdded {
        /// Handle returned to the caller
        handle: CellHandle,
        /// Module type of the new instance
        module_type: ModuleType,
    },
    /// `add()` failed; nothing was registered.
    AddFailed {
        /// Error returned to the caller
        error: CellError,
    },
    /// An instance was unlinked and freed.
    InstanceRemoved {
        /// Handle of the removed instance
        handle: CellHandle,
    },
    /// Owned resources of an instance were freed.
    ResourcesReleased {
        /// Handle of the instance being torn down
        handle: CellHandle,
        /// What was actually freed
        released: ReleasedResources,
    },
    /// `deinit()` tore the driver down.
    Deinitialised {
        /// Number of instances torn down
        removed: usize,
    },
}

/// Receiver of driver events.
pub trait DriverObserver: Send + Sync {
    /// Called once per event, outside the driver lock.
    ///
    /// Events from one calling thread arrive in the order they happened.
    /// Events from different threads are not ordered against each other:
    /// an `InstanceRemoved` raised on one thread may be seen before the
    /// matching `InstanceAdded` raised on another.
    fn on_event(&self, event: &DriverEvent);
}

impl<F> DriverObserver for F
where
    F: Fn(&DriverEvent) + Send + Sync,
{
    fn on_event(&self, event: &DriverEvent) {
        self(event)
    }
}

/// Observer that writes every event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DriverObserver for TracingObserver {
    fn on_event(&self, event: &DriverEvent) {
        match event {
            DriverEvent::Initialised => info!("Cellular driver initialised"),
            DriverEvent::InstanceAdded {
                handle,
                module_type,
            } => info!("Added {module_type} instance, handle {handle}"),
            DriverEvent::AddFailed { error } => {
                warn!("Adding instance failed: {error} (code {})", error.code())
            }
            DriverEvent::InstanceRemoved { handle } => info!("Removed instance {handle}"),
            DriverEvent::ResourcesReleased { handle, released } => info!(
                "Instance {handle}: released scan results={}, security context={}",
                released.scan_results, released.security_context
            ),
            DriverEvent::Deinitialised { removed } => {
                info!("Cellular driver deinitialised, {removed} instance(s) removed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_are_observers() {
        let seen = Mutex::new(Vec::new());
        let observer = |e: &DriverEvent| seen.lock().unwrap().push(e.clone());
        observer.on_event(&DriverEvent::Initialised);
        observer.on_event(&DriverEvent::Deinitialised { removed: 0 });
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                DriverEvent::Initialised,
                DriverEvent::Deinitialised { removed: 0 }
            ]
        );
    }

    #[test]
    fn tracing_observer_accepts_all_events() {
        let observer = TracingObserver;
        observer.on_event(&DriverEvent::AddFailed {
            error: CellError::NoMemory,
        });
        observer.on_event(&DriverEvent::ResourcesReleased {
            handle: CellHandle::from_raw(100),
            released: ReleasedResources::default(),
        });
    }
}
