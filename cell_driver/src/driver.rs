//! Cellular driver lifecycle.
//!
//! `CellDriver` owns the single driver lock. Everything behind it (the
//! instance registry and the handle counter) is only touched while the lock
//! is held, and `add()` keeps holding it across the GPIO bring-up and the AT
//! timing calls, so no caller can ever observe a half-built instance.
//!
//! Constructed once at startup and shared by reference (or `Arc`) between
//! the threads that use it. No global state.

use crate::handle::{CellHandle, HandleAllocator, HandleRange};
use crate::instance::{CellInstance, InstanceSummary, PinAssignment};
use crate::observer::{DriverEvent, DriverObserver};
use crate::power::power_up_pins;
use crate::registry::InstanceRegistry;
use cell_common::error::{CellError, CellResult};
use cell_common::module::{ModuleProfile, ModuleType, MODULE_PROFILES};
use cell_common::port::{AtHandle, GpioPort};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// State guarded by the driver lock.
#[derive(Debug)]
struct Shared {
    /// `None` while the driver is not initialised.
    registry: Option<InstanceRegistry>,
    /// Survives `deinit()`/`init()` cycles.
    allocator: HandleAllocator,
}

/// Process-wide cellular driver.
pub struct CellDriver<G: GpioPort> {
    gpio: G,
    profiles: &'static [ModuleProfile],
    observers: Vec<Arc<dyn DriverObserver>>,
    shared: Mutex<Shared>,
}

impl<G: GpioPort> CellDriver<G> {
    /// Create an uninitialised driver over a GPIO port, handing out handles
    /// from the cellular range and using the built-in module table.
    pub fn new(gpio: G) -> Self {
        Self {
            gpio,
            profiles: &MODULE_PROFILES,
            observers: Vec::new(),
            shared: Mutex::new(Shared {
                registry: None,
                allocator: HandleAllocator::new(HandleRange::cellular()),
            }),
        }
    }

    /// Hand out handles from `range` instead of the full cellular range.
    ///
    /// Resets the handle counter to the range minimum.
    pub fn with_handle_range(mut self, range: HandleRange) -> Self {
        self.shared_mut().allocator = HandleAllocator::new(range);
        self
    }

    /// Replace the module table. Module types are looked up by index, so a
    /// type whose index lies outside `profiles` is rejected by `add()`.
    pub fn with_module_table(mut self, profiles: &'static [ModuleProfile]) -> Self {
        self.profiles = profiles;
        self
    }

    /// Register an observer for driver events.
    pub fn with_observer(mut self, observer: Arc<dyn DriverObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The GPIO port this driver sequences pins through.
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Range handles are allocated from.
    pub fn handle_range(&self) -> HandleRange {
        self.lock().allocator.range()
    }

    /// Initialise the driver. Calling it again while initialised does
    /// nothing and succeeds.
    ///
    /// # Errors
    /// None in practice; kept fallible to match the other driver-level
    /// operations.
    pub fn init(&self) -> CellResult<()> {
        let created = {
            let mut shared = self.lock();
            if shared.registry.is_some() {
                false
            } else {
                shared.registry = Some(InstanceRegistry::new());
                true
            }
        };
        if created {
            self.notify(&[DriverEvent::Initialised]);
        } else {
            debug!("Cellular driver already initialised");
        }
        Ok(())
    }

    /// Tear down every instance and return to the uninitialised state.
    ///
    /// Does nothing if the driver is not initialised. The handle counter is
    /// kept, so handles keep rotating across re-initialisation.
    pub fn deinit(&self) {
        let mut events = Vec::new();
        {
            let mut shared = self.lock();
            let Some(mut registry) = shared.registry.take() else {
                debug!("Cellular driver not initialised, nothing to deinitialise");
                return;
            };
            let mut removed = 0;
            for mut instance in registry.drain() {
                let released = instance.release_resources();
                events.push(DriverEvent::ResourcesReleased {
                    handle: instance.handle(),
                    released,
                });
                events.push(DriverEvent::InstanceRemoved {
                    handle: instance.handle(),
                });
                removed += 1;
            }
            events.push(DriverEvent::Deinitialised { removed });
        }
        self.notify(&events);
    }

    /// Whether `init()` has been called since the last `deinit()`.
    pub fn is_initialised(&self) -> bool {
        self.lock().registry.is_some()
    }

    /// Add an instance for a module attached through `at_handle`.
    ///
    /// Allocates a handle, brings up the module's power pins, pushes the
    /// module's AT timing to the channel and registers the instance. All of
    /// it happens under the driver lock.
    ///
    /// # Errors
    /// - `NotInitialised` before `init()`
    /// - `InvalidParameter` if the module type is not in the module table or
    ///   an instance already uses `at_handle`
    /// - `NoMemory` if the record or a handle cannot be allocated
    /// - `Platform` if any pin step fails; nothing is registered and pins
    ///   already configured stay as they are
    pub fn add(
        &self,
        module_type: ModuleType,
        at_handle: &AtHandle,
        pins: PinAssignment,
        leave_power_alone: bool,
    ) -> CellResult<CellHandle> {
        let result = self.add_locked(module_type, at_handle, pins, leave_power_alone);
        match &result {
            Ok(handle) => self.notify(&[DriverEvent::InstanceAdded {
                handle: *handle,
                module_type,
            }]),
            Err(error) => self.notify(&[DriverEvent::AddFailed {
                error: error.clone(),
            }]),
        }
        result
    }

    fn add_locked(
        &self,
        module_type: ModuleType,
        at_handle: &AtHandle,
        pins: PinAssignment,
        leave_power_alone: bool,
    ) -> CellResult<CellHandle> {
        let mut guard = self.lock();
        let Shared { registry, allocator } = &mut *guard;
        let registry = registry.as_mut().ok_or(CellError::NotInitialised)?;

        let profile = self.profiles.get(module_type.index()).ok_or_else(|| {
            CellError::InvalidParameter(format!("module type {module_type} not in module table"))
        })?;
        if let Some(existing) = registry.find_by_at_handle(at_handle) {
            warn!("AT channel already in use by instance {}", existing.handle());
            return Err(CellError::InvalidParameter(format!(
                "AT channel already used by instance {}",
                existing.handle()
            )));
        }

        registry.reserve_one()?;
        let handle = allocator.allocate(|h| registry.contains(h))?;
        let instance =
            CellInstance::new(handle, at_handle.clone(), pins, leave_power_alone, profile);

        info!("Adding {module_type} instance, handle {handle}");
        if let Err(e) = power_up_pins(&self.gpio, &pins, leave_power_alone) {
            error!("Bring-up of instance {handle} failed, discarding it: {e}");
            return Err(e);
        }

        let at = at_handle.client();
        at.set_timeout(profile.at_timeout());
        at.set_command_delay(profile.command_delay());

        registry.insert(instance);
        Ok(handle)
    }

    /// Remove an instance and free its resources. Unknown handles, and any
    /// call while not initialised, are ignored.
    pub fn remove(&self, handle: CellHandle) {
        let events = {
            let mut shared = self.lock();
            let Some(registry) = shared.registry.as_mut() else {
                return;
            };
            let Some(mut instance) = registry.remove(handle) else {
                debug!("Remove of unknown instance {handle} ignored");
                return;
            };
            let released = instance.release_resources();
            [
                DriverEvent::ResourcesReleased { handle, released },
                DriverEvent::InstanceRemoved { handle },
            ]
        };
        self.notify(&events);
    }

    /// AT channel of an instance.
    ///
    /// # Errors
    /// `NotInitialised` before `init()`, `InvalidParameter` for an unknown
    /// handle.
    pub fn at_client_handle(&self, handle: CellHandle) -> CellResult<AtHandle> {
        self.with_instance(handle, |instance| instance.at_handle().clone())
    }

    /// Run `f` against a live instance, under the driver lock.
    ///
    /// # Errors
    /// `NotInitialised` before `init()`, `InvalidParameter` for an unknown
    /// handle.
    pub fn with_instance<R>(
        &self,
        handle: CellHandle,
        f: impl FnOnce(&CellInstance) -> R,
    ) -> CellResult<R> {
        let shared = self.lock();
        let registry = shared.registry.as_ref().ok_or(CellError::NotInitialised)?;
        registry.get(handle).map(f).ok_or_else(|| unknown(handle))
    }

    /// Run `f` against a live instance with write access, under the driver
    /// lock. This is how the network and radio layers update the status and
    /// signal fields of an instance.
    ///
    /// # Errors
    /// `NotInitialised` before `init()`, `InvalidParameter` for an unknown
    /// handle.
    pub fn with_instance_mut<R>(
        &self,
        handle: CellHandle,
        f: impl FnOnce(&mut CellInstance) -> R,
    ) -> CellResult<R> {
        let mut shared = self.lock();
        let registry = shared.registry.as_mut().ok_or(CellError::NotInitialised)?;
        registry.get_mut(handle).map(f).ok_or_else(|| unknown(handle))
    }

    /// Number of live instances; zero while not initialised.
    pub fn instance_count(&self) -> usize {
        self.lock().registry.as_ref().map_or(0, InstanceRegistry::len)
    }

    /// Live handles, sorted.
    pub fn handles(&self) -> Vec<CellHandle> {
        self.lock()
            .registry
            .as_ref()
            .map_or_else(Vec::new, InstanceRegistry::handles)
    }

    /// Snapshot of every live instance, sorted by handle.
    pub fn summaries(&self) -> Vec<InstanceSummary> {
        let shared = self.lock();
        let Some(registry) = shared.registry.as_ref() else {
            return Vec::new();
        };
        let mut summaries: Vec<InstanceSummary> =
            registry.iter().map(CellInstance::summary).collect();
        summaries.sort_unstable_by_key(|s| s.handle);
        summaries
    }

    /// A panic while the lock was held cannot leave the registry torn:
    /// insertion is the last step of `add()` and removal is a single map
    /// operation. Poisoning is therefore ignored.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn shared_mut(&mut self) -> &mut Shared {
        self.shared.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, events: &[DriverEvent]) {
        for event in events {
            for observer in &self.observers {
                observer.on_event(event);
            }
        }
    }
}

impl<G: GpioPort> std::fmt::Debug for CellDriver<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellDriver")
            .field("module_table_len", &self.profiles.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

fn unknown(handle: CellHandle) -> CellError {
    CellError::InvalidParameter(format!("unknown instance handle {handle}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::simulation::{SimAtClient, SimGpioPort};
    use cell_common::error::PortOp;
    use cell_common::net::{NetRegDomain, NetStatus};
    use cell_common::port::Pin;

    fn at(name: &str) -> AtHandle {
        AtHandle::new(Arc::new(SimAtClient::new(name)))
    }

    fn driver() -> CellDriver<SimGpioPort> {
        let driver = CellDriver::new(SimGpioPort::new());
        driver.init().unwrap();
        driver
    }

    #[test]
    fn add_before_init_fails() {
        let driver = CellDriver::new(SimGpioPort::new());
        let err = driver
            .add(ModuleType::SaraR5, &at("a"), PinAssignment::default(), false)
            .unwrap_err();
        assert_eq!(err, CellError::NotInitialised);
        assert_eq!(
            driver.at_client_handle(CellHandle::from_raw(100)),
            Err(CellError::NotInitialised)
        );
    }

    #[test]
    fn init_is_idempotent() {
        let driver = driver();
        let h = driver
            .add(ModuleType::SaraR5, &at("a"), PinAssignment::default(), false)
            .unwrap();
        driver.init().unwrap();
        assert_eq!(driver.handles(), vec![h]);
    }

    #[test]
    fn first_handle_is_range_min() {
        let driver = driver();
        let h = driver
            .add(ModuleType::SaraU201, &at("a"), PinAssignment::default(), false)
            .unwrap();
        assert_eq!(h.get(), 100);
        assert!(driver.handle_range().contains(h));
    }

    #[test]
    fn platform_failure_discards_record() {
        let driver = driver();
        driver.gpio().fail_on(PortOp::Configure, Pin::new(5));
        let err = driver
            .add(
                ModuleType::SaraR5,
                &at("a"),
                PinAssignment::from_raw(5, -1, -1),
                false,
            )
            .unwrap_err();
        assert!(matches!(err, CellError::Platform(_)));
        assert_eq!(driver.instance_count(), 0);
    }

    #[test]
    fn with_instance_mut_updates_status() {
        let driver = driver();
        let h = driver
            .add(ModuleType::SaraR5, &at("a"), PinAssignment::default(), false)
            .unwrap();
        driver
            .with_instance_mut(h, |inst| {
                inst.network_status
                    .set(NetRegDomain::Ps, NetStatus::RegisteredHome)
            })
            .unwrap();
        let registered = driver
            .with_instance(h, |inst| inst.network_status.is_registered())
            .unwrap();
        assert!(registered);
        assert!(matches!(
            driver.with_instance(CellHandle::from_raw(199), |_| ()),
            Err(CellError::InvalidParameter(_))
        ));
    }

    #[test]
    fn deinit_then_reinit_keeps_counter() {
        let driver = driver();
        let first = driver
            .add(ModuleType::SaraR5, &at("a"), PinAssignment::default(), false)
            .unwrap();
        driver.deinit();
        assert!(!driver.is_initialised());
        assert_eq!(driver.instance_count(), 0);

        driver.init().unwrap();
        let second = driver
            .add(ModuleType::SaraR5, &at("a"), PinAssignment::default(), false)
            .unwrap();
        assert_eq!(second.get(), first.get() + 1);
    }

    #[test]
    fn summaries_sorted_by_handle() {
        let driver = driver();
        for name in ["a", "b", "c"] {
            driver
                .add(ModuleType::SaraR412m02b, &at(name), PinAssignment::default(), false)
                .unwrap();
        }
        let handles: Vec<i32> = driver.summaries().iter().map(|s| s.handle.get()).collect();
        assert_eq!(handles, vec![100, 101, 102]);
    }
}
