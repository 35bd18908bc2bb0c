//! Cellular instance record.
//!
//! One `CellInstance` exists per attached module. It is built completely
//! before it is inserted into the registry and is owned by the registry
//! until removal.

use crate::handle::CellHandle;
use cell_common::module::{ModuleProfile, ModuleType};
use cell_common::net::{NetworkStatus, RadioParameters, ScanResults, SecurityContext};
use cell_common::port::{AtHandle, Pin};
use serde::Serialize;

/// Power-control pins of a module. `None` means not connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PinAssignment {
    /// Pin switching the module's power supply
    pub enable_power: Option<Pin>,
    /// PWR_ON pin
    pub pwr_on: Option<Pin>,
    /// Pin monitoring the module's VINT output
    pub vint: Option<Pin>,
}

impl PinAssignment {
    /// Build from signed pin numbers, where negative means not connected.
    pub fn from_raw(enable_power: i32, pwr_on: i32, vint: i32) -> Self {
        Self {
            enable_power: Pin::from_raw(enable_power),
            pwr_on: Pin::from_raw(pwr_on),
            vint: Pin::from_raw(vint),
        }
    }
}

/// Which owned resources `release_resources()` actually freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReleasedResources {
    /// Scan results were present and freed
    pub scan_results: bool,
    /// Security context was present and freed
    pub security_context: bool,
}

/// Runtime record of one cellular module.
#[derive(Debug)]
pub struct CellInstance {
    handle: CellHandle,
    at_handle: AtHandle,
    pins: PinAssignment,
    leave_power_alone: bool,
    profile: &'static ModuleProfile,
    /// Registration status per domain, written by the network layer
    pub network_status: NetworkStatus,
    /// Signal quality, written by the radio layer
    pub radio_parameters: RadioParameters,
    /// Chip-to-chip security context, created on demand
    pub security_context: Option<Box<SecurityContext>>,
    /// Result of the most recent network scan
    pub scan_results: Option<ScanResults>,
}

impl CellInstance {
    /// Create a fully initialised record: every network status `Unknown`,
    /// radio parameters cleared, no security context, no scan results.
    pub fn new(
        handle: CellHandle,
        at_handle: AtHandle,
        pins: PinAssignment,
        leave_power_alone: bool,
        profile: &'static ModuleProfile,
    ) -> Self {
        let mut radio_parameters = RadioParameters::default();
        radio_parameters.clear();
        Self {
            handle,
            at_handle,
            pins,
            leave_power_alone,
            profile,
            network_status: NetworkStatus::default(),
            radio_parameters,
            security_context: None,
            scan_results: None,
        }
    }

    /// Numeric handle.
    pub fn handle(&self) -> CellHandle {
        self.handle
    }

    /// AT channel of the module.
    pub fn at_handle(&self) -> &AtHandle {
        &self.at_handle
    }

    /// Power-control pins.
    pub fn pins(&self) -> PinAssignment {
        self.pins
    }

    /// Whether pin levels were left alone at bring-up.
    pub fn leave_power_alone(&self) -> bool {
        self.leave_power_alone
    }

    /// Static profile of the module.
    pub fn profile(&self) -> &'static ModuleProfile {
        self.profile
    }

    /// Module type.
    pub fn module_type(&self) -> ModuleType {
        self.profile.module_type
    }

    /// Free scan results and the security context, if present.
    ///
    /// Idempotent: a second call finds nothing to free.
    pub fn release_resources(&mut self) -> ReleasedResources {
        ReleasedResources {
            scan_results: self.scan_results.take().is_some(),
            security_context: self.security_context.take().is_some(),
        }
    }

    /// Serializable view of the record.
    pub fn summary(&self) -> InstanceSummary {
        InstanceSummary {
            handle: self.handle,
            module_type: self.module_type().name(),
            pins: self.pins,
            leave_power_alone: self.leave_power_alone,
            network_status: self.network_status,
            radio_parameters: self.radio_parameters,
            has_security_context: self.security_context.is_some(),
            scan_result_count: self.scan_results.as_ref().map_or(0, ScanResults::len),
        }
    }
}

/// Snapshot of an instance, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceSummary {
    /// Numeric handle
    pub handle: CellHandle,
    /// Module type name
    pub module_type: &'static str,
    /// Power-control pins
    pub pins: PinAssignment,
    /// Leave-power-alone flag
    pub leave_power_alone: bool,
    /// Registration status per domain
    pub network_status: NetworkStatus,
    /// Signal quality
    pub radio_parameters: RadioParameters,
    /// Whether a security context is attached
    pub has_security_context: bool,
    /// Number of networks from the last scan
    pub scan_result_count: usize,
}
