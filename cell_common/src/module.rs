//! Cellular module types and their static profiles.
//!
//! `MODULE_PROFILES` is a read-only, process-wide table indexed by
//! `ModuleType as usize`. Instances keep a `&'static ModuleProfile` into it;
//! they never own a copy.

use crate::error::CellError;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

bitflags! {
    /// Radio access technologies a module supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Rats: u8 {
        /// GSM/GPRS/EGPRS.
        const GSM_GPRS_EGPRS = 0x01;
        /// UMTS.
        const UMTS           = 0x02;
        /// LTE.
        const LTE            = 0x04;
        /// LTE Cat-M1.
        const CATM1          = 0x08;
        /// NB-IoT.
        const NB1            = 0x10;
    }
}

/// Supported cellular module types.
///
/// The discriminant is the index into [`MODULE_PROFILES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModuleType {
    /// SARA-U201 (2G/3G).
    SaraU201 = 0,
    /// SARA-R410M-02B (Cat-M1/NB1).
    SaraR410m02b = 1,
    /// SARA-R412M-02B (Cat-M1/NB1/2G).
    SaraR412m02b = 2,
    /// SARA-R412M-03B (Cat-M1/NB1/2G).
    SaraR412m03b = 3,
    /// SARA-R5 (Cat-M1/NB2).
    SaraR5 = 4,
}

impl ModuleType {
    /// All module types, in table order.
    pub const ALL: [ModuleType; 5] = [
        Self::SaraU201,
        Self::SaraR410m02b,
        Self::SaraR412m02b,
        Self::SaraR412m03b,
        Self::SaraR5,
    ];

    /// Index of this module type in a profile table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Profile of this module type in the built-in table.
    pub fn profile(self) -> &'static ModuleProfile {
        &MODULE_PROFILES[self.index()]
    }

    /// Canonical lower-case name, as used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SaraU201 => "sara-u201",
            Self::SaraR410m02b => "sara-r410m-02b",
            Self::SaraR412m02b => "sara-r412m-02b",
            Self::SaraR412m03b => "sara-r412m-03b",
            Self::SaraR5 => "sara-r5",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for ModuleType {
    type Error = CellError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| CellError::InvalidParameter(format!("unknown module type {raw}")))
    }
}

impl FromStr for ModuleType {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| CellError::InvalidParameter(format!("unknown module type '{s}'")))
    }
}

/// Per-module timing constants and capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProfile {
    /// Module type this profile describes
    pub module_type: ModuleType,
    /// How long PWR_ON is held low to power the module on [ms]
    pub power_on_pull_ms: u32,
    /// How long PWR_ON is held low to power the module off [ms]
    pub power_off_pull_ms: u32,
    /// Time to wait after power-on before talking to the module [s]
    pub boot_wait_seconds: u32,
    /// Time to wait for the module to power down [s]
    pub power_down_wait_seconds: u32,
    /// Time to wait after a reboot command [s]
    pub reboot_command_wait_seconds: u32,
    /// AT command response timeout [s]
    pub at_timeout_seconds: u32,
    /// Minimum delay between AT commands [ms]
    pub command_delay_ms: u32,
    /// Maximum wait for the first character of a response [ms]
    pub response_max_wait_ms: u32,
    /// Number of RATs that can be active at once
    pub max_num_simultaneous_rats: u8,
    /// Supported RATs
    pub supported_rats: Rats,
}

impl ModuleProfile {
    /// AT response timeout.
    pub fn at_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.at_timeout_seconds))
    }

    /// Inter-command delay.
    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.command_delay_ms))
    }

    /// Whether the module supports a given RAT.
    pub fn supports(&self, rat: Rats) -> bool {
        self.supported_rats.contains(rat)
    }
}

/// Built-in module table, indexed by `ModuleType as usize`.
pub static MODULE_PROFILES: [ModuleProfile; 5] = [
    ModuleProfile {
        module_type: ModuleType::SaraU201,
        power_on_pull_ms: 1,
        power_off_pull_ms: 1500,
        boot_wait_seconds: 5,
        power_down_wait_seconds: 5,
        reboot_command_wait_seconds: 5,
        at_timeout_seconds: 10,
        command_delay_ms: 20,
        response_max_wait_ms: 0,
        max_num_simultaneous_rats: 2,
        supported_rats: Rats::GSM_GPRS_EGPRS.union(Rats::UMTS),
    },
    ModuleProfile {
        module_type: ModuleType::SaraR410m02b,
        power_on_pull_ms: 300,
        power_off_pull_ms: 2000,
        boot_wait_seconds: 6,
        power_down_wait_seconds: 35,
        reboot_command_wait_seconds: 10,
        at_timeout_seconds: 10,
        command_delay_ms: 20,
        response_max_wait_ms: 100,
        max_num_simultaneous_rats: 2,
        supported_rats: Rats::CATM1.union(Rats::NB1),
    },
    ModuleProfile {
        module_type: ModuleType::SaraR412m02b,
        power_on_pull_ms: 300,
        power_off_pull_ms: 2000,
        boot_wait_seconds: 6,
        power_down_wait_seconds: 35,
        reboot_command_wait_seconds: 10,
        at_timeout_seconds: 10,
        command_delay_ms: 20,
        response_max_wait_ms: 100,
        max_num_simultaneous_rats: 3,
        supported_rats: Rats::CATM1.union(Rats::NB1).union(Rats::GSM_GPRS_EGPRS),
    },
    ModuleProfile {
        module_type: ModuleType::SaraR412m03b,
        power_on_pull_ms: 300,
        power_off_pull_ms: 2000,
        boot_wait_seconds: 6,
        power_down_wait_seconds: 35,
        reboot_command_wait_seconds: 10,
        at_timeout_seconds: 10,
        command_delay_ms: 20,
        response_max_wait_ms: 100,
        max_num_simultaneous_rats: 3,
        supported_rats: Rats::CATM1.union(Rats::NB1).union(Rats::GSM_GPRS_EGPRS),
    },
    ModuleProfile {
        module_type: ModuleType::SaraR5,
        power_on_pull_ms: 1500,
        power_off_pull_ms: 5000,
        boot_wait_seconds: 6,
        power_down_wait_seconds: 20,
        reboot_command_wait_seconds: 10,
        at_timeout_seconds: 10,
        command_delay_ms: 20,
        response_max_wait_ms: 100,
        max_num_simultaneous_rats: 1,
        supported_rats: Rats::CATM1.union(Rats::NB1),
    },
];
