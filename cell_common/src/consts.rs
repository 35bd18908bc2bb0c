//! System-wide constants for the cellular driver workspace.
//!
//! Single source of truth for handle ranges and fixed sizes.
//! Imported by all crates, never duplicated.

use static_assertions::const_assert;

/// Lowest handle of the BLE network handle family.
pub const BLE_HANDLE_MIN: i32 = 0;

/// Highest handle of the BLE network handle family.
pub const BLE_HANDLE_MAX: i32 = 99;

/// Lowest handle of the cellular network handle family.
pub const CELL_HANDLE_MIN: i32 = 100;

/// Highest handle of the cellular network handle family.
pub const CELL_HANDLE_MAX: i32 = 199;

/// Lowest handle of the Wi-Fi network handle family.
pub const WIFI_HANDLE_MIN: i32 = 200;

/// Highest handle of the Wi-Fi network handle family.
pub const WIFI_HANDLE_MAX: i32 = 299;

/// Number of network registration domains (circuit- and packet-switched).
pub const NUM_NET_REG_DOMAINS: usize = 2;

/// Maximum number of networks kept from one scan.
pub const MAX_SCAN_RESULTS: usize = 32;

/// Maximum length of an operator name in a scan result.
pub const MAX_OPERATOR_NAME_LEN: usize = 64;

/// Length of chip-to-chip security keys in bytes.
pub const C2C_KEY_LEN: usize = 16;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cell/cell.toml";

const_assert!(BLE_HANDLE_MIN <= BLE_HANDLE_MAX);
const_assert!(BLE_HANDLE_MAX < CELL_HANDLE_MIN);
const_assert!(CELL_HANDLE_MIN <= CELL_HANDLE_MAX);
const_assert!(CELL_HANDLE_MAX < WIFI_HANDLE_MIN);
const_assert!(WIFI_HANDLE_MIN <= WIFI_HANDLE_MAX);
