//! Per-instance network value types.
//!
//! These values are stored on each cellular instance and written by the
//! network and radio layers. The driver only initialises and releases them.

use crate::consts::{C2C_KEY_LEN, MAX_OPERATOR_NAME_LEN, MAX_SCAN_RESULTS, NUM_NET_REG_DOMAINS};
use crate::error::CellError;
use crate::module::Rats;
use serde::Serialize;
use std::sync::atomic::{Ordering, compiler_fence};

/// Maximum length of an MCC/MNC string ("MCCMNC", at most 6 digits).
const MCC_MNC_LEN: usize = 6;

/// Network registration status of one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetStatus {
    /// Not yet known. Initial value of every domain.
    #[default]
    Unknown,
    /// Not registered, not searching.
    NotRegistered,
    /// Registered on the home network.
    RegisteredHome,
    /// Searching for a network.
    Searching,
    /// Registration denied.
    RegistrationDenied,
    /// Out of coverage.
    OutOfCoverage,
    /// Registered, roaming.
    RegisteredRoaming,
    /// Registered for SMS only, home network.
    RegisteredSmsOnlyHome,
    /// Registered for SMS only, roaming.
    RegisteredSmsOnlyRoaming,
    /// Emergency services only.
    EmergencyOnly,
    /// Registered without CSFB, home network.
    RegisteredNoCsfbHome,
    /// Registered without CSFB, roaming.
    RegisteredNoCsfbRoaming,
}

impl NetStatus {
    /// Whether this status counts as registered.
    pub fn is_registered(self) -> bool {
        matches!(
            self,
            Self::RegisteredHome
                | Self::RegisteredRoaming
                | Self::RegisteredSmsOnlyHome
                | Self::RegisteredSmsOnlyRoaming
                | Self::RegisteredNoCsfbHome
                | Self::RegisteredNoCsfbRoaming
        )
    }
}

/// Network registration domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetRegDomain {
    /// Circuit-switched.
    Cs = 0,
    /// Packet-switched.
    Ps = 1,
}

impl NetRegDomain {
    /// All domains, in storage order.
    pub const ALL: [NetRegDomain; NUM_NET_REG_DOMAINS] = [Self::Cs, Self::Ps];

    /// Index into a per-domain status array.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Registration status per domain, one fixed slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NetworkStatus([NetStatus; NUM_NET_REG_DOMAINS]);

impl NetworkStatus {
    /// Status of one domain.
    pub fn get(&self, domain: NetRegDomain) -> NetStatus {
        self.0[domain.index()]
    }

    /// Update the status of one domain.
    pub fn set(&mut self, domain: NetRegDomain, status: NetStatus) {
        self.0[domain.index()] = status;
    }

    /// Whether any domain is registered.
    pub fn is_registered(&self) -> bool {
        self.0.iter().any(|s| s.is_registered())
    }

    /// Reset every domain to [`NetStatus::Unknown`].
    pub fn reset(&mut self) {
        self.0 = [NetStatus::Unknown; NUM_NET_REG_DOMAINS];
    }

    /// All statuses, in domain order.
    pub fn as_slice(&self) -> &[NetStatus] {
        &self.0
    }
}

/// Radio signal-quality parameters. `None` means "not measured".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RadioParameters {
    /// Received signal strength [dBm]
    pub rssi_dbm: Option<i32>,
    /// Reference signal received power [dBm]
    pub rsrp_dbm: Option<i32>,
    /// Reference signal received quality [dB]
    pub rsrq_db: Option<i32>,
    /// 2G/3G receive quality (0..7)
    pub rx_qual: Option<u8>,
    /// Signal to noise ratio [dB]
    pub snr_db: Option<i32>,
    /// Serving cell id
    pub cell_id: Option<i32>,
    /// E-UTRA absolute radio frequency channel number
    pub earfcn: Option<i32>,
}

impl RadioParameters {
    /// Clear every field back to "not measured".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether nothing has been measured.
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// One network discovered by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Operator name
    pub name: heapless::String<MAX_OPERATOR_NAME_LEN>,
    /// MCC/MNC, digits only
    pub mcc_mnc: heapless::String<MCC_MNC_LEN>,
    /// RAT the network was seen on
    pub rat: Rats,
}

/// Networks found by the most recent scan.
#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    entries: heapless::Vec<ScanEntry, MAX_SCAN_RESULTS>,
}

impl ScanResults {
    /// Empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a discovered network.
    ///
    /// # Errors
    /// `InvalidParameter` if a string does not fit, `NoMemory` if the
    /// result set is full.
    pub fn push(&mut self, name: &str, mcc_mnc: &str, rat: Rats) -> Result<(), CellError> {
        let mut entry = ScanEntry {
            name: heapless::String::new(),
            mcc_mnc: heapless::String::new(),
            rat,
        };
        if entry.name.push_str(name).is_err() {
            return Err(CellError::InvalidParameter(format!(
                "operator name longer than {MAX_OPERATOR_NAME_LEN} bytes"
            )));
        }
        if !mcc_mnc.bytes().all(|b| b.is_ascii_digit()) || entry.mcc_mnc.push_str(mcc_mnc).is_err()
        {
            return Err(CellError::InvalidParameter(format!(
                "invalid MCC/MNC '{mcc_mnc}'"
            )));
        }
        self.entries.push(entry).map_err(|_| CellError::NoMemory)
    }

    /// Discovered networks, in discovery order.
    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    /// Number of discovered networks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Chip-to-chip security context.
///
/// Key material is overwritten with zeros when the context is dropped.
pub struct SecurityContext {
    te_secret: [u8; C2C_KEY_LEN],
    key: [u8; C2C_KEY_LEN],
    hmac_key: [u8; C2C_KEY_LEN],
    tx_sequence: u32,
}

impl SecurityContext {
    /// Create a context from negotiated key material.
    pub fn new(
        te_secret: [u8; C2C_KEY_LEN],
        key: [u8; C2C_KEY_LEN],
        hmac_key: [u8; C2C_KEY_LEN],
    ) -> Self {
        Self {
            te_secret,
            key,
            hmac_key,
            tx_sequence: 0,
        }
    }

    /// Encryption key.
    pub fn key(&self) -> &[u8; C2C_KEY_LEN] {
        &self.key
    }

    /// HMAC key.
    pub fn hmac_key(&self) -> &[u8; C2C_KEY_LEN] {
        &self.hmac_key
    }

    /// Terminal equipment secret.
    pub fn te_secret(&self) -> &[u8; C2C_KEY_LEN] {
        &self.te_secret
    }

    /// Return the next transmit sequence number.
    pub fn next_tx_sequence(&mut self) -> u32 {
        let seq = self.tx_sequence;
        self.tx_sequence = self.tx_sequence.wrapping_add(1);
        seq
    }
}

impl std::fmt::Debug for SecurityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("SecurityContext")
            .field("tx_sequence", &self.tx_sequence)
            .finish_non_exhaustive()
    }
}

impl Drop for SecurityContext {
    fn drop(&mut self) {
        wipe(&mut self.te_secret);
        wipe(&mut self.key);
        wipe(&mut self.hmac_key);
        compiler_fence(Ordering::SeqCst);
    }
}

/// Zero a key buffer with volatile writes so the stores survive even though
/// the buffer is freed right after.
fn wipe(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid, aligned, exclusive reference.
        unsafe { core::ptr::write_volatile(byte, 0) };
    }
}
