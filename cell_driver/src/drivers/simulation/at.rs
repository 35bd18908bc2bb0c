//! Simulated AT channel.
//!
//! Records the timing constants the driver pushes to it; never exchanges
//! any AT traffic.

use cell_common::port::AtClient;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct AtTiming {
    timeout: Option<Duration>,
    command_delay: Option<Duration>,
}

/// In-memory AT channel.
#[derive(Debug)]
pub struct SimAtClient {
    name: String,
    timing: Mutex<AtTiming>,
}

impl SimAtClient {
    /// Create a named channel with no timing set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timing: Mutex::new(AtTiming::default()),
        }
    }

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last response timeout pushed to this channel.
    pub fn timeout(&self) -> Option<Duration> {
        self.lock().timeout
    }

    /// Last inter-command delay pushed to this channel.
    pub fn command_delay(&self) -> Option<Duration> {
        self.lock().command_delay
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AtTiming> {
        self.timing.lock().expect("SimAtClient lock poisoned")
    }
}

impl AtClient for SimAtClient {
    fn set_timeout(&self, timeout: Duration) {
        debug!("AT channel '{}': timeout {:?}", self.name, timeout);
        self.lock().timeout = Some(timeout);
    }

    fn set_command_delay(&self, delay: Duration) {
        debug!("AT channel '{}': command delay {:?}", self.name, delay);
        self.lock().command_delay = Some(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_timing() {
        let at = SimAtClient::new("uart1");
        assert_eq!(at.name(), "uart1");
        assert!(at.timeout().is_none());

        at.set_timeout(Duration::from_secs(10));
        at.set_command_delay(Duration::from_millis(20));
        assert_eq!(at.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(at.command_delay(), Some(Duration::from_millis(20)));
    }
}
