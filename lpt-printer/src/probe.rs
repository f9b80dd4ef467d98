//! Readiness probing
//!
//! The port has no software handshake. A probe that cannot get a definitive
//! answer within its deadline reports the device as not ready.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::device::StatusQuery;
use crate::port::PortId;

/// Default bound on a status query
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of a readiness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Checks whether a port's device answers a status query
#[derive(Clone)]
pub struct ReadinessProber {
    query: Arc<dyn StatusQuery>,
    timeout: Duration,
}

impl ReadinessProber {
    pub fn new(query: Arc<dyn StatusQuery>) -> Self {
        Self {
            query,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Set the status query deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe `port`; never fails
    #[instrument(skip(self), fields(port = %port))]
    pub async fn probe(&self, port: PortId) -> Readiness {
        match tokio::time::timeout(self.timeout, self.query.query(port)).await {
            Ok(Ok(status)) if status.success => {
                info!("Printer ready");
                Readiness::Ready
            }
            Ok(Ok(status)) => {
                warn!(
                    code = ?status.code,
                    diagnostics = %status.diagnostics_text(),
                    "Printer not ready"
                );
                Readiness::NotReady
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer status query failed");
                Readiness::NotReady
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Printer status query timeout");
                Readiness::NotReady
            }
        }
    }
}
