//! Print job dispatcher
//!
//! Runs one print request through the device pipeline:
//!
//! ```text
//! Idle ──► Probing ──► Writing ──► Done(Ok | WriteFailed)
//!             │            │
//!             ▼            ▼
//!   Done(DeviceNotReady)  Done(Timeout)
//! ```
//!
//! The write timeout is armed on entry to `Writing`. When it fires, the write
//! future is dropped: the spool file guard deletes its file and the copy
//! subprocess is killed on a best-effort basis. The caller gets control back
//! either way.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::escpos::{PrintInstruction, encode};
use crate::port::PortId;
use crate::probe::{Readiness, ReadinessProber};
use crate::writer::{DeviceWriter, WriteOutcome};

/// Default wall-clock bound on the `Writing` state
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Terminal outcome of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchResult {
    Ok,
    DeviceNotReady,
    WriteFailed,
    Timeout,
}

impl DispatchResult {
    /// HTTP status code surfaced to clients
    pub fn http_status(&self) -> u16 {
        match self {
            DispatchResult::Ok => 200,
            DispatchResult::DeviceNotReady => 503,
            DispatchResult::WriteFailed => 500,
            DispatchResult::Timeout => 504,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, DispatchResult::Ok)
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchResult::Ok => "ok",
            DispatchResult::DeviceNotReady => "device not ready",
            DispatchResult::WriteFailed => "write failed",
            DispatchResult::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchState {
    Probing,
    Writing,
    Done(DispatchResult),
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Probing => f.write_str("probing"),
            DispatchState::Writing => f.write_str("writing"),
            DispatchState::Done(result) => write!(f, "done({result})"),
        }
    }
}

fn enter(state: DispatchState) {
    debug!(state = %state, "Dispatch state");
}

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Bound on the `Writing` state, including lease wait and staging retries
    pub write_timeout: Duration,
    /// Serialize writes per port
    pub serialize_writes: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            serialize_writes: true,
        }
    }
}

/// One write lease per port
#[derive(Default)]
struct PortLeases {
    primary: Mutex<()>,
    secondary: Mutex<()>,
}

impl PortLeases {
    fn get(&self, port: PortId) -> &Mutex<()> {
        match port {
            PortId::Primary => &self.primary,
            PortId::Secondary => &self.secondary,
        }
    }
}

/// Probes, encodes and writes print requests
///
/// Cheap to clone; clones share the port leases.
#[derive(Clone)]
pub struct JobDispatcher {
    prober: ReadinessProber,
    writer: DeviceWriter,
    config: DispatcherConfig,
    leases: Arc<PortLeases>,
}

impl JobDispatcher {
    pub fn new(prober: ReadinessProber, writer: DeviceWriter) -> Self {
        Self::with_config(prober, writer, DispatcherConfig::default())
    }

    pub fn with_config(
        prober: ReadinessProber,
        writer: DeviceWriter,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            prober,
            writer,
            config,
            leases: Arc::new(PortLeases::default()),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Probe a port without printing
    pub async fn probe(&self, port: PortId) -> Readiness {
        self.prober.probe(port).await
    }

    /// Entry point for the request layer
    ///
    /// `default_port` comes from the current settings and is used when the
    /// request does not name a port.
    pub async fn handle_print_request(
        &self,
        default_port: PortId,
        port_hint: Option<PortId>,
        instruction: &PrintInstruction,
    ) -> DispatchResult {
        self.dispatch(port_hint.unwrap_or(default_port), instruction)
            .await
    }

    /// Run one instruction against `port`
    #[instrument(skip(self, instruction), fields(port = %port, kind = instruction.kind()))]
    pub async fn dispatch(&self, port: PortId, instruction: &PrintInstruction) -> DispatchResult {
        enter(DispatchState::Probing);
        if !self.prober.probe(port).await.is_ready() {
            return self.finish(DispatchResult::DeviceNotReady);
        }

        let data = encode(instruction);

        enter(DispatchState::Writing);
        let write = async {
            let _lease = if self.config.serialize_writes {
                Some(self.leases.get(port).lock().await)
            } else {
                None
            };
            self.writer.write(port, &data).await
        };

        let result = match tokio::time::timeout(self.config.write_timeout, write).await {
            Ok(WriteOutcome::Ok) => DispatchResult::Ok,
            Ok(WriteOutcome::Failed) => DispatchResult::WriteFailed,
            Err(_) => {
                warn!(
                    timeout_ms = self.config.write_timeout.as_millis() as u64,
                    "Device write timed out, abandoning copy"
                );
                DispatchResult::Timeout
            }
        };

        self.finish(result)
    }

    fn finish(&self, result: DispatchResult) -> DispatchResult {
        enter(DispatchState::Done(result));
        if result.is_ok() {
            info!("Dispatch completed");
        } else {
            warn!(result = %result, "Dispatch failed");
        }
        result
    }
}
