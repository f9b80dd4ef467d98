//! # lpt-printer
//!
//! Parallel-port receipt printer library.
//!
//! ## Scope
//!
//! This crate handles HOW a print request reaches the device:
//! - ESC/POS instruction encoding
//! - Big5 encoding for Traditional Chinese printers, CP950 diagnostics
//! - Spool staging and copy-to-device with retry
//! - Readiness probing
//! - Dispatch with a bounded write timeout
//! - Cleanup of orphaned spool files
//!
//! Request validation and settings stay in the host (`lpt-bridge`).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lpt_printer::{
//!     CommandDevice, DeviceWriter, JobDispatcher, PortId, PrintInstruction, ReadinessProber,
//!     SpoolDir,
//! };
//!
//! let device = Arc::new(CommandDevice::new());
//! let prober = ReadinessProber::new(device.clone());
//! let writer = DeviceWriter::new(Arc::new(SpoolDir::new("/var/spool/lpt")), device);
//! let dispatcher = JobDispatcher::new(prober, writer);
//!
//! let result = dispatcher
//!     .dispatch(PortId::Primary, &PrintInstruction::text("桌號 12"))
//!     .await;
//! ```

mod device;
mod dispatcher;
mod encoding;
mod error;
mod escpos;
mod janitor;
mod port;
mod probe;
mod spool;
mod writer;

#[cfg(test)]
mod testing;

// Re-exports
pub use device::{CommandDevice, DeviceSink, DeviceStatus, StatusQuery};
pub use dispatcher::{DEFAULT_WRITE_TIMEOUT, DispatchResult, DispatcherConfig, JobDispatcher};
pub use encoding::{decode_diagnostics, encode_big5};
pub use error::{PrintError, PrintResult};
pub use escpos::{
    FULL_CUT, MAX_FEED_LINES, MAX_TEXT_CHARS, MIN_FEED_LINES, PrintInstruction, Terminator,
    clamp_feed, encode,
};
pub use janitor::{DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL, SpoolJanitor};
pub use port::PortId;
pub use probe::{DEFAULT_PROBE_TIMEOUT, Readiness, ReadinessProber};
pub use spool::{SPOOL_EXTENSION, Spool, SpoolDir, SpoolFile};
pub use writer::{DeviceWriter, WriteOutcome, WriterConfig};
