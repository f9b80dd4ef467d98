//! Test doubles for the device and spool seams

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::device::{DeviceSink, DeviceStatus, StatusQuery};
use crate::error::{PrintError, PrintResult};
use crate::port::PortId;
use crate::spool::{Spool, SpoolDir, SpoolFile};

/// Files currently present in a spool directory
pub fn spool_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(_) => Vec::new(),
    }
}

/// Spool that fails the first `failures` staging attempts
pub struct FlakySpool {
    inner: SpoolDir,
    failures: u32,
    attempts: AtomicU32,
}

impl FlakySpool {
    pub fn new(root: &Path, failures: u32) -> Self {
        Self {
            inner: SpoolDir::new(root),
            failures,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Spool for FlakySpool {
    async fn stage(&self, data: &[u8]) -> io::Result<SpoolFile> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(io::Error::other(format!("disk full (attempt {attempt})")));
        }
        self.inner.stage(data).await
    }
}

enum SinkMode {
    Succeed,
    Fail(i32, &'static str),
    Error,
    Hang,
}

/// Device sink recording every copy
pub struct RecordingSink {
    mode: SinkMode,
    copies: AtomicU32,
    last_payload: Mutex<Option<Vec<u8>>>,
    last_device: Mutex<Option<String>>,
    last_spool: Mutex<Option<PathBuf>>,
}

impl RecordingSink {
    fn with_mode(mode: SinkMode) -> Self {
        Self {
            mode,
            copies: AtomicU32::new(0),
            last_payload: Mutex::new(None),
            last_device: Mutex::new(None),
            last_spool: Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_mode(SinkMode::Succeed)
    }

    pub fn failing(code: i32, diagnostics: &'static str) -> Self {
        Self::with_mode(SinkMode::Fail(code, diagnostics))
    }

    pub fn erroring() -> Self {
        Self::with_mode(SinkMode::Error)
    }

    pub fn hanging() -> Self {
        Self::with_mode(SinkMode::Hang)
    }

    pub fn copies(&self) -> u32 {
        self.copies.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<Vec<u8>> {
        self.last_payload.lock().unwrap().clone()
    }

    pub fn last_device(&self) -> Option<String> {
        self.last_device.lock().unwrap().clone()
    }

    pub fn last_spool(&self) -> Option<PathBuf> {
        self.last_spool.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceSink for RecordingSink {
    async fn copy(&self, spool_path: &Path, device: &str) -> PrintResult<DeviceStatus> {
        self.copies.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = std::fs::read(spool_path).ok();
        *self.last_device.lock().unwrap() = Some(device.to_string());
        *self.last_spool.lock().unwrap() = Some(spool_path.to_path_buf());

        match self.mode {
            SinkMode::Succeed => Ok(DeviceStatus::ok()),
            SinkMode::Fail(code, diagnostics) => Ok(DeviceStatus::failed(code, diagnostics)),
            SinkMode::Error => Err(PrintError::Spawn {
                program: "copy".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
            SinkMode::Hang => std::future::pending().await,
        }
    }
}

/// Status query with a fixed answer
pub struct FakeQuery {
    mode: SinkMode,
    queries: AtomicU32,
}

impl FakeQuery {
    fn with_mode(mode: SinkMode) -> Self {
        Self {
            mode,
            queries: AtomicU32::new(0),
        }
    }

    pub fn ready() -> Self {
        Self::with_mode(SinkMode::Succeed)
    }

    pub fn not_ready() -> Self {
        Self::with_mode(SinkMode::Fail(1, "Invalid parameter - LPT1"))
    }

    pub fn erroring() -> Self {
        Self::with_mode(SinkMode::Error)
    }

    pub fn hanging() -> Self {
        Self::with_mode(SinkMode::Hang)
    }

    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusQuery for FakeQuery {
    async fn query(&self, _port: PortId) -> PrintResult<DeviceStatus> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            SinkMode::Succeed => Ok(DeviceStatus::ok()),
            SinkMode::Fail(code, diagnostics) => Ok(DeviceStatus::failed(code, diagnostics)),
            SinkMode::Error => Err(PrintError::Spawn {
                program: "mode".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
            SinkMode::Hang => std::future::pending().await,
        }
    }
}

/// Sink whose copies take `delay`, tracking how many run at once
pub struct SlowSink {
    delay: Duration,
    in_flight: AtomicU32,
    peak: AtomicU32,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicU32::new(0),
            peak: AtomicU32::new(0),
        }
    }

    /// Highest number of overlapping copies seen
    pub fn peak(&self) -> u32 {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceSink for SlowSink {
    async fn copy(&self, _spool_path: &Path, _device: &str) -> PrintResult<DeviceStatus> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(DeviceStatus::ok())
    }
}
