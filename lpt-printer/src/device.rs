//! Device adapters for the parallel port
//!
//! The port has no addressable write API; the only primitives are
//! "copy a file onto the device name" and "ask the OS for the device mode".
//! Both are behind traits so a platform with a real handle can plug in a
//! direct-write implementation without touching the dispatcher.
//!
//! Supports:
//! - Windows: `copy /B <spool> \\.\LPTn` and `mode LPTn`
//! - Unix: `cp <spool> /dev/lpN` and `test -w /dev/lpN`

use std::path::Path;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::encoding::decode_diagnostics;
use crate::error::{PrintError, PrintResult};
use crate::port::PortId;

/// Outcome of one device subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    /// Process exited successfully
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Raw diagnostic bytes in the subsystem code page
    pub diagnostics: Vec<u8>,
}

impl DeviceStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(code: i32, diagnostics: impl Into<Vec<u8>>) -> Self {
        Self {
            success: false,
            code: Some(code),
            diagnostics: diagnostics.into(),
        }
    }

    /// Diagnostics decoded for logging
    pub fn diagnostics_text(&self) -> String {
        decode_diagnostics(&self.diagnostics)
    }
}

impl From<Output> for DeviceStatus {
    fn from(output: Output) -> Self {
        // `copy` and `mode` report some failures on stdout only
        let diagnostics = if output.stderr.is_empty() {
            output.stdout
        } else {
            output.stderr
        };
        Self {
            success: output.status.success(),
            code: output.status.code(),
            diagnostics,
        }
    }
}

/// Pushes a staged spool file onto a device
#[async_trait]
pub trait DeviceSink: Send + Sync {
    /// Copy `spool_path` onto `device` in binary mode
    async fn copy(&self, spool_path: &Path, device: &str) -> PrintResult<DeviceStatus>;
}

/// Lightweight device-mode status query
#[async_trait]
pub trait StatusQuery: Send + Sync {
    async fn query(&self, port: PortId) -> PrintResult<DeviceStatus>;
}

/// Device adapter that shells out to the OS tools
///
/// Subprocesses are spawned with `kill_on_drop`, so when the caller stops
/// waiting (probe deadline or dispatch timeout) the child is killed on a
/// best-effort basis.
#[derive(Debug, Clone, Default)]
pub struct CommandDevice;

impl CommandDevice {
    pub fn new() -> Self {
        Self
    }

    async fn run(mut command: Command, program: &str) -> PrintResult<DeviceStatus> {
        let output = command
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PrintError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(DeviceStatus::from(output))
    }

    #[cfg(windows)]
    fn copy_command(spool_path: &Path, device: &str) -> (Command, &'static str) {
        let mut command = Command::new("cmd");
        command.args(["/C", "copy", "/B"]).arg(spool_path).arg(device);
        (command, "copy")
    }

    #[cfg(not(windows))]
    fn copy_command(spool_path: &Path, device: &str) -> (Command, &'static str) {
        let mut command = Command::new("cp");
        command.arg(spool_path).arg(device);
        (command, "cp")
    }

    #[cfg(windows)]
    fn status_command(port: PortId) -> (Command, &'static str) {
        // mode.com is not found by an .exe-only lookup
        let mut command = Command::new("cmd");
        command.args(["/C", "mode", port.name()]);
        (command, "mode")
    }

    #[cfg(not(windows))]
    fn status_command(port: PortId) -> (Command, &'static str) {
        let mut command = Command::new("test");
        command.args(["-w", port.device_path()]);
        (command, "test")
    }
}

#[async_trait]
impl DeviceSink for CommandDevice {
    #[instrument(skip(self), fields(spool = %spool_path.display()))]
    async fn copy(&self, spool_path: &Path, device: &str) -> PrintResult<DeviceStatus> {
        let (command, program) = Self::copy_command(spool_path, device);
        let status = Self::run(command, program).await?;
        debug!(success = status.success, code = ?status.code, "Device copy finished");
        Ok(status)
    }
}

#[async_trait]
impl StatusQuery for CommandDevice {
    #[instrument(skip(self), fields(port = %port))]
    async fn query(&self, port: PortId) -> PrintResult<DeviceStatus> {
        let (command, program) = Self::status_command(port);
        Self::run(command, program).await
    }
}
