//! Device writer
//!
//! Stages print data into a spool file and pushes it onto the device.
//! Staging is retried a fixed number of times; the device copy is not.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::device::DeviceSink;
use crate::error::{PrintError, PrintResult};
use crate::port::PortId;
use crate::spool::{Spool, SpoolFile};

/// Writer retry policy
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Total staging attempts (including the first)
    pub attempts: u32,
    /// Fixed delay between staging attempts
    pub backoff: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

/// Outcome of a device write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Ok,
    Failed,
}

/// Writes print data to a port through a spool file
#[derive(Clone)]
pub struct DeviceWriter {
    spool: Arc<dyn Spool>,
    sink: Arc<dyn DeviceSink>,
    config: WriterConfig,
}

impl DeviceWriter {
    pub fn new(spool: Arc<dyn Spool>, sink: Arc<dyn DeviceSink>) -> Self {
        Self::with_config(spool, sink, WriterConfig::default())
    }

    pub fn with_config(
        spool: Arc<dyn Spool>,
        sink: Arc<dyn DeviceSink>,
        config: WriterConfig,
    ) -> Self {
        Self {
            spool,
            sink,
            config,
        }
    }

    /// Write `data` to `port`
    ///
    /// The spool file is removed before this returns, whatever the outcome.
    #[instrument(skip(self, data), fields(port = %port, bytes = data.len()))]
    pub async fn write(&self, port: PortId, data: &[u8]) -> WriteOutcome {
        match self.try_write(port, data).await {
            Ok(()) => {
                info!("Print data sent");
                WriteOutcome::Ok
            }
            Err(e) => {
                warn!(error = %e, "Device write failed");
                WriteOutcome::Failed
            }
        }
    }

    async fn try_write(&self, port: PortId, data: &[u8]) -> PrintResult<()> {
        let spool_file = self.stage_with_retry(data).await?;
        let device = port.device_path();

        let status = self.sink.copy(spool_file.path(), device).await?;
        if !status.success {
            return Err(PrintError::DeviceCopy {
                device: device.to_string(),
                code: status.code,
                diagnostics: status.diagnostics_text(),
            });
        }
        Ok(())
    }

    async fn stage_with_retry(&self, data: &[u8]) -> PrintResult<SpoolFile> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.spool.stage(data).await {
                Ok(file) => return Ok(file),
                Err(e) if attempt < attempts => {
                    warn!(attempt, error = %e, "Spool staging failed, retrying");
                    tokio::time::sleep(self.config.backoff).await;
                    attempt += 1;
                }
                Err(source) => return Err(PrintError::Staging { attempts, source }),
            }
        }
    }
}
