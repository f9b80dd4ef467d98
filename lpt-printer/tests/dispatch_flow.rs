//! End-to-end dispatch behaviour against fake devices
//! Run: cargo test -p lpt-printer --test dispatch_flow

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lpt_printer::{
    DeviceSink, DeviceStatus, DeviceWriter, DispatchResult, DispatcherConfig, JobDispatcher,
    PortId, PrintInstruction, PrintResult, ReadinessProber, Spool, SpoolDir, SpoolFile,
    StatusQuery, WriterConfig,
};

#[derive(Clone, Copy)]
enum Behaviour {
    Succeed,
    Fail,
    Hang,
}

struct FakeDevice {
    ready: bool,
    copy: Behaviour,
    copies: AtomicU32,
    seen_spool: Mutex<Vec<PathBuf>>,
}

impl FakeDevice {
    fn new(ready: bool, copy: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            ready,
            copy,
            copies: AtomicU32::new(0),
            seen_spool: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl StatusQuery for FakeDevice {
    async fn query(&self, _port: PortId) -> PrintResult<DeviceStatus> {
        if self.ready {
            Ok(DeviceStatus::ok())
        } else {
            Ok(DeviceStatus::failed(1, "裝置未就緒"))
        }
    }
}

#[async_trait]
impl DeviceSink for FakeDevice {
    async fn copy(&self, spool_path: &Path, _device: &str) -> PrintResult<DeviceStatus> {
        self.copies.fetch_add(1, Ordering::SeqCst);
        assert!(spool_path.exists(), "spool file must exist during the copy");
        self.seen_spool.lock().unwrap().push(spool_path.to_path_buf());

        match self.copy {
            Behaviour::Succeed => Ok(DeviceStatus::ok()),
            Behaviour::Fail => Ok(DeviceStatus::failed(1, "0 file(s) copied.")),
            Behaviour::Hang => std::future::pending().await,
        }
    }
}

/// Fails the first `failures` staging attempts
struct CountingSpool {
    inner: SpoolDir,
    failures: u32,
    attempts: AtomicU32,
}

#[async_trait]
impl Spool for CountingSpool {
    async fn stage(&self, data: &[u8]) -> io::Result<SpoolFile> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(io::Error::other("simulated staging failure"));
        }
        self.inner.stage(data).await
    }
}

fn listing(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|rd| rd.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}

fn build(
    dir: &Path,
    device: Arc<FakeDevice>,
    staging_failures: u32,
    write_timeout: Duration,
) -> (JobDispatcher, Arc<CountingSpool>) {
    let spool = Arc::new(CountingSpool {
        inner: SpoolDir::new(dir),
        failures: staging_failures,
        attempts: AtomicU32::new(0),
    });
    let writer = DeviceWriter::with_config(
        spool.clone(),
        device.clone(),
        WriterConfig {
            attempts: 3,
            backoff: Duration::from_millis(100),
        },
    );
    let dispatcher = JobDispatcher::with_config(
        ReadinessProber::new(device),
        writer,
        DispatcherConfig {
            write_timeout,
            serialize_writes: true,
        },
    );
    (dispatcher, spool)
}

#[tokio::test]
async fn spool_directory_empty_after_every_outcome() {
    let cases = [
        (true, Behaviour::Succeed, DispatchResult::Ok),
        (true, Behaviour::Fail, DispatchResult::WriteFailed),
        (false, Behaviour::Succeed, DispatchResult::DeviceNotReady),
        (true, Behaviour::Hang, DispatchResult::Timeout),
    ];

    for (ready, behaviour, expected) in cases {
        let tmp = tempfile::tempdir().unwrap();
        let device = FakeDevice::new(ready, behaviour);
        let (dispatcher, _) = build(tmp.path(), device.clone(), 0, Duration::from_millis(300));

        assert!(listing(tmp.path()).is_empty());
        let result = dispatcher
            .dispatch(PortId::Primary, &PrintInstruction::text("品名 x2"))
            .await;

        assert_eq!(result, expected);
        assert!(listing(tmp.path()).is_empty(), "leftover spool for {expected:?}");
        for seen in device.seen_spool.lock().unwrap().iter() {
            assert!(!seen.exists());
        }
    }
}

#[tokio::test]
async fn not_ready_performs_zero_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let device = FakeDevice::new(false, Behaviour::Succeed);
    let (dispatcher, spool) = build(tmp.path(), device.clone(), 0, Duration::from_secs(5));

    let result = dispatcher.dispatch(PortId::Secondary, &PrintInstruction::Cut).await;

    assert_eq!(result, DispatchResult::DeviceNotReady);
    assert_eq!(spool.attempts.load(Ordering::SeqCst), 0);
    assert_eq!(device.copies.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn staging_fails_twice_then_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let device = FakeDevice::new(true, Behaviour::Succeed);
    let (dispatcher, spool) = build(tmp.path(), device.clone(), 2, Duration::from_secs(5));

    let result = dispatcher.dispatch(PortId::Primary, &PrintInstruction::feed(2)).await;

    assert_eq!(result, DispatchResult::Ok);
    assert_eq!(spool.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(device.copies.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn staging_fails_three_times() {
    let tmp = tempfile::tempdir().unwrap();
    let device = FakeDevice::new(true, Behaviour::Succeed);
    let (dispatcher, spool) = build(tmp.path(), device.clone(), 3, Duration::from_secs(5));

    let result = dispatcher.dispatch(PortId::Primary, &PrintInstruction::feed(2)).await;

    assert_eq!(result, DispatchResult::WriteFailed);
    assert_eq!(spool.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(device.copies.load(Ordering::SeqCst), 0);
    assert!(listing(tmp.path()).is_empty());
}

#[tokio::test]
async fn hanging_copy_times_out_at_default_bound() {
    let tmp = tempfile::tempdir().unwrap();
    let device = FakeDevice::new(true, Behaviour::Hang);
    let (dispatcher, _) = build(
        tmp.path(),
        device.clone(),
        0,
        DispatcherConfig::default().write_timeout,
    );

    let started = Instant::now();
    let result = dispatcher.dispatch(PortId::Primary, &PrintInstruction::Cut).await;
    let elapsed = started.elapsed();

    assert_eq!(result, DispatchResult::Timeout);
    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_secs(7), "took {elapsed:?}");
    assert!(listing(tmp.path()).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failure_does_not_affect_next_dispatch() {
    let tmp = tempfile::tempdir().unwrap();

    let failing = FakeDevice::new(true, Behaviour::Fail);
    let (dispatcher, _) = build(tmp.path(), failing, 0, Duration::from_secs(5));
    assert_eq!(
        dispatcher.dispatch(PortId::Primary, &PrintInstruction::Cut).await,
        DispatchResult::WriteFailed
    );

    let working = FakeDevice::new(true, Behaviour::Succeed);
    let (dispatcher, _) = build(tmp.path(), working, 0, Duration::from_secs(5));
    let mut handles = Vec::new();
    for i in 0..8 {
        let dispatcher = dispatcher.clone();
        let port = if i % 2 == 0 {
            PortId::Primary
        } else {
            PortId::Secondary
        };
        handles.push(tokio::spawn(async move {
            dispatcher.dispatch(port, &PrintInstruction::text(format!("line {i}"))).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), DispatchResult::Ok);
    }
    assert!(listing(tmp.path()).is_empty());
}
