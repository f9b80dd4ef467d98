use std::path::PathBuf;
use std::time::Duration;

use lpt_printer::{
    DEFAULT_PROBE_TIMEOUT, DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL, DEFAULT_WRITE_TIMEOUT, PortId,
};

/// 桥接服务配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量 (或 `.env`) 覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LISTEN_PORT | 3000 | HTTP 服务端口 |
/// | PRINTER_PORT | LPT1 | 默认打印端口 |
/// | SPOOL_DIR | {tmp}/lpt-bridge/spool | 暂存文件目录 |
/// | WRITE_TIMEOUT_MS | 5000 | 写入超时(毫秒) |
/// | PROBE_TIMEOUT_MS | 2000 | 状态探测超时(毫秒) |
/// | SERIALIZE_PORT_WRITES | true | 同一端口串行写入 |
/// | SPOOL_RETENTION_SECS | 3600 | 孤儿暂存文件保留时间 |
/// | SPOOL_SWEEP_INTERVAL_SECS | 3600 | 清理周期 |
///
/// `LOG_LEVEL` / `LOG_DIR` 由 [`setup_environment`](crate::setup_environment)
/// 在加载配置之前读取，以便配置解析时的警告能写入日志。
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub listen_port: u16,
    /// 启动时的默认打印端口
    pub printer_port: PortId,
    /// 暂存文件目录
    pub spool_dir: PathBuf,
    pub write_timeout: Duration,
    pub probe_timeout: Duration,
    pub serialize_port_writes: bool,
    pub spool_retention: Duration,
    pub spool_sweep_interval: Duration,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let printer_port = match std::env::var("PRINTER_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PRINTER_PORT, falling back to LPT1");
                PortId::Primary
            }),
            Err(_) => PortId::Primary,
        };

        Self {
            listen_port: env_parse("LISTEN_PORT").unwrap_or(3000),
            printer_port,
            spool_dir: std::env::var("SPOOL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_spool_dir()),
            write_timeout: env_parse("WRITE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_WRITE_TIMEOUT),
            probe_timeout: env_parse("PROBE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PROBE_TIMEOUT),
            serialize_port_writes: env_parse("SERIALIZE_PORT_WRITES").unwrap_or(true),
            spool_retention: env_parse("SPOOL_RETENTION_SECS")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETENTION),
            spool_sweep_interval: env_parse("SPOOL_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL),
        }
    }

    /// 测试用配置：指定暂存目录，其余使用默认值
    pub fn with_spool_dir(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            listen_port: 3000,
            printer_port: PortId::Primary,
            spool_dir: spool_dir.into(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            serialize_port_writes: true,
            spool_retention: DEFAULT_RETENTION,
            spool_sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

fn default_spool_dir() -> PathBuf {
    std::env::temp_dir().join("lpt-bridge").join("spool")
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
