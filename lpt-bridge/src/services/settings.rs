//! Settings Service
//!
//! 持有当前的默认打印端口。请求处理时读取一次快照并显式传入调度器，
//! 不读取进程级环境变量。

use std::sync::Arc;

use lpt_printer::PortId;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// 端口设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSettings {
    /// 未指定端口的请求使用的默认端口
    #[serde(rename = "PRINTER_PORT")]
    pub default_port: PortId,
}

/// 设置服务
///
/// 基于 `watch` 通道，更新后所有订阅者都能看到最新值。
#[derive(Clone)]
pub struct SettingsService {
    tx: Arc<watch::Sender<PortSettings>>,
}

impl SettingsService {
    pub fn new(initial: PortSettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// 当前设置快照
    pub fn current(&self) -> PortSettings {
        *self.tx.borrow()
    }

    /// 订阅设置变更
    pub fn subscribe(&self) -> watch::Receiver<PortSettings> {
        self.tx.subscribe()
    }

    /// 更新设置 (仅内存，不落盘)
    pub fn update(&self, settings: PortSettings) {
        let previous = self.tx.send_replace(settings);
        tracing::info!(
            from = %previous.default_port,
            to = %settings.default_port,
            "Default printer port updated"
        );
    }
}
