use std::sync::Arc;

use lpt_printer::{
    CommandDevice, DeviceSink, DeviceWriter, DispatcherConfig, JobDispatcher, ReadinessProber,
    SpoolDir, SpoolJanitor, StatusQuery,
};

use crate::core::Config;
use crate::services::{PortSettings, SettingsService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，可直接作为 axum 的 State。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | dispatcher | 打印调度器 |
/// | settings | 默认端口设置 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub dispatcher: JobDispatcher,
    pub settings: SettingsService,
}

impl ServerState {
    /// 使用系统设备命令初始化
    pub fn initialize(config: &Config) -> Self {
        let device = Arc::new(CommandDevice::new());
        Self::with_devices(config, device.clone(), device)
    }

    /// 使用指定的设备实现初始化 (测试时注入假设备)
    pub fn with_devices(
        config: &Config,
        query: Arc<dyn StatusQuery>,
        sink: Arc<dyn DeviceSink>,
    ) -> Self {
        let prober = ReadinessProber::new(query).with_timeout(config.probe_timeout);
        let writer = DeviceWriter::new(Arc::new(SpoolDir::new(&config.spool_dir)), sink);
        let dispatcher = JobDispatcher::with_config(
            prober,
            writer,
            DispatcherConfig {
                write_timeout: config.write_timeout,
                serialize_writes: config.serialize_port_writes,
            },
        );

        let settings = SettingsService::new(PortSettings {
            default_port: config.printer_port,
        });

        Self {
            config: Arc::new(config.clone()),
            dispatcher,
            settings,
        }
    }

    /// 暂存文件清理任务
    pub fn spool_janitor(&self) -> SpoolJanitor {
        SpoolJanitor::new(&self.config.spool_dir)
            .with_retention(self.config.spool_retention)
            .with_interval(self.config.spool_sweep_interval)
    }
}
