//! 服务层
//!
//! - [`SettingsService`] - 默认端口设置

pub mod settings;

pub use settings::{PortSettings, SettingsService};
