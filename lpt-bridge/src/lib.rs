//! LPT Bridge - 并口小票打印机 HTTP 桥接服务
//!
//! 接收 POS 前端的 JSON 打印指令，编码为 Big5 / ESC/POS 字节，
//! 经由暂存文件写入 LPT 设备。
//!
//! # 模块结构
//!
//! ```text
//! lpt-bridge/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── services/      # 默认端口设置
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::logger::init_logger_with_file;
pub use utils::{AppError, AppResult};

/// 加载 .env 并初始化日志
///
/// 必须在 [`Config::from_env`] 之前调用。
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __    ____  ______   ____       _     __
   / /   / __ \/_  __/  / __ )_____(_)___/ /___ ____
  / /   / /_/ / / /    / __  / ___/ / __  / __ `/ _ \
 / /___/ ____/ / /    / /_/ / /  / / /_/ / /_/ /  __/
/_____/_/     /_/    /_____/_/  /_/\__,_/\__, /\___/
                                        /____/
    "#
    );
}
