//! Front Desk Server - 酒店前台管理系统
//!
//! # 架构概述
//!
//! 本模块是前台服务的主入口，提供以下核心功能：
//!
//! - **预订引擎** (`bookings`): 状态机、冲突检测、房态/客史同步
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口
//! - **报表** (`api/reports`): 仪表盘与收款汇总
//!
//! # 模块结构
//!
//! ```text
//! desk-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── bookings/      # 预订引擎（命令、状态机、冲突检测）
//! ├── db/            # 数据库层（模型 + 仓储）
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod bookings;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use bookings::{BookingCommand, BookingEngine, BookingError};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ______                 __     ____            __
   / ____/________  ____  / /_   / __ \___  _____/ /__
  / /_  / ___/ __ \/ __ \/ __/  / / / / _ \/ ___/ //_/
 / __/ / /  / /_/ / / / / /_   / /_/ /  __(__  ) ,<
/_/   /_/   \____/_/ /_/\__/  /_____/\___/____/_/|_|
    "#
    );
}
