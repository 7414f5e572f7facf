//! Restaurant Server - 餐厅点餐平台后端
//!
//! # 架构概述
//!
//! - **存储** (`db`): 嵌入式 redb 文档存储
//! - **认证** (`auth`): JWT + Argon2, Cookie 或 Bearer 令牌
//! - **服务** (`services`): 订单、菜单、实时通知、图片存储
//! - **HTTP API** (`api`): REST 接口和 WebSocket 通知通道
//!
//! # 模块结构
//!
//! ```text
//! restaurant-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、Cookie、Google 登录
//! ├── services/      # 订单、菜单、通知总线、图片
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use services::NotificationBus;
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` from the working directory if present
pub fn setup_environment() {
    if dotenv::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }
}
