//! 工具模块 - 错误、日志、输入校验

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok_with_message};
pub use result::AppResult;
