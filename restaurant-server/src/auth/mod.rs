//! 认证模块
//!
//! - [`JwtService`] - 令牌签发与校验
//! - [`CurrentUser`] - 从 Cookie 或 Bearer 头提取的当前用户
//! - [`cookie`] - 会话 Cookie 读写
//! - [`google`] - Google ID 令牌校验

pub mod cookie;
pub mod extractor;
pub mod google;
pub mod jwt;

pub use google::{GoogleIdentity, GoogleVerifier};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

use shared::models::Role;

use crate::security_log;
use crate::utils::AppError;

impl CurrentUser {
    /// Fail with `Forbidden` unless the principal has `role`
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role != role {
            security_log!(
                "WARN",
                "role_denied",
                user_id = self.id.as_str(),
                required = role.as_str()
            );
            return Err(AppError::forbidden(format!(
                "This action requires the {role} role"
            )));
        }
        Ok(())
    }

    /// Fail with `Forbidden` unless the principal owns the resource
    pub fn ensure_owner(&self, resource_owner_id: &str) -> Result<(), AppError> {
        if self.id != resource_owner_id {
            security_log!(
                "WARN",
                "ownership_denied",
                user_id = self.id.as_str(),
                owner_id = resource_owner_id
            );
            return Err(AppError::forbidden("You do not own this resource"));
        }
        Ok(())
    }
}
