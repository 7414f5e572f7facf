use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// Google tokeninfo endpoint used to verify ID tokens from Google sign-in
pub const DEFAULT_GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./restaurant-data | 工作目录 (数据库、上传图片) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志文件目录 (按天滚动) |
/// | JWT_SECRET | 开发环境随机生成 | JWT 密钥 (至少 32 字符) |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | JWT_ISSUER / JWT_AUDIENCE | restaurant-server / restaurant-clients | |
/// | SESSION_COOKIE_NAME | token | 会话 Cookie 名称 |
/// | COOKIE_SECURE | production 时为 true | Cookie Secure 属性 |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传图片大小上限 |
/// | ALLOWED_IMAGE_TYPES | png,jpg,jpeg,gif,webp | 允许的图片类型 |
/// | CORS_ORIGINS | - | 允许跨域的来源 (逗号分隔) |
/// | GOOGLE_CLIENT_ID | - | Google 登录客户端 ID |
/// | GOOGLE_TOKENINFO_URL | Google tokeninfo | ID 令牌校验地址 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/restaurant HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和上传文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// 上传图片大小上限 (字节)
    pub max_upload_bytes: usize,
    /// 允许的图片扩展名 (小写)
    pub allowed_image_types: Vec<String>,
    pub cors_origins: Vec<String>,
    /// Google 登录未配置时为 None
    pub google_client_id: Option<String>,
    pub google_tokeninfo_url: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_production = environment == "production";
        let jwt = JwtConfig::from_lookup(&lookup, is_production)?;

        let config = Self {
            work_dir: lookup("WORK_DIR").unwrap_or_else(|| "./restaurant-data".into()),
            http_port: parse_or(&lookup, "HTTP_PORT", 3000)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|s| !s.trim().is_empty()),
            jwt,
            cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "token".into()),
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", is_production)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            allowed_image_types: lookup("ALLOWED_IMAGE_TYPES")
                .map(|s| split_list(&s, true))
                .unwrap_or_else(|| {
                    ["png", "jpg", "jpeg", "gif", "webp"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|s| split_list(&s, false))
                .unwrap_or_default(),
            google_client_id: lookup("GOOGLE_CLIENT_ID").filter(|s| !s.trim().is_empty()),
            google_tokeninfo_url: lookup("GOOGLE_TOKENINFO_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_TOKENINFO_URL.into()),
            environment,
        };

        if config.allowed_image_types.is_empty() {
            return Err(ServerError::Config(
                "ALLOWED_IMAGE_TYPES must name at least one type".into(),
            ));
        }
        if config.max_upload_bytes == 0 {
            return Err(ServerError::Config("MAX_UPLOAD_BYTES must be positive".into()));
        }
        Ok(config)
    }

    /// 使用默认值并指定工作目录 (不读取环境变量)
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Result<Self> {
        let mut config = Self::from_lookup(|_| None)?;
        config.work_dir = work_dir.into();
        Ok(config)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data").join("restaurant.redb")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ServerError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

fn split_list(raw: &str, lowercase: bool) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| if lowercase { s.to_lowercase() } else { s.to_string() })
        .collect()
}
