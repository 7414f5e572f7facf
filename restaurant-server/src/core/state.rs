use std::sync::Arc;
use std::time::Duration;

use crate::auth::{GoogleVerifier, JwtService};
use crate::core::{Config, Result};
use crate::db::Storage;
use crate::services::{ImageStore, MenuService, NotificationBus, OrderService};

/// 服务器状态 - 持有所有服务的引用
///
/// 使用 Clone 是浅拷贝，所有字段都是 Arc 或内部共享的句柄。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 服务器配置 |
/// | storage | redb 文档存储 |
/// | jwt_service | JWT 签发与校验 |
/// | notifications | 实时通知总线 |
/// | images | 上传图片存储 |
/// | google | Google ID 令牌校验 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub storage: Storage,
    pub jwt_service: Arc<JwtService>,
    pub notifications: NotificationBus,
    pub images: ImageStore,
    pub google: GoogleVerifier,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录和上传目录
    /// 2. 打开 `<work_dir>/data/restaurant.redb`
    /// 3. 初始化 JWT、通知总线、Google 校验器
    pub async fn initialize(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.db_path())?;
        tracing::info!(path = %config.db_path().display(), "Database opened");
        Self::with_storage(config, storage).await
    }

    /// Build state around an already opened store (tests use an in-memory one)
    pub async fn with_storage(config: &Config, storage: Storage) -> Result<Self> {
        let images = ImageStore::new(
            config.uploads_dir(),
            config.allowed_image_types.clone(),
            config.max_upload_bytes,
        );
        images
            .ensure_dir()
            .await
            .map_err(|e| crate::core::ServerError::Config(format!("uploads dir: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let google = GoogleVerifier::new(
            http,
            config.google_tokeninfo_url.clone(),
            config.google_client_id.clone(),
        );

        Ok(Self {
            config: Arc::new(config.clone()),
            storage,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            notifications: NotificationBus::new(),
            images,
            google,
        })
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.storage.clone(), self.notifications.clone())
    }

    pub fn menu(&self) -> MenuService {
        MenuService::new(
            self.storage.clone(),
            self.images.clone(),
            self.notifications.clone(),
        )
    }
}
