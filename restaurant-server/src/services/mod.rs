//! 服务层
//!
//! - [`notification`] - 实时通知总线 (WebSocket 广播)
//! - [`image_store`] - 上传图片的校验与存储
//! - [`orders`] - 订单生命周期
//! - [`menu`] - 菜单项及其图片

pub mod image_store;
pub mod menu;
pub mod notification;
pub mod orders;

pub use image_store::{ImageStore, ImageStoreError, StoredImage};
pub use menu::MenuService;
pub use notification::{NotificationBus, Subscription};
pub use orders::OrderService;
