//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、会话、个人资料
//! - [`orders`] - 订单 (公开下单 + 店主管理)
//! - [`menus`] - 菜单项 (multipart 上传图片)
//! - [`restaurants`] - 餐厅
//! - [`categories`] - 餐厅分类
//! - [`transactions`] - 交易流水
//! - [`contact`] - 联系表单
//! - [`images`] - 上传图片访问
//! - [`ws`] - 实时通知 WebSocket

pub mod auth;
pub mod categories;
pub mod contact;
pub mod health;
pub mod images;
pub mod menus;
pub mod orders;
pub mod restaurants;
pub mod transactions;
pub mod ws;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Headroom for multipart framing and text fields on top of the image limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&shared::util::new_id())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn routes() -> Router<ServerState> {
    Router::new()
        // Public
        .merge(health::router())
        .merge(images::router())
        .merge(contact::router())
        .merge(ws::router())
        // Mixed public / authenticated
        .merge(auth::router())
        .merge(orders::router())
        .merge(menus::router())
        .merge(restaurants::router())
        .merge(categories::router())
        // Owner only
        .merge(transactions::router())
}

/// Build the fully configured application
///
/// Used by the HTTP server and by tests calling the router directly.
pub fn build_router(state: ServerState) -> Router {
    let request_id = HeaderName::from_static("x-request-id");
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    let cors = cors_layer(&state.config.cors_origins);

    // Outermost first: the request id exists before the trace span opens
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit));

    routes().layer(middleware).with_state(state)
}

/// Cookies need an explicit origin list; without one no cross-origin access is granted
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
