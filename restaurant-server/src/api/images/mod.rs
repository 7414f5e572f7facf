//! Image Routes
//!
//! Serves stored menu item and restaurant pictures by file name.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;
use crate::services::image_store::is_safe_file_name;

pub fn router() -> Router<ServerState> {
    Router::new().route("/images/{filename}", get(serve_image))
}

enum ImageFileResponse {
    Ok { content: Bytes, mime: String },
    NotFound,
    BadRequest(&'static str),
    Failed,
}

impl IntoResponse for ImageFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ImageFileResponse::Ok { content, mime } => (
                http::StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                content,
            )
                .into_response(),
            ImageFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            ImageFileResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ImageFileResponse::Failed => {
                (http::StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
            }
        }
    }
}

/// Serve an uploaded image (public)
async fn serve_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> ImageFileResponse {
    if !is_safe_file_name(&filename) {
        return ImageFileResponse::BadRequest("Invalid filename");
    }

    match state.images.read_named(&filename).await {
        Ok(Some(content)) => ImageFileResponse::Ok {
            mime: mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string(),
            content: Bytes::from(content),
        },
        Ok(None) => ImageFileResponse::NotFound,
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "Failed to read image");
            ImageFileResponse::Failed
        }
    }
}
