use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = self.into_proxy_error();
        let status =
            StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("[Handler] {}", error);
        } else {
            tracing::warn!("[Handler] {}", error);
        }
        (status, Json(error.to_error_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravitate_types::ProxyError;

    #[test]
    fn test_status_from_proxy_error() {
        let resp = AppError::from(ProxyError::ImageSignatureMissing { content_index: 1, part_index: 0 })
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(ProxyError::ModelNotFound { model: "x".to_string() }).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
