use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use weather_core::WeatherError;

/// Standard error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// validation, network, provider, data_shape, unexpected or render
    pub kind: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("Page rendering failed: {0}")]
    Render(#[from] tera::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Weather(err) => err.kind(),
            AppError::Render(_) => "render",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Weather(WeatherError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Weather(WeatherError::Provider { status: 404, .. }) => StatusCode::NOT_FOUND,
            AppError::Weather(
                WeatherError::Network(_) | WeatherError::Provider { .. } | WeatherError::DataShape(_),
            ) => StatusCode::BAD_GATEWAY,
            AppError::Weather(WeatherError::Unexpected(_)) | AppError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), "request failed: {self}");
        }

        let body = ErrorResponse { error: self.to_string(), kind: self.kind() };
        (status, axum::Json(body)).into_response()
    }
}
