use thiserror::Error;

/// Classified failure of a single weather lookup.
///
/// Every variant is terminal for the request that produced it; nothing in
/// this crate retries.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Bad user input, caught before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Connection refused, DNS failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx status; `message` comes from the provider's error body.
    #[error("API error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// 2xx status, but the payload is missing a field we rely on.
    #[error("Unexpected response shape: {0}")]
    DataShape(String),

    /// Anything else, e.g. a body that is not JSON at all.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl WeatherError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        Self::DataShape(msg.into())
    }

    /// Short category name, used in logs and JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::Provider { .. } => "provider",
            Self::DataShape(_) => "data_shape",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// The request URL carries `appid`, so it is stripped before the error text
/// is kept anywhere.
impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::Network(err.to_string())
        } else if err.is_decode() {
            Self::Unexpected(format!("could not decode response body: {err}"))
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_message() {
        let err = WeatherError::Provider { status: 404, message: "city not found".into() };
        assert_eq!(err.to_string(), "API error (404): city not found");
        assert_eq!(err.kind(), "provider");
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            WeatherError::validation("x").kind(),
            WeatherError::Network("x".into()).kind(),
            WeatherError::data_shape("x").kind(),
            WeatherError::Unexpected("x".into()).kind(),
        ];
        assert_eq!(kinds, ["validation", "network", "data_shape", "unexpected"]);
    }
}
