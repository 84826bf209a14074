//! Error taxonomy for the AI gateway.
//!
//! Remote failures are classified once, here, so every caller shows the same
//! canned message for the same condition. There is no automatic retry
//! anywhere; each error is surfaced and the user decides.

use thiserror::Error;

use crate::core::i18n::{pick_localized, Language};

/// Errors from the chat and translation endpoints.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 401/403 from the gateway.
    #[error("Not authenticated with the AI gateway")]
    Unauthenticated,

    /// Connection failures, timeouts, and 5xx responses.
    #[error("AI gateway unavailable: {0}")]
    Unavailable(String),

    /// 429 from the gateway.
    #[error("AI gateway rate limit exceeded")]
    RateLimited,

    /// 402 from the gateway.
    #[error("AI gateway credits exhausted")]
    CreditsExhausted,

    /// The remote model returned something that is not the expected JSON.
    /// `raw` carries the verbatim text for the log.
    #[error("Failed to parse AI response: {raw}")]
    Parse { raw: String },

    /// Any other non-success status.
    #[error("AI gateway error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level error not classified above.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL or path does not form a valid URL.
    #[error("Invalid gateway URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// Classify a non-success HTTP response.
    ///
    /// The body is expected to be `{"error": string}`; a body carrying a
    /// `raw` field is the remote's parse-failure shape and wins over the
    /// status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(raw) = value.get("raw").and_then(|r| r.as_str()) {
                return Self::Parse {
                    raw: raw.to_string(),
                };
            }
            if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
                return Self::classify(status, message.to_string());
            }
        }
        Self::classify(status, body.to_string())
    }

    /// Classify a transport error from reqwest.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Http(err)
        }
    }

    fn classify(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthenticated,
            402 => Self::CreditsExhausted,
            429 => Self::RateLimited,
            500..=599 => Self::Unavailable(message),
            _ => Self::Api { status, message },
        }
    }

    /// Canned operator-facing message for toasts and fallback bubbles.
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            GatewayError::Unauthenticated => pick_localized(
                lang,
                "Vui lòng đăng nhập để sử dụng chatbot.",
                "Please sign in to use the chatbot.",
            ),
            GatewayError::Unavailable(_) => pick_localized(
                lang,
                "Dịch vụ tạm thời không khả dụng. Vui lòng thử lại sau.",
                "The service is temporarily unavailable. Please try again later.",
            ),
            GatewayError::RateLimited => pick_localized(
                lang,
                "Hệ thống đang bận. Vui lòng thử lại sau ít phút.",
                "Rate limit exceeded. Please try again later.",
            ),
            GatewayError::CreditsExhausted => pick_localized(
                lang,
                "Dịch vụ AI đã hết hạn mức sử dụng. Vui lòng liên hệ quản trị viên.",
                "Payment required. Please add credits to your workspace.",
            ),
            GatewayError::Parse { .. } => pick_localized(
                lang,
                "Không thể đọc kết quả từ AI. Vui lòng thử lại.",
                "Failed to read the AI response. Please try again.",
            ),
            GatewayError::Api { .. } | GatewayError::Http(_) | GatewayError::Url(_) => {
                pick_localized(
                    lang,
                    "Không thể kết nối với AI. Vui lòng thử lại.",
                    "Could not reach the AI service. Please try again.",
                )
            }
        }
    }
}
