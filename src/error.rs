//! Error taxonomy for Taskboard API calls.
//!
//! Failures are split along the lines callers actually branch on:
//! transport problems, authorization failures, an expired session,
//! validation rejections that forms want to render field by field, and
//! server faults. All probing of error response bodies happens here, in
//! [`ErrorBody::parse`], so individual endpoints never have to guess
//! which key the backend used this time.

use std::collections::HashMap;

use thiserror::Error;

/// Longest error body fragment we will carry into an error message.
const MAX_BODY_SNIPPET: usize = 200;

/// Error returned by every Taskboard API operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, DNS, timeout).
    /// Never conflated with an authorization failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered 401 and the request could not be recovered
    /// by a token refresh.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The session was cleared because no refresh was possible or the
    /// refresh itself was rejected. The caller must log in again.
    #[error("session expired, login required")]
    SessionExpired,

    /// A 4xx response carrying a message and, for form submissions,
    /// per-field error lists.
    #[error("request rejected ({status}): {message}")]
    Validation {
        status: u16,
        message: String,
        fields: HashMap<String, Vec<String>>,
    },

    /// A 5xx response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A success response whose body did not match the expected schema.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the caller should send the user back to the login
    /// screen rather than retry.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired | ApiError::Unauthorized { .. })
    }
}

/// Map a non-success HTTP response to an [`ApiError`].
///
/// 401 becomes [`ApiError::Unauthorized`] (the retry decision has
/// already been made by the transport at this point), other 4xx become
/// [`ApiError::Validation`] with whatever field errors the body held,
/// and everything else is a server fault.
pub fn classify_response(status: u16, body: &str) -> ApiError {
    let parsed = ErrorBody::parse(body);
    match status {
        401 => ApiError::Unauthorized {
            message: parsed.message_or("authentication required"),
        },
        400..=499 => ApiError::Validation {
            status,
            message: parsed.message_or("request rejected"),
            fields: parsed.fields,
        },
        _ => ApiError::Server {
            status,
            message: parsed.message_or("internal server error"),
        },
    }
}

/// Decoded error payload.
///
/// The backend is not consistent about where it puts the human-readable
/// message: DRF exception handlers use `detail`, the auth views use
/// `message`, and the task actions use `error`. Validation failures
/// arrive as a map of field name to list of messages, with
/// `non_field_errors` for cross-field checks.
#[derive(Debug, Default, PartialEq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub fields: HashMap<String, Vec<String>>,
}

impl ErrorBody {
    pub fn parse(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => {
                // Plain text or HTML body. Keep a short snippet so the
                // message is not a useless "server error".
                let trimmed = raw.trim();
                let message =
                    (!trimmed.is_empty()).then(|| trimmed.chars().take(MAX_BODY_SNIPPET).collect());
                return Self {
                    message,
                    fields: HashMap::new(),
                };
            }
        };

        let serde_json::Value::Object(map) = value else {
            return Self::default();
        };

        let mut message = ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
            .map(str::to_owned);

        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in &map {
            if matches!(key.as_str(), "detail" | "message" | "error") {
                continue;
            }
            match value {
                serde_json::Value::String(text) => {
                    fields.insert(key.clone(), vec![text.clone()]);
                }
                serde_json::Value::Array(items) => {
                    let messages: Vec<String> = items
                        .iter()
                        .filter_map(serde_json::Value::as_str)
                        .map(str::to_owned)
                        .collect();
                    if !messages.is_empty() {
                        fields.insert(key.clone(), messages);
                    }
                }
                _ => {}
            }
        }

        if message.is_none() {
            // Pure field-error bodies: promote the cross-field message.
            message = fields
                .get("non_field_errors")
                .and_then(|errors| errors.first())
                .cloned();
        }

        Self { message, fields }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detail_body() {
        let body = ErrorBody::parse(r#"{"detail": "Given token not valid for any token type"}"#);
        assert_eq!(
            body.message.as_deref(),
            Some("Given token not valid for any token type")
        );
        assert!(body.fields.is_empty());
    }

    #[test]
    fn test_parse_prefers_detail_over_error() {
        let body = ErrorBody::parse(r#"{"error": "secondary", "detail": "primary"}"#);
        assert_eq!(body.message.as_deref(), Some("primary"));
    }

    #[test]
    fn test_parse_field_errors() {
        let body = ErrorBody::parse(
            r#"{"email": ["Enter a valid email address."], "password": ["This field is required."]}"#,
        );
        assert_eq!(
            body.fields.get("email").map(Vec::as_slice),
            Some(&["Enter a valid email address.".to_string()][..])
        );
        assert_eq!(
            body.fields.get("password").map(Vec::as_slice),
            Some(&["This field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_parse_promotes_non_field_errors() {
        let body = ErrorBody::parse(r#"{"non_field_errors": ["Invalid credentials"]}"#);
        assert_eq!(body.message.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_parse_plain_text_body() {
        let body = ErrorBody::parse("Bad Gateway");
        assert_eq!(body.message.as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn test_parse_empty_body() {
        let body = ErrorBody::parse("");
        assert_eq!(body.message, None);
        assert!(body.fields.is_empty());
    }

    #[test]
    fn test_classify_validation() {
        let err = classify_response(400, r#"{"name": ["This field may not be blank."]}"#);
        match err {
            ApiError::Validation { status, fields, .. } => {
                assert_eq!(status, 400);
                assert!(fields.contains_key("name"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_response(401, r#"{"detail": "Authentication credentials were not provided."}"#);
        match err {
            ApiError::Unauthorized { message } => {
                assert_eq!(message, "Authentication credentials were not provided.");
            }
            other => panic!("expected unauthorized, got {other:?}"),
        }
        assert!(classify_response(401, "{}").requires_login());
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify_response(502, "<html>Bad Gateway</html>");
        match err {
            ApiError::Server { status, .. } => assert_eq!(status, 502),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(classify_response(404, "{}").status(), Some(404));
        assert_eq!(classify_response(500, "").status(), Some(500));
        assert_eq!(ApiError::SessionExpired.status(), None);
    }
}
