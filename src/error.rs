//! Client-side error types and server error body parsing.

use serde::Deserialize;

/// API error type for client-side use.
///
/// Every remote-call failure is captured as one of these variants; nothing
/// in the API layer panics or throws past the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Network(String),
    Http { status: u16, body: String },
    Deserialize(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Deserialize(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Structured error body returned by the admin API.
///
/// `{errors: {system_error: [{message}]}, message}` with every level
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub errors: Option<ServerErrors>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerErrors {
    #[serde(default)]
    pub system_error: Vec<SystemError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Attempt to parse a structured admin-API error body into a user-facing
/// message. Prefers the first system-level message, falls back to the
/// top-level `message`.
pub fn try_server_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ServerErrorBody>(body).ok()?;
    if let Some(errors) = parsed.errors {
        if let Some(first) = errors.system_error.first() {
            if let Some(message) = first.message.as_ref() {
                if !message.trim().is_empty() {
                    return Some(message.clone());
                }
            }
        }
    }
    let message = parsed.message?;
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

/// User-facing message for a failed login attempt.
pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { body, .. } => {
            try_server_message(body).unwrap_or_else(|| "Login failed".to_string())
        }
        ApiError::Network(_) => "Could not reach the server".to_string(),
        ApiError::Deserialize(_) => "Login failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_error_message_wins_over_top_level() {
        let body = r#"{"errors":{"system_error":[{"message":"Account suspended"}]},"message":"Login failed"}"#;
        assert_eq!(try_server_message(body).as_deref(), Some("Account suspended"));
    }

    #[test]
    fn falls_back_to_top_level_message() {
        let body = r#"{"message":"Invalid credentials"}"#;
        assert_eq!(try_server_message(body).as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn unstructured_body_yields_generic_message() {
        let err = ApiError::Http {
            status: 500,
            body: "<html>oops</html>".to_string(),
        };
        assert_eq!(login_error_message(&err), "Login failed");
    }
}
