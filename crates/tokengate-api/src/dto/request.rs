//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use tokengate_core::error::AppError;

/// Admin login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Subscriber login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberLoginRequest {
    /// Mobile number; the subscriber's username.
    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub mobile_number: String,
    /// PIN.
    #[validate(length(min = 1, message = "PIN is required"))]
    pub pin: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Optional logout body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Refresh token to revoke. Without one, all of the caller's are revoked.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl LogoutRequest {
    /// Parses an optional JSON body; an empty body means no refresh token.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Invalid logout body: {e}")))
    }
}

/// Runs the derived validation rules, mapping failures to a 400.
pub fn validated<T: Validate>(request: T) -> Result<T, AppError> {
    request.validate().map_err(validation_error)?;
    Ok(request)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    AppError::validation(messages.join("; "))
}
