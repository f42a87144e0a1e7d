use serde::Deserialize;
use thiserror::Error;

/// User-facing authentication failure.
///
/// The `Display` strings are the exact messages shown to the user; no
/// structured error detail is retained beyond the selected variant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("This email exists already")]
    EmailExists,

    #[error("This email does not exist.")]
    EmailNotFound,

    #[error("This password is not correct.")]
    InvalidPassword,

    #[error("An unknown error occurred!")]
    Unknown,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl AuthError {
    /// Map a backend failure payload to a user-facing error.
    ///
    /// The backend reports auth failures as `{"error": {"message": CODE}}`.
    /// A body that doesn't match that shape, or an unrecognized code, maps
    /// to the generic unknown-error message.
    pub fn from_response_body(body: &str) -> Self {
        let code = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message);

        match code.as_deref() {
            Some("EMAIL_EXISTS") => AuthError::EmailExists,
            Some("EMAIL_NOT_FOUND") => AuthError::EmailNotFound,
            Some("INVALID_PASSWORD") => AuthError::InvalidPassword,
            _ => AuthError::Unknown,
        }
    }
}
