use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Role tag granting access to catalog administration.
pub const ADMIN_ROLE: &str = "ROLE_ADD_PRODUCT";

/// An authenticated user session.
///
/// Held in memory by the `SessionManager` and mirrored verbatim to the
/// session store. A user with a non-empty token is considered active;
/// "logged out" is represented by the absence of a `User`, never by a
/// blanked-out record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub id: String,
    pub token: String,
    pub roles: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl User {
    /// Whether this session carries a usable bearer token.
    pub fn is_active(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Remaining validity. Negative once the expiry timestamp has passed.
    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at - Utc::now()
    }
}

/// Server response to a signup or login request.
///
/// Used once to construct a `User`, then discarded. The backend serializes
/// `expiresIn` as a string; deserialization accepts either a string or a
/// bare number.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResult {
    pub email: String,
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "expiresIn", deserialize_with = "expires_in_seconds")]
    pub expires_in: i64,
    /// Set by the signup endpoint for newly created accounts.
    #[serde(default)]
    pub registered: Option<bool>,
}

fn expires_in_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
