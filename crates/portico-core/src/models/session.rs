//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-side record binding an opaque bearer token to a user and
/// an expiry. Only the SHA-256 hash of the token is stored.
///
/// A session is valid iff its owning user is active and the current
/// time is before `expires_at`. Expired rows are deleted lazily, on
/// the first verification that detects the expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    /// Issuing IP, audit only.
    pub ip_address: Option<String>,
    /// Issuing user agent, audit only.
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub user_id: i64,
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
}
