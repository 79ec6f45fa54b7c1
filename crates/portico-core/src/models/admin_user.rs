//! Administrative user domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which tenants an admin user may act on.
///
/// `All` marks a super admin: the binding table is bypassed entirely
/// and access is granted for every tenant. `Tenant` carries the user's
/// home tenant; their authorization is exactly the set of bindings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdminScope {
    All,
    Tenant(i64),
}

impl AdminScope {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, AdminScope::All)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    /// Unique among active users.
    pub email: String,
    /// Argon2id PHC-format hash, never the raw credential.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    /// Global role tag (e.g., `admin`).
    pub role: String,
    pub scope: AdminScope,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new admin user.
#[derive(Debug, Clone)]
pub struct CreateAdminUser {
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub name: String,
    pub role: String,
    pub scope: AdminScope,
}

/// Fields that can be updated on an existing admin user.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdminUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub scope: Option<AdminScope>,
    pub active: Option<bool>,
}

/// Minimal profile returned to authenticated callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&AdminUser> for UserProfile {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
