//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups surface absence as
//! [`PorticoError::NotFound`](crate::error::PorticoError); service
//! layers map that to `Option` or generic failures as each contract
//! requires.

use chrono::{DateTime, Utc};

use crate::error::PorticoResult;
use crate::models::{
    admin_user::{AdminUser, CreateAdminUser, UpdateAdminUser},
    binding::TenantBinding,
    session::{CreateSession, Session},
    tenant::{CreateTenant, Tenant},
};

/// Read-mostly tenant records. `get_by_code` and `get_by_domain` only
/// ever see active tenants; `get_by_id` returns the record regardless
/// so callers can inspect the active flag.
pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = PorticoResult<Tenant>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = PorticoResult<Tenant>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = PorticoResult<Tenant>> + Send;
    fn get_by_domain(&self, domain: &str) -> impl Future<Output = PorticoResult<Tenant>> + Send;
    fn list_active(&self) -> impl Future<Output = PorticoResult<Vec<Tenant>>> + Send;
    /// Soft-deactivate: clears the active flag.
    fn deactivate(&self, id: i64) -> impl Future<Output = PorticoResult<()>> + Send;
}

/// Admin user records. Email is unique among *active* users, so
/// `get_by_email` only ever sees active users; `get_by_id` returns the
/// record regardless so callers can inspect the active flag.
pub trait AdminUserRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAdminUser,
    ) -> impl Future<Output = PorticoResult<AdminUser>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = PorticoResult<AdminUser>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = PorticoResult<AdminUser>> + Send;
    fn update(
        &self,
        id: i64,
        input: UpdateAdminUser,
    ) -> impl Future<Output = PorticoResult<AdminUser>> + Send;
    /// Replace the stored credential with a fresh Argon2id hash.
    fn set_password(
        &self,
        id: i64,
        password: &str,
    ) -> impl Future<Output = PorticoResult<()>> + Send;
    /// Stamp the last-login timestamp.
    fn record_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> impl Future<Output = PorticoResult<()>> + Send;
    /// Soft-delete: clears the active flag.
    fn deactivate(&self, id: i64) -> impl Future<Output = PorticoResult<()>> + Send;
}

pub trait BindingRepository: Send + Sync {
    /// Grant a role to a user within a tenant. A user/tenant pair has
    /// at most one binding; granting again replaces the role.
    fn grant(
        &self,
        user_id: i64,
        tenant_id: i64,
        role: &str,
    ) -> impl Future<Output = PorticoResult<TenantBinding>> + Send;
    /// Remove a grant. Revoking a binding that does not exist is not
    /// an error.
    fn revoke(
        &self,
        user_id: i64,
        tenant_id: i64,
    ) -> impl Future<Output = PorticoResult<()>> + Send;
    fn get(
        &self,
        user_id: i64,
        tenant_id: i64,
    ) -> impl Future<Output = PorticoResult<TenantBinding>> + Send;
    fn list_for_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = PorticoResult<Vec<TenantBinding>>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = PorticoResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = PorticoResult<Session>> + Send;
    /// Delete the session matching a token hash. Idempotent: deleting
    /// a hash with no session is not an error.
    fn delete_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = PorticoResult<()>> + Send;
    /// Delete all sessions for a user (e.g., on password change).
    fn delete_for_user(&self, user_id: i64) -> impl Future<Output = PorticoResult<()>> + Send;
    /// Remove all expired sessions; returns how many were removed.
    /// Operator-invoked — expiry is otherwise detected lazily on use.
    fn cleanup_expired(&self) -> impl Future<Output = PorticoResult<u64>> + Send;
}
