//! Admin-Tenant Authorization — the single choke point every protected
//! administrative operation passes through.
//!
//! Evaluated fresh on every request: tenant bindings can change between
//! requests, so authorization decisions are never cached.

use portico_auth::AuthService;
use portico_core::error::PorticoError;
use portico_core::models::admin_user::AdminScope;
use portico_core::models::tenant::Tenant;
use portico_core::repository::{
    AdminUserRepository, BindingRepository, SessionRepository, TenantRepository,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::resolver::TenantResolver;
use crate::signals::TenantSignals;

/// Authorization failure, distinguishable so clients can tell "log in"
/// from "wrong account".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// No token, malformed token, or token that fails verification.
    /// Deliberately carries no detail on the cause.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Authenticated, but no binding to the resolved tenant.
    #[error("not authorized for this tenant")]
    NotAuthorized,
}

impl AccessError {
    /// HTTP-equivalent status for the boundary layer.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::NotAuthenticated => 401,
            AccessError::NotAuthorized => 403,
        }
    }

    /// Structured error payload for the boundary layer.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// The composed per-request administrative context.
#[derive(Debug, Clone, Serialize)]
pub struct AdminContext {
    pub user_id: i64,
    pub tenant_id: i64,
    pub tenant: Tenant,
    /// The caller's role within the resolved tenant (their global role
    /// for super admins).
    pub tenant_role: String,
}

/// Binds an authenticated caller to the resolved tenant and role.
pub struct AccessControl<U, S, B, T>
where
    U: AdminUserRepository,
    S: SessionRepository,
    B: BindingRepository,
    T: TenantRepository,
{
    auth: AuthService<U, S, B, T>,
    resolver: TenantResolver<T>,
    bindings: B,
}

impl<U, S, B, T> AccessControl<U, S, B, T>
where
    U: AdminUserRepository,
    S: SessionRepository,
    B: BindingRepository,
    T: TenantRepository,
{
    pub fn new(auth: AuthService<U, S, B, T>, resolver: TenantResolver<T>, bindings: B) -> Self {
        Self {
            auth,
            resolver,
            bindings,
        }
    }

    pub fn auth(&self) -> &AuthService<U, S, B, T> {
        &self.auth
    }

    pub fn resolver(&self) -> &TenantResolver<T> {
        &self.resolver
    }

    /// Authorize one request: verify the bearer token, resolve the
    /// tenant, and bind the caller to it.
    ///
    /// Super admins pass for any tenant with their global role;
    /// everyone else needs a binding for exactly the resolved tenant.
    /// Internal failures degrade to a denial — nothing here ever
    /// crashes the serving process.
    pub async fn authorize(
        &self,
        token: Option<&str>,
        signals: &TenantSignals,
    ) -> Result<AdminContext, AccessError> {
        let raw_token = token.ok_or(AccessError::NotAuthenticated)?;

        let user_id = match self.auth.verify_token(raw_token).await {
            Ok(Some(id)) => id,
            Ok(None) => return Err(AccessError::NotAuthenticated),
            Err(e) => {
                warn!(error = %e, "token verification failed");
                return Err(AccessError::NotAuthenticated);
            }
        };

        let tenant_id = self.resolver.resolve(signals).await;

        let user = match self.auth.get_user_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AccessError::NotAuthenticated),
            Err(e) => {
                warn!(error = %e, "user lookup failed during authorization");
                return Err(AccessError::NotAuthenticated);
            }
        };

        let tenant_role = match user.scope {
            AdminScope::All => user.role,
            AdminScope::Tenant(_) => match self.bindings.get(user_id, tenant_id).await {
                Ok(binding) => binding.role,
                Err(PorticoError::NotFound { .. }) => return Err(AccessError::NotAuthorized),
                Err(e) => {
                    warn!(error = %e, "binding lookup failed during authorization");
                    return Err(AccessError::NotAuthorized);
                }
            },
        };

        // The resolved id can miss a record only via the hard-coded
        // fallback against an unprovisioned store; deny rather than
        // fabricate a tenant.
        let tenant = match self.resolver.directory().find_by_id(tenant_id).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => return Err(AccessError::NotAuthorized),
            Err(e) => {
                warn!(error = %e, "tenant fetch failed during authorization");
                return Err(AccessError::NotAuthorized);
            }
        };

        Ok(AdminContext {
            user_id,
            tenant_id,
            tenant,
            tenant_role,
        })
    }
}
