//! Authentication service — login, token verification, and logout
//! orchestration.

use chrono::{DateTime, Duration, Utc};
use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::admin_user::{AdminScope, AdminUser, UserProfile};
use portico_core::models::session::CreateSession;
use portico_core::repository::{
    AdminUserRepository, BindingRepository, SessionRepository, TenantRepository,
};
use serde::Serialize;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Extends the session lifetime from 1 day to 7 days.
    pub remember: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// One tenant an authenticated admin may act on, with their role there.
#[derive(Debug, Clone, Serialize)]
pub struct TenantAccess {
    pub tenant_id: i64,
    pub code: String,
    pub name: String,
    pub role: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token (returned to the client, not stored).
    pub token: String,
    /// Session expiry.
    pub expires_at: DateTime<Utc>,
    /// Minimal profile of the authenticated user.
    pub user: UserProfile,
    /// Tenants the user may access.
    pub tenants: Vec<TenantAccess>,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U, S, B, T>
where
    U: AdminUserRepository,
    S: SessionRepository,
    B: BindingRepository,
    T: TenantRepository,
{
    users: U,
    sessions: S,
    bindings: B,
    tenants: T,
    config: AuthConfig,
}

impl<U, S, B, T> AuthService<U, S, B, T>
where
    U: AdminUserRepository,
    S: SessionRepository,
    B: BindingRepository,
    T: TenantRepository,
{
    pub fn new(users: U, sessions: S, bindings: B, tenants: T, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            bindings,
            tenants,
            config,
        }
    }

    /// Authenticate an admin with email + password and issue an opaque
    /// session token.
    ///
    /// Unknown email, inactive account, and password mismatch all
    /// produce the same generic failure — the response never reveals
    /// which check failed.
    pub async fn login(&self, input: LoginInput) -> PorticoResult<LoginOutput> {
        // 1. Look up user by email.
        let user = match self.users.get_by_email(&input.email).await {
            Ok(u) => u,
            Err(PorticoError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify password (constant-time).
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(|e| PorticoError::Crypto(e.to_string()))?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check account status — same outward failure as a mismatch.
        if !user.active {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 4. Generate session token and persist the session.
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let lifetime_secs = if input.remember {
            self.config.remember_lifetime_secs
        } else {
            self.config.session_lifetime_secs
        };
        let expires_at = Utc::now() + Duration::seconds(lifetime_secs as i64);

        self.sessions
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                ip_address: input.ip_address,
                user_agent: input.user_agent,
                expires_at,
            })
            .await?;

        // 5. Stamp last login and compute accessible tenants.
        self.users.record_login(user.id, Utc::now()).await?;
        let tenants = self.accessible_tenants(&user).await?;

        Ok(LoginOutput {
            token: raw_token,
            expires_at,
            user: UserProfile::from(&user),
            tenants,
        })
    }

    /// Resolve a bearer token to its owning user id.
    ///
    /// Returns `None` for an unknown token, an expired session, or an
    /// inactive owner. Expiry detection is lazy: the expired row is
    /// deleted here, on first presentation, rather than by a sweep.
    /// The delete is keyed by token, so repeated verification of the
    /// same expired token stays idempotent.
    pub async fn verify_token(&self, raw_token: &str) -> PorticoResult<Option<i64>> {
        let token_hash = token::hash_session_token(raw_token);

        let session = match self.sessions.get_by_token_hash(&token_hash).await {
            Ok(s) => s,
            Err(PorticoError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        if session.expires_at <= Utc::now() {
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Ok(None);
        }

        match self.users.get_by_id(session.user_id).await {
            Ok(user) if user.active => Ok(Some(user.id)),
            Ok(_) => Ok(None),
            Err(PorticoError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete the session matching a token. Idempotent — logging out a
    /// token that never existed succeeds.
    pub async fn logout(&self, raw_token: &str) -> PorticoResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        self.sessions.delete_by_token_hash(&token_hash).await
    }

    /// Look up an admin user by id, excluding inactive users.
    pub async fn get_user_by_id(&self, id: i64) -> PorticoResult<Option<AdminUser>> {
        match self.users.get_by_id(id).await {
            Ok(user) if user.active => Ok(Some(user)),
            Ok(_) => Ok(None),
            Err(PorticoError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace a user's credential and revoke every session they hold.
    pub async fn change_password(&self, user_id: i64, new_password: &str) -> PorticoResult<()> {
        self.users.set_password(user_id, new_password).await?;
        self.sessions.delete_for_user(user_id).await
    }

    /// The set of tenants a user may access, with their role in each.
    ///
    /// Super admins see every active tenant with their global role;
    /// everyone else sees the active tenants from their bindings.
    async fn accessible_tenants(&self, user: &AdminUser) -> PorticoResult<Vec<TenantAccess>> {
        match user.scope {
            AdminScope::All => Ok(self
                .tenants
                .list_active()
                .await?
                .into_iter()
                .map(|t| TenantAccess {
                    tenant_id: t.id,
                    code: t.code,
                    name: t.name,
                    role: user.role.clone(),
                })
                .collect()),
            AdminScope::Tenant(_) => {
                let mut access = Vec::new();
                for binding in self.bindings.list_for_user(user.id).await? {
                    match self.tenants.get_by_id(binding.tenant_id).await {
                        Ok(tenant) if tenant.active => access.push(TenantAccess {
                            tenant_id: tenant.id,
                            code: tenant.code,
                            name: tenant.name,
                            role: binding.role,
                        }),
                        // Bindings may outlive their tenant.
                        Ok(_) | Err(PorticoError::NotFound { .. }) => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(access)
            }
        }
    }
}
