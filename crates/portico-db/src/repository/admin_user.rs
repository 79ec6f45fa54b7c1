//! SurrealDB implementation of [`AdminUserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use portico_core::error::PorticoResult;
use portico_core::models::admin_user::{AdminScope, AdminUser, CreateAdminUser, UpdateAdminUser};
use portico_core::repository::AdminUserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::sequence::next_id;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct AdminUserRow {
    email: String,
    password_hash: String,
    name: String,
    role: String,
    tenant_id: Option<i64>,
    active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_user(self, id: i64) -> AdminUser {
        AdminUser {
            id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            role: self.role,
            scope: scope_from_tenant_id(self.tenant_id),
            active: self.active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AdminUserRowWithId {
    record_id: i64,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    tenant_id: Option<i64>,
    active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRowWithId {
    fn into_user(self) -> AdminUser {
        AdminUser {
            id: self.record_id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            role: self.role,
            scope: scope_from_tenant_id(self.tenant_id),
            active: self.active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// An absent tenant restriction marks a super admin.
fn scope_from_tenant_id(tenant_id: Option<i64>) -> AdminScope {
    match tenant_id {
        Some(id) => AdminScope::Tenant(id),
        None => AdminScope::All,
    }
}

fn scope_to_tenant_id(scope: &AdminScope) -> Option<i64> {
    match scope {
        AdminScope::All => None,
        AdminScope::Tenant(id) => Some(*id),
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Decode(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Decode(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the AdminUser repository.
#[derive(Clone)]
pub struct SurrealAdminUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealAdminUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> AdminUserRepository for SurrealAdminUserRepository<C> {
    async fn create(&self, input: CreateAdminUser) -> PorticoResult<AdminUser> {
        let id = next_id(&self.db, "admin_user").await?;
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('admin_user', $id) SET \
                 email = $email, \
                 password_hash = $password_hash, \
                 name = $name, \
                 role = $role, \
                 tenant_id = $tenant_id, \
                 active = true, \
                 last_login_at = NONE",
            )
            .bind(("id", id))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("name", input.name))
            .bind(("role", input.role))
            .bind(("tenant_id", scope_to_tenant_id(&input.scope)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<AdminUserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_user".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_id(&self, id: i64) -> PorticoResult<AdminUser> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('admin_user', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminUserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_user".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_email(&self, email: &str) -> PorticoResult<AdminUser> {
        let email_owned = email.to_string();

        // Email is unique among *active* users only; a deactivated
        // account must never shadow a live re-registration.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM admin_user \
                 WHERE email = $email AND active = true",
            )
            .bind(("email", email_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminUserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_user".into(),
            id: format!("email={email_owned}"),
        })?;

        Ok(row.into_user())
    }

    async fn update(&self, id: i64, input: UpdateAdminUser) -> PorticoResult<AdminUser> {
        let mut sets = Vec::new();
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.scope.is_some() {
            sets.push("tenant_id = $tenant_id");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('admin_user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id));

        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role));
        }
        if let Some(ref scope) = input.scope {
            builder = builder.bind(("tenant_id", scope_to_tenant_id(scope)));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<AdminUserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_user".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_user(id))
    }

    async fn set_password(&self, id: i64, password: &str) -> PorticoResult<()> {
        let password_hash = hash_password(password, self.pepper.as_deref())?;

        self.db
            .query(
                "UPDATE type::record('admin_user', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> PorticoResult<()> {
        self.db
            .query(
                "UPDATE type::record('admin_user', $id) SET \
                 last_login_at = $at",
            )
            .bind(("id", id))
            .bind(("at", at))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn deactivate(&self, id: i64) -> PorticoResult<()> {
        // Soft-delete: clear the active flag.
        self.db
            .query(
                "UPDATE type::record('admin_user', $id) SET \
                 active = false, updated_at = time::now()",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
