//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use portico_core::error::PorticoResult;
use portico_core::models::tenant::{CreateTenant, Tenant};
use portico_core::repository::TenantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::sequence::next_id;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    code: String,
    name: String,
    primary_domain: String,
    active: bool,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: i64) -> Tenant {
        Tenant {
            id,
            code: self.code,
            name: self.name,
            primary_domain: self.primary_domain,
            active: self.active,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: i64,
    code: String,
    name: String,
    primary_domain: String,
    active: bool,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn into_tenant(self) -> Tenant {
        Tenant {
            id: self.record_id,
            code: self.code,
            name: self.name,
            primary_domain: self.primary_domain,
            active: self.active,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> PorticoResult<Tenant> {
        let id = next_id(&self.db, "tenant").await?;
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 code = $code, \
                 name = $name, \
                 primary_domain = $primary_domain, \
                 active = true, \
                 metadata = $metadata",
            )
            .bind(("id", id))
            .bind(("code", input.code))
            .bind(("name", input.name))
            .bind(("primary_domain", input.primary_domain))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_tenant(id))
    }

    async fn get_by_id(&self, id: i64) -> PorticoResult<Tenant> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_tenant(id))
    }

    async fn get_by_code(&self, code: &str) -> PorticoResult<Tenant> {
        let code_owned = code.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 WHERE code = $code AND active = true",
            )
            .bind(("code", code_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: format!("code={code_owned}"),
        })?;

        Ok(row.into_tenant())
    }

    async fn get_by_domain(&self, domain: &str) -> PorticoResult<Tenant> {
        let domain_owned = domain.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 WHERE primary_domain = $domain AND active = true",
            )
            .bind(("domain", domain_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: format!("domain={domain_owned}"),
        })?;

        Ok(row.into_tenant())
    }

    async fn list_active(&self) -> PorticoResult<Vec<Tenant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 WHERE active = true \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(TenantRowWithId::into_tenant).collect())
    }

    async fn deactivate(&self, id: i64) -> PorticoResult<()> {
        self.db
            .query(
                "UPDATE type::record('tenant', $id) SET \
                 active = false, updated_at = time::now()",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
