//! Portico Server — application entry point.
//!
//! Wires the SurrealDB-backed repositories into the auth service, the
//! tenant resolver, and the admin-tenant access control, then holds
//! them ready for a transport layer.

use std::env;

use portico_auth::{AuthConfig, AuthService};
use portico_db::repository::{
    SurrealAdminUserRepository, SurrealBindingRepository, SurrealSessionRepository,
    SurrealTenantRepository,
};
use portico_db::{DbConfig, DbManager};
use portico_tenancy::{AccessControl, TenantDirectory, TenantResolver};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn db_config_from_env() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: env_or("PORTICO_DB_URL", &defaults.url),
        namespace: env_or("PORTICO_DB_NAMESPACE", &defaults.namespace),
        database: env_or("PORTICO_DB_DATABASE", &defaults.database),
        username: env_or("PORTICO_DB_USERNAME", &defaults.username),
        password: env_or("PORTICO_DB_PASSWORD", &defaults.password),
    }
}

fn auth_config_from_env() -> AuthConfig {
    AuthConfig {
        pepper: env::var("PORTICO_AUTH_PEPPER").ok(),
        ..AuthConfig::default()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("portico=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Portico server...");

    let db_config = db_config_from_env();
    let manager = match DbManager::connect(&db_config).await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = portico_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "schema migration failed");
        std::process::exit(1);
    }

    let auth_config = auth_config_from_env();
    let db = manager.client().clone();

    let users = match auth_config.pepper.clone() {
        Some(pepper) => SurrealAdminUserRepository::with_pepper(db.clone(), pepper),
        None => SurrealAdminUserRepository::new(db.clone()),
    };
    let sessions = SurrealSessionRepository::new(db.clone());
    let bindings = SurrealBindingRepository::new(db.clone());
    let tenants = SurrealTenantRepository::new(db.clone());

    let auth = AuthService::new(
        users,
        sessions,
        bindings.clone(),
        tenants.clone(),
        auth_config,
    );
    let directory = TenantDirectory::new(tenants);
    let resolver = TenantResolver::new(directory);
    let _access = AccessControl::new(auth, resolver, bindings);

    tracing::info!("Portico core services ready");

    // TODO: Start REST API server

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }

    tracing::info!("Portico server stopped.");
}
