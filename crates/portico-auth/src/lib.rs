//! Portico Auth — password authentication, opaque session token
//! issuance/verification, and logout.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput, TenantAccess};
