//! Domain models for Portico.
//!
//! These are the core types shared across all crates.

pub mod admin_user;
pub mod binding;
pub mod session;
pub mod tenant;
