//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Standard session lifetime in seconds (default: 86_400 = 1 day).
    pub session_lifetime_secs: u64,
    /// Session lifetime with "remember me" in seconds
    /// (default: 604_800 = 7 days).
    pub remember_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used during hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime_secs: 86_400,
            remember_lifetime_secs: 604_800,
            pepper: None,
        }
    }
}
