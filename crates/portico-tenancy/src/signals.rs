//! Request signal extraction.
//!
//! The core never depends on an HTTP framework; the transport layer
//! hands over header name/value pairs and gets back the signals the
//! resolver and auth service consume. Header-name matching is
//! case-insensitive throughout.

/// Header carrying an explicit tenant code (priority 1).
pub const TENANT_CODE_HEADER: &str = "x-tenant-code";
/// Header carrying a legacy numeric tenant id (priority 2).
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Tenant-resolution signals extracted from one request.
#[derive(Debug, Clone, Default)]
pub struct TenantSignals {
    /// Explicit tenant code from [`TENANT_CODE_HEADER`].
    pub tenant_code: Option<String>,
    /// Raw legacy tenant id from [`TENANT_ID_HEADER`] (parsed later;
    /// unparsable values simply fall through).
    pub tenant_id: Option<String>,
    pub origin: Option<String>,
    pub referer: Option<String>,
}

impl TenantSignals {
    /// Extract signals from header pairs. The first occurrence of each
    /// header wins.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut signals = Self::default();
        for (name, value) in headers {
            let slot = if name.eq_ignore_ascii_case(TENANT_CODE_HEADER) {
                &mut signals.tenant_code
            } else if name.eq_ignore_ascii_case(TENANT_ID_HEADER) {
                &mut signals.tenant_id
            } else if name.eq_ignore_ascii_case("origin") {
                &mut signals.origin
            } else if name.eq_ignore_ascii_case("referer") {
                &mut signals.referer
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.trim().to_string());
            }
        }
        signals
    }
}

/// Extract the bearer token from an `Authorization` header value.
///
/// The scheme keyword is matched case-insensitively. Malformed values
/// yield `None` — indistinguishable from no token at all.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, rest) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

/// Find the `Authorization` header among header pairs and extract the
/// bearer token from it.
pub fn bearer_token<'a, I>(headers: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .and_then(|(_, value)| parse_bearer(value))
}
