//! API utilities for frontend-backend communication
//!
//! Resolves the backend base URL. WASM has no runtime environment, so the
//! override is read at compile time from `PHARMACY_API_BASE_URL`.

/// Port the backend listens on when no explicit base URL is configured
pub const DEFAULT_API_PORT: u16 = 8000;

/// Base URL baked in at build time, if any
pub fn configured_base() -> Option<&'static str> {
    option_env!("PHARMACY_API_BASE_URL")
}

/// Pick the base URL from the configured value or the page location.
///
/// A non-blank configured value wins; trailing slashes are trimmed so
/// `format!("{}{}", base, "/api/...")` never produces `//api`.
pub fn resolve_api_base(configured: Option<&str>, protocol: &str, hostname: &str) -> String {
    if let Some(base) = configured.map(str::trim).filter(|b| !b.is_empty()) {
        return base.trim_end_matches('/').to_string();
    }
    let protocol = if protocol.is_empty() { "http:" } else { protocol };
    let hostname = if hostname.is_empty() {
        "127.0.0.1"
    } else {
        hostname
    };
    format!("{}//{}:{}", protocol, hostname, DEFAULT_API_PORT)
}

/// Get the base URL for API requests
///
/// # Returns
/// - The configured base when it is non-blank
/// - Otherwise an "http://localhost:8000" style URL derived from the
///   current window location
pub fn api_base() -> String {
    let location = web_sys::window().map(|w| w.location());
    let protocol = location
        .as_ref()
        .and_then(|l| l.protocol().ok())
        .unwrap_or_default();
    let hostname = location
        .as_ref()
        .and_then(|l| l.hostname().ok())
        .unwrap_or_default();
    resolve_api_base(configured_base(), &protocol, &hostname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_base_wins() {
        assert_eq!(
            resolve_api_base(Some("https://api.pharmacy.example/"), "http:", "localhost"),
            "https://api.pharmacy.example"
        );
        assert_eq!(
            resolve_api_base(Some("http://10.0.0.2:9000///"), "", ""),
            "http://10.0.0.2:9000"
        );
    }

    #[test]
    fn test_location_fallback() {
        assert_eq!(
            resolve_api_base(None, "https:", "admin.local"),
            "https://admin.local:8000"
        );
        assert_eq!(
            resolve_api_base(Some("   "), "http:", "localhost"),
            "http://localhost:8000"
        );
        assert_eq!(
            resolve_api_base(Some(""), "https:", "admin.local"),
            "https://admin.local:8000"
        );
        assert_eq!(resolve_api_base(None, "", ""), "http://127.0.0.1:8000");
    }
}
