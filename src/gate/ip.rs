//! Client IP resolution for the admin gate
//!
//! Pure helpers with an explicit precedence order: the connection peer
//! address wins, `x-forwarded-for` is the fallback. Forwarded-for values
//! may be a list; the first entry wins. Both `", "` and `","` delimiters
//! occur in proxy configs, so both are accepted.

use axum::http::HeaderMap;

/// Header consulted when no peer address is available
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Parse the configured allowlist: comma-separated IP literals, trimmed,
/// empties dropped. An empty result means "no restriction configured".
pub fn parse_allowlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First entry of a possibly comma-separated address list
fn first_hop(value: &str) -> &str {
    value.split(',').next().unwrap_or("").trim()
}

/// Normalize an IP literal for allowlist comparison
///
/// The IPv6 loopback collapses to the IPv4 loopback so a single
/// "127.0.0.1" allowlist entry covers local access either way.
fn normalize(ip: &str) -> String {
    let ip = ip.trim();
    if ip == "::1" {
        "127.0.0.1".to_string()
    } else {
        ip.to_string()
    }
}

/// Resolve the caller's IP: peer address preferred, forwarded-for fallback.
///
/// Returns None when neither source yields a non-empty address: strict
/// mode, no default to loopback.
pub fn client_ip(peer: Option<&str>, headers: &HeaderMap) -> Option<String> {
    let raw = match peer {
        Some(p) => p.to_string(),
        None => headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())?
            .to_string(),
    };

    let first = first_hop(&raw);
    if first.is_empty() {
        None
    } else {
        Some(normalize(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn allowlist_parsing_trims_and_drops_empties() {
        assert_eq!(
            parse_allowlist(" 203.0.113.5 ,198.51.100.9,, "),
            vec!["203.0.113.5".to_string(), "198.51.100.9".to_string()]
        );
        assert!(parse_allowlist("").is_empty());
        assert!(parse_allowlist(" , ").is_empty());
    }

    #[test]
    fn peer_address_wins_over_header() {
        let headers = headers_with_xff("198.51.100.9");
        assert_eq!(
            client_ip(Some("203.0.113.5"), &headers),
            Some("203.0.113.5".to_string())
        );
    }

    #[test]
    fn forwarded_for_first_entry_wins_with_space_delimiter() {
        let headers = headers_with_xff("198.51.100.9, 10.0.0.1");
        assert_eq!(client_ip(None, &headers), Some("198.51.100.9".to_string()));
    }

    #[test]
    fn forwarded_for_first_entry_wins_with_bare_comma() {
        let headers = headers_with_xff("198.51.100.9,10.0.0.1");
        assert_eq!(client_ip(None, &headers), Some("198.51.100.9".to_string()));
    }

    #[test]
    fn ipv6_loopback_normalizes_to_ipv4() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(Some("::1"), &headers), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn absent_everywhere_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(None, &headers), None);

        let headers = headers_with_xff("  ");
        assert_eq!(client_ip(None, &headers), None);
    }
}
