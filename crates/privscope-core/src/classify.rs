//! Hostname classification rules
//!
//! Both rules are naive suffix comparisons, not public-suffix aware. An
//! unrelated host that happens to share a suffix with the main host
//! (`evilexample.com` vs `example.com`) is treated as first-party.

use url::Url;

/// Extract the lowercase hostname from a URL. `None` for URLs without a host
/// (`data:`, `about:blank`, unparsable input).
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// A request host is third-party iff it differs from the main document host
/// and does not end with it.
pub fn is_third_party(host: &str, main_host: &str) -> bool {
    host != main_host && !host.ends_with(main_host)
}

/// Cookie partition: first-party iff the cookie's domain attribute contains
/// the tab host. A parent-domain cookie (`.example.com` on
/// `news.example.com`) is therefore third-party.
pub fn is_first_party_cookie(cookie_domain: &str, tab_host: &str) -> bool {
    if tab_host.is_empty() {
        return false;
    }
    cookie_domain.to_ascii_lowercase().contains(tab_host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_of_lowercases_and_strips_trailing_dot() {
        assert_eq!(host_of("https://WWW.Example.COM./path").as_deref(), Some("www.example.com"));
        assert_eq!(host_of("data:text/plain,hi"), None);
        assert_eq!(host_of("not a url"), None);
    }

    #[test]
    fn subdomain_of_main_host_is_first_party() {
        assert!(!is_third_party("m.example.com", "example.com"));
        assert!(!is_third_party("example.com", "example.com"));
        assert!(is_third_party("evil.com", "example.com"));
    }

    #[test]
    fn cookie_partition_requires_tab_host_in_domain() {
        assert!(is_first_party_cookie("www.example.com", "www.example.com"));
        assert!(is_first_party_cookie(".www.example.com", "www.example.com"));
        assert!(!is_first_party_cookie(".example.com", "www.example.com"));
        assert!(!is_first_party_cookie("example.com", "www.example.com"));
        assert!(!is_first_party_cookie(".tracker.net", "www.example.com"));
        assert!(!is_first_party_cookie("", "www.example.com"));
    }
}
