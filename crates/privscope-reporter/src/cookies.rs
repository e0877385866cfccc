//! Cookie partitioning for the active tab

use privscope_core::{host_of, is_first_party_cookie, Cookie, CookieJar};
use serde::Serialize;
use tracing::{debug, warn};

/// Cookies applicable to a tab URL, split by domain against the tab host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CookieSummary {
    pub total: usize,
    pub first_party: usize,
    pub third_party: usize,
    pub cookies: Vec<Cookie>,
}

impl CookieSummary {
    pub fn from_cookies(tab_url: &str, cookies: Vec<Cookie>) -> Self {
        let tab_host = host_of(tab_url).unwrap_or_default();
        let first_party = cookies
            .iter()
            .filter(|cookie| is_first_party_cookie(&cookie.domain, &tab_host))
            .count();
        Self {
            total: cookies.len(),
            first_party,
            third_party: cookies.len() - first_party,
            cookies,
        }
    }
}

/// Enumerate and partition cookies for `tab_url`. An enumeration failure
/// yields an empty summary.
pub async fn summarize_cookies(jar: &dyn CookieJar, tab_url: &str) -> CookieSummary {
    match jar.cookies_for_url(tab_url).await {
        Ok(cookies) => {
            let summary = CookieSummary::from_cookies(tab_url, cookies);
            debug!(
                "Cookies for {}: {} total, {} first-party, {} third-party",
                tab_url, summary.total, summary.first_party, summary.third_party
            );
            summary
        }
        Err(e) => {
            warn!("Cookie enumeration failed for {}: {}", tab_url, e);
            CookieSummary::default()
        }
    }
}
