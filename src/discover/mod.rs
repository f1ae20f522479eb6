//! Candidate path discovery from robots.txt, sitemaps and homepage links.
//!
//! Every fetcher fails soft: network or parse trouble yields an empty list.

pub mod homepage;
pub mod robots;
pub mod sitemap;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

pub use homepage::fetch_homepage_hints;
pub use robots::fetch_robots_paths;
pub use sitemap::fetch_sitemap_paths;

/// Words that make a path worth probing.
pub static ADMIN_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(admin|login|wp-admin|wp-login|cpanel|dashboard)").expect("valid hint regex"));

pub fn looks_like_admin(s: &str) -> bool {
    ADMIN_HINT_RE.is_match(s)
}

/// Body of a 200 response, `None` for anything else.
pub(crate) async fn fetch_ok_text(client: &Client, url: &str) -> Option<String> {
    match client.get(url).send().await {
        Ok(resp) if resp.status().as_u16() == 200 => match resp.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(url, error=%e, "discovery body read failed");
                None
            }
        },
        Ok(resp) => {
            tracing::debug!(url, status = resp.status().as_u16(), "discovery source unavailable");
            None
        }
        Err(e) => {
            tracing::debug!(url, error=%e, "discovery fetch failed");
            None
        }
    }
}

/// All three sources fetched concurrently, concatenated robots, sitemap, homepage.
pub async fn discover_all(client: &Client, base_url: &str) -> Vec<String> {
    let (robots, sitemap, homepage) = tokio::join!(
        fetch_robots_paths(client, base_url),
        fetch_sitemap_paths(client, base_url),
        fetch_homepage_hints(client, base_url),
    );
    tracing::info!(robots = robots.len(), sitemap = sitemap.len(), homepage = homepage.len(), "discovery finished");
    robots.into_iter().chain(sitemap).chain(homepage).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_regex_is_case_insensitive() {
        assert!(looks_like_admin("/Admin/"));
        assert!(looks_like_admin("/wp-LOGIN.php"));
        assert!(looks_like_admin("/cpanel"));
        assert!(!looks_like_admin("/private"));
    }
}
