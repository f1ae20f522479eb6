use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use url::Url;

use super::{fetch_ok_text, looks_like_admin};
use crate::target::normalize_base_url;

const SITEMAP_FILES: &[&str] = &["sitemap.xml", "sitemap_index.xml"];

static LOC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<loc>(.*?)</loc>").expect("valid loc regex"));

/// Paths of `<loc>` entries that look administrative.
pub fn parse_sitemap(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    for cap in LOC_RE.captures_iter(body) {
        let loc = html_escape::decode_html_entities(&cap[1]).trim().to_string();
        if loc.is_empty() {
            continue;
        }
        let path = Url::parse(&loc).map(|u| u.path().to_string()).unwrap_or(loc);
        if looks_like_admin(&path) {
            out.push(path);
        }
    }
    out
}

pub async fn fetch_sitemap_paths(client: &Client, base_url: &str) -> Vec<String> {
    let base = normalize_base_url(base_url);
    let mut discovered = Vec::new();
    for file in SITEMAP_FILES {
        let url = format!("{base}/{file}");
        if let Some(body) = fetch_ok_text(client, &url).await {
            discovered.extend(parse_sitemap(&body));
        }
    }
    discovered
}
