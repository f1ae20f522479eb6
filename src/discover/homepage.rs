use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::{fetch_ok_text, looks_like_admin};
use crate::target::normalize_base_url;

fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

/// Links on the homepage whose target or text looks administrative.
/// Off-site links are dropped; relative hrefs are kept as written.
pub fn parse_homepage(body: &str, base_url: &str) -> Vec<String> {
    let base = Url::parse(&normalize_base_url(base_url)).ok();
    let document = Html::parse_document(body);
    let Ok(sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut out: Vec<String> = Vec::new();
    for a in document.select(&sel) {
        let Some(href) = a.value().attr("href") else { continue };
        let href = href.trim();
        let text: String = a.text().collect();
        if !(looks_like_admin(href) || looks_like_admin(text.trim())) {
            continue;
        }

        let absolute = if href.starts_with("//") {
            Url::parse(&format!("http:{href}")).ok()
        } else {
            Url::parse(href).ok()
        };
        let path = match absolute {
            Some(link) if !matches!(link.scheme(), "http" | "https") => continue,
            Some(link) => {
                if let Some(base) = &base {
                    if !same_host(&link, base) {
                        continue;
                    }
                }
                link.path().to_string()
            }
            None => href.to_string(),
        };
        if !path.is_empty() && !out.contains(&path) {
            out.push(path);
        }
    }
    out
}

pub async fn fetch_homepage_hints(client: &Client, base_url: &str) -> Vec<String> {
    let url = normalize_base_url(base_url);
    match fetch_ok_text(client, &url).await {
        Some(body) => parse_homepage(&body, &url),
        None => Vec::new(),
    }
}
