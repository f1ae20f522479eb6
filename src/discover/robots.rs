use reqwest::Client;

use super::{fetch_ok_text, looks_like_admin};
use crate::target::normalize_base_url;

/// `Disallow:` entries that look administrative.
pub fn parse_robots(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter(|l| l.to_ascii_lowercase().starts_with("disallow:"))
        .filter_map(|l| l.split_once(':').map(|(_, v)| v.trim()))
        .filter(|p| !p.is_empty() && looks_like_admin(p))
        .map(str::to_string)
        .collect()
}

pub async fn fetch_robots_paths(client: &Client, base_url: &str) -> Vec<String> {
    let url = format!("{}/robots.txt", normalize_base_url(base_url));
    match fetch_ok_text(client, &url).await {
        Some(body) => parse_robots(&body),
        None => Vec::new(),
    }
}
