use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Used when no wordlist file is given.
pub const DEFAULT_WORDLIST: &[&str] = &[
    "admin/",
    "administrator/",
    "wp-admin/",
    "wp-login.php",
    "admin/login.php",
    "login",
];

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// One candidate per line; blank lines and `#` comments are dropped.
pub fn load_wordlist(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(DEFAULT_WORDLIST.iter().map(|s| s.to_string()).collect());
    };
    let data = fs::read_to_string(path)?;
    Ok(data
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .map(|l| l.trim().to_string())
        .collect())
}

/// `Key: Value` entries; anything without a colon is ignored.
pub fn parse_headers(raw: &[String]) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|h| h.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// `key=value` entries; anything without `=` is ignored.
pub fn parse_cookies(raw: &[String]) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|c| c.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// First-seen order, exact-match dedupe.
pub fn dedupe_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = ahash::AHashSet::new();
    items.into_iter().filter(|p| seen.insert(p.clone())).collect()
}
