use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_LENGTH, COOKIE, USER_AGENT};
use reqwest::{Client, ClientBuilder};

use crate::config::ScanOptions;
use crate::error::{Result, ScanError, TransportError};

pub const DEFAULT_USER_AGENT: &str = "AdminFinder/0.1 (+https://github.com/admin-finder/admin_finder)";
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Pool used when user-agent rotation is enabled.
pub const ROTATION_USER_AGENTS: &[&str] = &[
    DEFAULT_USER_AGENT,
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
];

const MAX_REDIRECTS: usize = 10;

/// What the prober needs from one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub final_url: String,
    /// Final URL differs from the requested one. reqwest keeps no hop history, so a
    /// chain that ends back on the requested URL reports `false`.
    pub redirected: bool,
    pub elapsed_ms: u64,
    pub content_length: u64,
}

/// One GET attempt. Any HTTP status is `Ok`; only exchanges that never produced a
/// response are `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, user_agent: Option<&str>) -> std::result::Result<TransportResponse, TransportError>;
}

/// Default headers merged with caller overrides, plus a `Cookie` header from the cookie map.
pub fn build_headers(options: &ScanOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

    for (k, v) in &options.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .map_err(|e| ScanError::InvalidParameter(format!("header name {k:?}: {e}")))?;
        let value = HeaderValue::from_str(v)
            .map_err(|e| ScanError::InvalidParameter(format!("header value for {k:?}: {e}")))?;
        headers.insert(name, value);
    }

    if !options.cookies.is_empty() {
        let cookie = options
            .cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| ScanError::InvalidParameter(format!("cookie: {e}")))?;
        headers.insert(COOKIE, value);
    }
    Ok(headers)
}

/// Shared client for every probe of a scan: pooled connections, fixed per-request timeout.
pub fn build_client(options: &ScanOptions) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .default_headers(build_headers(options)?)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .timeout(options.timeout())
        .gzip(true)
        .brotli(true)
        .use_rustls_tls()
        .danger_accept_invalid_certs(!options.verify_tls)
        .redirect(if options.follow_redirects {
            reqwest::redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            reqwest::redirect::Policy::none()
        });

    if let Some(ref proxy_url) = options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    Ok(builder.build()?)
}

/// `Transport` backed by a pooled reqwest client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_options(options: &ScanOptions) -> Result<Self> {
        Ok(Self::new(build_client(options)?))
    }
}

fn header_content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, user_agent: Option<&str>) -> std::result::Result<TransportResponse, TransportError> {
        let mut req = self.client.get(url);
        if let Some(ua) = user_agent {
            req = req.header(USER_AGENT, ua);
        }

        let start = Instant::now();
        let resp = req.send().await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let final_url = resp.url().to_string();
        let redirected = url::Url::parse(url).map(|u| &u != resp.url()).unwrap_or(false);

        Ok(TransportResponse {
            status: resp.status().as_u16(),
            final_url,
            redirected,
            elapsed_ms,
            content_length: header_content_length(resp.headers()),
        })
    }
}
