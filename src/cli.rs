use std::path::PathBuf;

use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Admin page finder: async scanner for common admin paths", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level filter for this crate (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    /// Verbose output: debug logs and a persistent progress bar
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Probe a target for admin/management pages
    Scan(ScanArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Target base URL or hostname (scheme defaults to http)
    pub url: String,

    /// Wordlist file, one path per line ('#' comments allowed)
    #[arg(short = 'w', long)]
    pub wordlist: Option<PathBuf>,

    /// Skip robots.txt / sitemap / homepage hints
    #[arg(long = "no-discover", default_value_t = false)]
    pub no_discover: bool,

    /// Max concurrent requests
    #[arg(short = 'c', long, default_value_t = 100)]
    pub concurrency: usize,

    /// Per-host concurrency cap
    #[arg(long, default_value_t = 10)]
    pub per_host: usize,

    /// Global requests per second
    #[arg(long = "rate")]
    pub rate_limit: Option<f64>,

    /// Token bucket burst capacity
    #[arg(long = "burst", default_value_t = 1)]
    pub rate_burst: u32,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value_t = 10.0)]
    pub timeout: f64,

    /// Write results as a JSON array
    #[arg(long = "json", value_name = "FILE")]
    pub json_out: Option<PathBuf>,

    /// Write results as CSV
    #[arg(long = "csv", value_name = "FILE")]
    pub csv_out: Option<PathBuf>,

    /// Proxy URL (e.g. http://127.0.0.1:8080)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Override the User-Agent header
    #[arg(long = "user-agent")]
    pub user_agent: Option<String>,

    /// Pick a random User-Agent for every request
    #[arg(long = "rotate-ua", default_value_t = false)]
    pub rotate_ua: bool,

    /// Extra header, repeatable: "Key: Value"
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Cookie, repeatable: key=value
    #[arg(long = "cookie")]
    pub cookies: Vec<String>,

    /// Disable TLS certificate verification
    #[arg(long, default_value_t = false)]
    pub no_verify: bool,

    /// Do not follow redirects
    #[arg(long, default_value_t = false)]
    pub no_redirects: bool,

    /// JSONL cache file; paths already in it are skipped
    #[arg(long = "cache", value_name = "FILE")]
    pub cache_file: Option<PathBuf>,
}

impl ScanArgs {
    pub fn discovery_enabled(&self) -> bool {
        !self.no_discover
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
