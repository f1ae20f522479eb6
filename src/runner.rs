use std::sync::Arc;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{Cli, Commands, ScanArgs};
use admin_finder::output::{print_summary, write_csv, write_json};
use admin_finder::{ResumeCache, ScanOptions, ScanTarget, Scanner};

fn init_logging(cli: &Cli) {
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.verbose { "debug".to_string() } else { cli.log_level.to_lowercase() };
    // Keep external crates (reqwest/hyper) at INFO so debug runs stay readable.
    let filter_str = format!("admin_finder={crate_level},reqwest=info,hyper=info,h2=info,rustls=info");
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.with_ansi(true).init();
    }
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli);
    let verbose = cli.verbose;
    match cli.command {
        Commands::Scan(args) => run_scan(args, verbose).await,
    }
}

fn options_from_args(args: &ScanArgs) -> ScanOptions {
    let mut headers = admin_finder::utils::parse_headers(&args.headers);
    if let Some(ua) = &args.user_agent {
        headers.insert("User-Agent".to_string(), ua.clone());
    }
    ScanOptions {
        concurrency: args.concurrency,
        per_host_concurrency: args.per_host,
        rate_limit: args.rate_limit,
        rate_burst: args.rate_burst,
        timeout_secs: args.timeout,
        verify_tls: !args.no_verify,
        follow_redirects: !args.no_redirects,
        proxy: args.proxy.clone(),
        headers,
        cookies: admin_finder::utils::parse_cookies(&args.cookies),
        rotate_user_agents: args.rotate_ua,
    }
}

async fn run_scan(args: ScanArgs, verbose: bool) -> anyhow::Result<()> {
    let options = options_from_args(&args);
    // Fails on bad options before anything touches the network.
    let mut scanner = Scanner::new(options.clone())?;

    let mut paths = admin_finder::utils::load_wordlist(args.wordlist.as_deref())
        .with_context(|| format!("reading wordlist {:?}", args.wordlist))?;

    if args.discovery_enabled() {
        println!("[*] Discovery: robots.txt, sitemaps, homepage links...");
        let client = admin_finder::http_client::build_client(&options)?;
        let target = ScanTarget::parse(&args.url)?;
        let found = admin_finder::discover::discover_all(&client, target.as_str()).await;
        println!("    Found: {} hint(s)", found.len());
        paths.extend(found);
    }
    let paths = admin_finder::utils::dedupe_preserving_order(paths);

    let cache = match &args.cache_file {
        Some(file) => {
            let cache = Arc::new(ResumeCache::new(file));
            let seen = cache.load_seen();
            tracing::info!(cache=%file.display(), seen = seen.len(), "loaded resume cache");
            scanner = scanner.with_cache(cache.clone());
            Some(cache)
        }
        None => None,
    };

    let total = scanner.prepare_paths(&paths).len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?);
    pb.set_message("scanning");
    let scanner = scanner.with_progress(pb.clone());

    println!("[>] Target: {} ({} path(s))", args.url, total);
    let results = scanner.scan(&args.url, &paths).await?;
    if verbose {
        pb.finish_with_message("done");
    } else {
        pb.finish_and_clear();
    }

    if let Some(cache) = &cache {
        for r in &results {
            if let Err(e) = cache.append_result(r) {
                tracing::warn!(error=%e, path=%r.path, "failed to append to resume cache");
            }
        }
    }

    print_summary(&results);

    if let Some(path) = &args.json_out {
        write_json(path, &results).with_context(|| format!("writing {}", path.display()))?;
        println!("[+] JSON written to {}", path.display());
    }
    if let Some(path) = &args.csv_out {
        write_csv(path, &results).with_context(|| format!("writing {}", path.display()))?;
        println!("[+] CSV written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn user_agent_flag_overrides_header() {
        let cli = Cli::try_parse_from([
            "admin_finder", "scan", "example.com", "--user-agent", "probe/2", "--header", "User-Agent: other",
            "--cookie", "sid=1", "--no-verify", "--no-redirects", "--per-host", "3",
        ])
        .unwrap();
        let Commands::Scan(args) = cli.command;
        let o = options_from_args(&args);
        assert_eq!(o.headers["User-Agent"], "probe/2");
        assert_eq!(o.cookies["sid"], "1");
        assert!(!o.verify_tls && !o.follow_redirects);
        assert_eq!(o.per_host_concurrency, 3);
    }
}
