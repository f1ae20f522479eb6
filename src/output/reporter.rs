use crate::probe::ProbeResult;

const GREEN: &str = "\x1b[1;92m";
const YELLOW: &str = "\x1b[1;93m";
const RESET: &str = "\x1b[0m";

pub fn format_hit(r: &ProbeResult) -> String {
    format!(
        "[+] {} {} ({} ms, {} bytes){}",
        r.status,
        r.url,
        r.elapsed_ms,
        r.content_length,
        if r.redirected { " [redirect]" } else { "" }
    )
}

/// Successful paths only; everything else lives in the JSON/CSV files.
pub fn print_summary(results: &[ProbeResult]) {
    let hits: Vec<&ProbeResult> = results.iter().filter(|r| r.ok).collect();
    if hits.is_empty() {
        println!("{YELLOW}[-] No admin pages found{RESET}");
        return;
    }
    println!("{GREEN}[+] {} admin page(s) found{RESET}", hits.len());
    for r in hits {
        println!("{}", format_hit(r));
    }
}
