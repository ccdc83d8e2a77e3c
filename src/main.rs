use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roster_odds::config::QuoteConfig;
use roster_odds::pipeline::run_for_roster;
use roster_odds::provider::BookmakerClient;
use roster_odds::report::format_roster_quotes;
use roster_odds::roster::Roster;

const USAGE: &str = "usage: roster_odds --roster <roster.json> [--export <file.csv>] [--no-export] [--json]";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let roster_path = parse_path_arg(&args, "--roster").ok_or_else(|| anyhow!(USAGE))?;
    let raw = fs::read_to_string(&roster_path)
        .with_context(|| format!("failed reading roster {}", roster_path.display()))?;
    let roster: Roster = serde_json::from_str(&raw).context("invalid roster json")?;
    if roster.is_empty() {
        return Err(anyhow!("roster {} has no players", roster_path.display()));
    }

    let mut cfg = QuoteConfig::from_env();
    if has_flag(&args, "--no-export") {
        cfg.export_path = None;
    } else if let Some(path) = parse_path_arg(&args, "--export") {
        cfg.export_path = Some(path);
    }

    let provider = BookmakerClient::new(cfg)?;
    let output = run_for_roster(&provider, provider.config(), &roster)
        .context("no result available")?;

    if has_flag(&args, "--json") {
        let json = serde_json::to_string_pretty(&output.roster_quotes)
            .context("failed encoding roster quotes")?;
        println!("{json}");
    } else {
        print!("{}", format_roster_quotes(&output.roster_quotes));
    }
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn parse_path_arg(args: &[String], name: &str) -> Option<PathBuf> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
