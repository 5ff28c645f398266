use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use holderwatch::config::{self, Config};
use holderwatch::holders::{self, HolderExtractor, PlausibilityBounds, TokenTarget};
use holderwatch::paths;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debug_holders")]
#[command(about = "Debug tool for holder count acquisition", long_about = None)]
struct Args {
  /// Config file (defaults to the data directory config.toml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run the extraction patterns against a saved explorer page
  Extract {
    /// HTML file to scan
    #[arg(short, long)]
    file: PathBuf,

    /// Exclusive upper bound (defaults to the configured one)
    #[arg(long)]
    max: Option<u64>,
  },
  /// Run the configured source chain once
  Chain,
  /// Run the full orchestrator once (reads and writes the cache tiers)
  Resolve,
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
  let path = path.unwrap_or_else(paths::get_config_path);
  config::read_config_file(&path).map_err(anyhow::Error::msg)
}

fn separator() {
  println!("{}", "=".repeat(80));
}

fn run_extract(config: &Config, file: PathBuf, max: Option<u64>) -> Result<()> {
  let html = std::fs::read_to_string(&file)
    .with_context(|| format!("Failed to read {}", file.display()))?;
  let bounds = PlausibilityBounds::new(max.unwrap_or(config.holders.max_plausible_count));

  let extractor = if config.holders.patterns.is_empty() {
    HolderExtractor::new(bounds)
  } else {
    let patterns: Vec<&str> = config.holders.patterns.iter().map(String::as_str).collect();
    HolderExtractor::with_patterns(&patterns, bounds).context("Invalid holders.patterns")?
  };

  println!("\n[EXTRACT] {} ({} bytes)\n", file.display(), html.len());
  separator();
  for report in extractor.diagnose(&html) {
    println!(
      "#{:<2} {:<10} capture={:<14} pattern={}",
      report.index,
      report
        .accepted
        .map(|c| format!("OK {}", c))
        .unwrap_or_else(|| "-".to_string()),
      report.capture.unwrap_or_else(|| "-".to_string()),
      report.pattern
    );
  }
  separator();

  match extractor.extract(&html) {
    Some(count) => println!("\nExtracted: {}", count),
    None => println!("\nNo plausible holder count in this page"),
  }
  Ok(())
}

async fn run_chain(config: &Config) -> Result<()> {
  let service = holders::build_service(config).map_err(anyhow::Error::msg)?;
  let token = TokenTarget::new(&config.token.address, &config.token.chain);

  println!("\n[CHAIN] {} on {}\n", token.address, token.chain);
  println!("Strategies: {}", service.chain().names().join(" -> "));
  separator();

  let outcome = service.chain().run(&token).await;
  for failure in &outcome.failures {
    println!(
      "FAIL {:<10} {:>6}ms  {}",
      failure.strategy, failure.elapsed_ms, failure.error
    );
  }
  separator();

  match outcome.reading {
    Some(reading) => {
      println!(
        "\nLive count {} from '{}' ({})",
        reading.count,
        reading.strategy,
        reading.provider.as_str()
      );
      Ok(())
    }
    None => bail!("No strategy produced a count: {}", outcome.failure_summary()),
  }
}

async fn run_resolve(config: &Config) -> Result<()> {
  let service = holders::build_service(config).map_err(anyhow::Error::msg)?;

  println!("\n[RESOLVE]\n");
  separator();
  for snapshot in service.cache().snapshot().await {
    println!(
      "tier {:<8} record={} error={}",
      snapshot.tier,
      snapshot
        .record
        .map(|r| format!("{} @ {}", r.count, r.timestamp.to_rfc3339()))
        .unwrap_or_else(|| "-".to_string()),
      snapshot.error.unwrap_or_else(|| "-".to_string())
    );
  }
  separator();

  let response = service.resolve_at(Utc::now()).await;
  println!("{}", serde_json::to_string_pretty(&response)?);
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let config = load_config(args.config)?;

  println!("HolderWatch Holder Count Debug Tool");

  match args.command {
    Command::Extract { file, max } => run_extract(&config, file, max),
    Command::Chain => run_chain(&config).await,
    Command::Resolve => run_resolve(&config).await,
  }
}
