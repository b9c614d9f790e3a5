use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use feedwatch::config::Config;
use feedwatch::feed::{build_client, fetch_and_parse};
use feedwatch::novelty::NoveltyReport;
use feedwatch::present::Presenter;

#[derive(Parser, Debug)]
#[command(name = "feedwatch", about = "Show the new items of an RSS feed")]
struct Args {
    /// Feed URL (prompted for on stdin when omitted)
    url: Option<String>,

    /// Print the whole feed instead of only the new items
    #[arg(long)]
    all: bool,

    /// Number of GUIDs captured into the watermark
    #[arg(long, value_name = "N")]
    max_guids: Option<usize>,

    /// Number of newest captured items treated as not yet seen
    #[arg(long, value_name = "N")]
    retain: Option<usize>,

    /// Emit the novelty report as JSON
    #[arg(long, conflicts_with = "all")]
    json: bool,

    /// Config file (default: ~/.config/feedwatch/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn prompt_for_url() -> Result<String> {
    print!("Enter RSS feed URL: ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read feed URL from stdin")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(max_guids) = args.max_guids {
        config.max_guids = max_guids;
    }
    if let Some(retain) = args.retain {
        config.retain = retain;
    }

    let url = match args.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };
    if url.is_empty() {
        anyhow::bail!("No feed URL given");
    }

    let client = build_client(&config.user_agent).context("Failed to create HTTP client")?;
    let feed = match fetch_and_parse(&client, &url, &config.fetch_options()).await {
        Ok(feed) => feed,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Feed fetch failed");
            eprintln!("Failed to fetch or parse feed from {url}: {e}");
            std::process::exit(1);
        }
    };

    let presenter = Presenter::new(config.description_width);

    if args.all {
        print!("{}", presenter.feed(&feed));
        return Ok(());
    }

    let report = NoveltyReport::compute(&feed, config.max_guids, config.retain);
    tracing::info!(
        url = %url,
        items = feed.item_count(),
        new = report.new_items.len(),
        "Feed checked"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{json}");
    } else {
        print!("{}", presenter.new_items(&feed, &report.new_items));
    }

    Ok(())
}
