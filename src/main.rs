use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use shopscraper::debug;
use shopscraper::fetcher::{BrowserFetcher, FetchOptions};
use shopscraper::pipeline::{run_all, ScrapeOptions};
use shopscraper::targets::default_targets;
use shopscraper::tui::SweepTui;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Shopscraper - Product Card Scraper for the webscraper.io demo shop")]
struct Args {
    /// Directory the per-category CSV files are written to
    #[clap(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Maximum number of "load more" clicks per page
    #[clap(long, default_value = "200")]
    max_clicks: usize,

    /// Delay between "load more" clicks, in milliseconds
    #[clap(long, default_value = "250")]
    click_delay_ms: u64,

    /// Only scrape the named category (may be given multiple times)
    #[clap(short, long)]
    category: Vec<String>,

    /// Run Chrome with a visible window
    #[clap(long)]
    headful: bool,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    debug::set_debug(args.debug);

    println!("Shopscraper - Product Card Scraper");
    println!("==================================");

    let mut targets = default_targets();
    if !args.category.is_empty() {
        targets.retain(|t| args.category.iter().any(|c| c.as_str() == t.name));
        if targets.is_empty() {
            anyhow::bail!(
                "No matching categories; known categories are: home, computers, laptops, tablets, phones, touch"
            );
        }
    }

    let fetcher = BrowserFetcher::new(FetchOptions {
        max_clicks: args.max_clicks,
        click_delay: Duration::from_millis(args.click_delay_ms),
        headless: !args.headful,
    });
    let options = ScrapeOptions {
        output_dir: args.output_dir,
    };

    let started = chrono::Local::now();
    let names: Vec<&str> = targets.iter().map(|t| t.name).collect();
    let mut tui = SweepTui::new(&names)?;

    let outcomes = run_all(&fetcher, &targets, &options, Some(&mut tui));

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let total_products: usize = outcomes.iter().filter_map(|o| o.product_count()).sum();
    tui.show_final_summary(total_products)?;

    println!("\n=== Summary ===");
    for outcome in &outcomes {
        match &outcome.result {
            Ok(count) => println!("{}: {} products -> {}.csv", outcome.name, count, outcome.name),
            Err(e) => println!("{}: failed ({:#})", outcome.name, e),
        }
    }
    println!("Started at: {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!(
        "Finished in {}s",
        (chrono::Local::now() - started).num_seconds()
    );

    if failed > 0 {
        anyhow::bail!("{} of {} categories failed", failed, outcomes.len());
    }
    Ok(())
}
