use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::debug_println;
use crate::extractor;
use crate::fetcher::PageFetcher;
use crate::targets::ScrapeTarget;
use crate::tui::SweepTui;
use crate::writer;

/// Options for one sweep over the category table.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Directory the per-category CSV files land in.
    pub output_dir: PathBuf,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// What happened to one category: the number of products written, or the
/// error that stopped it.
pub struct CategoryOutcome {
    pub name: String,
    pub result: Result<usize>,
}

impl CategoryOutcome {
    pub fn product_count(&self) -> Option<usize> {
        self.result.as_ref().ok().copied()
    }
}

/// Fetch → extract → write for a single category.
pub fn run_category<F: PageFetcher>(
    fetcher: &F,
    target: &ScrapeTarget,
    options: &ScrapeOptions,
) -> Result<usize> {
    debug_println!("Fetching {} from {}", target.name, target.url);
    let html = fetcher
        .fetch_expanded_html(&target.url)
        .with_context(|| format!("Failed to fetch {}", target.url))?;

    let products = extractor::extract_products(&html)
        .with_context(|| format!("Failed to extract products from {}", target.url))?;

    let destination = options.output_dir.join(format!("{}.csv", target.name));
    writer::save_products_to_csv(&products, &destination)
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    debug_println!("Wrote {} products to {}", products.len(), destination.display());
    Ok(products.len())
}

/// Sweeps the targets in declaration order. A category failure is captured in
/// its outcome and the remaining categories still run; the categories share
/// no state, so one broken page only costs its own CSV.
pub fn run_all<F: PageFetcher>(
    fetcher: &F,
    targets: &[ScrapeTarget],
    options: &ScrapeOptions,
    mut tui: Option<&mut SweepTui>,
) -> Vec<CategoryOutcome> {
    let mut outcomes = Vec::with_capacity(targets.len());

    for target in targets {
        if let Some(tui) = tui.as_mut() {
            let _ = tui.start_category(target.name);
        }

        let result = run_category(fetcher, target, options);
        match &result {
            Ok(count) => {
                if let Some(tui) = tui.as_mut() {
                    let _ = tui.complete_category(target.name, *count);
                }
            }
            Err(e) => match tui.as_mut() {
                Some(tui) => {
                    let _ = tui.fail_category(target.name);
                }
                None => eprintln!("Error scraping category {}: {:#}", target.name, e),
            },
        }

        outcomes.push(CategoryOutcome {
            name: target.name.to_string(),
            result,
        });
    }

    outcomes
}
