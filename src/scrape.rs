use url::Url;

use crate::cli::ScrapeArgs;
use crate::config::ScrapeConfig;
use crate::fetch::{HttpPageSource, PageSource};
use crate::formats::{CategoryRef, LeafRef, Manifest};
use crate::store::Archive;

const RULE: &str = "============================================================";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Leaves saved this run plus leaves already present on disk.
    pub scraped: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafOutcome {
    Saved,
    AlreadyPresent,
    Failed,
}

pub fn run(args: ScrapeArgs) -> anyhow::Result<RunSummary> {
    let config = ScrapeConfig::from_args(&args)?;
    let source = HttpPageSource::new(&config)?;
    scrape_all(&config, &source)
}

pub fn scrape_all(config: &ScrapeConfig, source: &dyn PageSource) -> anyhow::Result<RunSummary> {
    println!("{RULE}");
    println!("{} Scraper", config.title);
    println!("{RULE}");

    let categories = root_categories(&config.base_url, source)?;
    println!("Found {} categories", categories.len());

    let mut archive = Archive::new(&config.out_dir);
    let mut manifest = Manifest::new(config.base_url.as_str());
    let mut summary = RunSummary::default();

    for (i, category) in categories.iter().enumerate() {
        println!(
            "\n[{}/{}] Processing: {}",
            i + 1,
            categories.len(),
            category.name
        );

        for leaf in resolve_leaves(&config.base_url, source, category)? {
            match scrape_leaf(&leaf, source, &mut archive, &mut manifest)? {
                LeafOutcome::Saved => summary.scraped += 1,
                LeafOutcome::AlreadyPresent => {
                    summary.scraped += 1;
                    summary.skipped += 1;
                }
                LeafOutcome::Failed => summary.failed += 1,
            }
        }
    }

    println!("\nGenerating manifest and index files...");
    let written = crate::index::write_outputs(&config.out_dir, &mut manifest, &config.title)?;
    println!("\n✓ Manifest saved: {}", written.manifest.display());
    println!("✓ Index saved: {}", written.index.display());

    let out_display = std::path::absolute(&config.out_dir)
        .unwrap_or_else(|_| config.out_dir.clone());
    println!("\n{RULE}");
    println!("Scraping complete!");
    println!("  Successfully scraped: {}", summary.scraped);
    println!("  Already present: {}", summary.skipped);
    println!("  Failed: {}", summary.failed);
    println!("  Output directory: {}", out_display.display());
    println!("{RULE}");

    tracing::info!(
        scraped = summary.scraped,
        skipped = summary.skipped,
        failed = summary.failed,
        new_files = manifest.metadata.total_files,
        "scrape finished"
    );
    Ok(summary)
}

fn root_categories(base_url: &Url, source: &dyn PageSource) -> anyhow::Result<Vec<CategoryRef>> {
    println!("Fetching main documentation page...");
    let Some(html) = source.fetch(&[]) else {
        anyhow::bail!("failed to fetch main documentation page: {base_url}");
    };

    let categories = crate::site::parse_categories(&html, base_url)?;
    if categories.is_empty() {
        anyhow::bail!("failed to parse main documentation page: no categories found");
    }
    Ok(categories)
}

fn resolve_leaves(
    base_url: &Url,
    source: &dyn PageSource,
    category: &CategoryRef,
) -> anyhow::Result<Vec<LeafRef>> {
    println!("Fetching subcategories for {}...", category.name);
    let Some(html) = source.fetch(&category.query_params()) else {
        println!("  No subcategories found, scraping main page...");
        return Ok(vec![LeafRef::from_category(category)]);
    };
    crate::site::parse_leaves(&html, base_url, category)
}

fn scrape_leaf(
    leaf: &LeafRef,
    source: &dyn PageSource,
    archive: &mut Archive,
    manifest: &mut Manifest,
) -> anyhow::Result<LeafOutcome> {
    let path = archive.locate(leaf);
    if path.exists() {
        println!("  ✓ Already exists: {}", leaf.name);
        return Ok(LeafOutcome::AlreadyPresent);
    }

    println!("  Scraping: {}...", leaf.name);
    let Some(html) = source.fetch(&leaf.target().params) else {
        return Ok(LeafOutcome::Failed);
    };

    let Some(fragment) = crate::site::extract_content(&html)? else {
        println!("  ✗ No content found for {}", leaf.name);
        tracing::warn!(
            version = %leaf.version,
            category = %leaf.category_name,
            item = %leaf.name,
            "no content found"
        );
        return Ok(LeafOutcome::Failed);
    };

    let markdown = crate::convert::html_to_markdown(&fragment);
    archive.write_document(leaf, &path, &markdown)?;
    manifest.record(leaf, &path.relative);
    println!("  ✓ Saved: {}", path.absolute.display());

    Ok(LeafOutcome::Saved)
}
