#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the development comparables pipeline.
//!
//! Scrapes the bostonplans.org development-projects listing, geocodes the
//! listed addresses (cache-first, then a race of free geocoders), ranks
//! them by distance from the target address, and writes a Markdown report
//! of the closest projects.

mod pipeline;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dev_comps",
    about = "Finds development projects comparable to a target address"
)]
struct Cli {
    /// Target street address (e.g., "263 N Harvard St, Allston, MA 02134")
    target: String,

    /// Maximum number of listing pages to scrape
    #[arg(long, default_value = "20")]
    pages: u32,

    /// Delay between listing page fetches, in milliseconds
    #[arg(long, default_value = "400")]
    page_delay_ms: u64,

    /// Number of addresses geocoded concurrently per batch
    #[arg(long, default_value = "10")]
    batch_size: usize,

    /// Number of closest developments to include in the report
    #[arg(long, default_value = "30")]
    top: usize,

    /// Path of the JSON coordinate cache
    #[arg(long, default_value = "cached-developments.json")]
    cache: PathBuf,

    /// Path of the Markdown report to write
    #[arg(long, default_value = "closest_developments.md")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let options = pipeline::PipelineOptions {
        target_address: cli.target,
        max_pages: cli.pages,
        page_delay_ms: cli.page_delay_ms,
        batch_size: cli.batch_size,
        top_n: cli.top,
        cache_path: cli.cache,
        report_path: cli.output,
    };

    pipeline::run(&options).await?;

    Ok(())
}
