mod cli;
mod error;
mod feed;
mod models;
mod pipeline;
mod scrapers;
mod store;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use cli::Cli;
use feed::FeedChannel;
use pipeline::RunReport;
use scrapers::{profiles, HttpFetcher};
use std::process::ExitCode;
use store::BoatStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// New listings echoed at the end of a run
const SHOWN_NEW_BOATS: usize = 15;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> anyhow::Result<ExitCode> {
    println!("{}", "=".repeat(60));
    println!("⛵ SAILING BOAT SCOUT");
    println!("{}", "=".repeat(60));
    println!("Run started: {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));

    let mut store = BoatStore::load(&args.data_file)
        .await
        .context("Failed to load boat store")?;
    if store.is_empty() {
        println!("No previous database, starting fresh\n");
    } else {
        println!("Previous database size: {} boats\n", store.len());
    }

    let fetcher = HttpFetcher::new(args.timeout())?;
    let sites = profiles::all();

    info!(sites = sites.len(), "Starting scraping process...");
    let report = pipeline::run_scrape(&fetcher, &sites, &mut store, args.site_delay())
        .await
        .context("Failed to save boat store")?;

    print_report(&report);

    println!("\n{}", "=".repeat(60));
    println!("Generating RSS feed...");
    println!("{}", "=".repeat(60));

    let channel = FeedChannel::new(args.feed_link.clone());
    let published = feed::publish(store.listings(), args.window_days, &channel, &args.rss_file)
        .await
        .context("Feed generation failed (scrape results were already saved)")?;

    println!("\n✅ RSS feed generated: {}", args.rss_file.display());
    println!("   Boats in feed (last {} days): {}", args.window_days, published);
    println!("\nRun finished: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));

    if report.stats.all_sites_failed() {
        warn!("All sites failed to scrape!");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &RunReport) {
    let stats = &report.stats;
    let site_count = stats.sites_attempted();

    println!("\n{}", "=".repeat(60));
    println!("SCRAPING STATISTICS");
    println!("{}", "=".repeat(60));
    println!("Sites scraped successfully: {}/{}", stats.sites_succeeded, site_count);
    println!("Sites failed: {}/{}", stats.sites_failed, site_count);
    println!("New boats found: {}", stats.new_listings);
    println!("Total boats in database: {}", stats.total_listings);

    if !stats.errors.is_empty() {
        println!("\nErrors encountered:");
        for e in &stats.errors {
            println!("  - {}", e);
        }
    }
    println!("{}", "=".repeat(60));

    if report.new_listings.is_empty() {
        println!("\n📋 No new boats found in this run");
        return;
    }

    println!("\n📋 New boats found ({}):", report.new_listings.len());
    for (i, boat) in report.new_listings.iter().take(SHOWN_NEW_BOATS).enumerate() {
        println!("  {}. {} ({}) - {}", i + 1, boat.title, boat.source, boat.price);
    }
    if report.new_listings.len() > SHOWN_NEW_BOATS {
        println!("  ... and {} more", report.new_listings.len() - SHOWN_NEW_BOATS);
    }
}
