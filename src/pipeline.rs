//! One scrape run: every site in turn, then a single store save.

use crate::error::{SiteError, StorageError};
use crate::models::Listing;
use crate::scrapers::{PageFetcher, SiteExtractor, SiteProfile};
use crate::store::BoatStore;
use chrono::Utc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// How one site ended
#[derive(Debug)]
pub enum SiteOutcome {
    Succeeded { new_listings: usize },
    Failed(SiteError),
}

/// Counters for a single run. Reported, never stored.
#[derive(Debug, Default)]
pub struct RunStats {
    pub new_listings: usize,
    pub total_listings: usize,
    pub sites_succeeded: usize,
    pub sites_failed: usize,
    pub errors: Vec<String>,
}

impl RunStats {
    pub fn sites_attempted(&self) -> usize {
        self.sites_succeeded + self.sites_failed
    }

    /// True when at least one site ran and none of them succeeded
    pub fn all_sites_failed(&self) -> bool {
        self.sites_failed > 0 && self.sites_succeeded == 0
    }

    fn record(&mut self, site: &str, outcome: &SiteOutcome) {
        match outcome {
            SiteOutcome::Succeeded { new_listings } => {
                self.sites_succeeded += 1;
                self.new_listings += new_listings;
                println!("✅ {site}: Found {new_listings} new boats");
            }
            SiteOutcome::Failed(e) => {
                self.sites_failed += 1;
                self.errors.push(format!("{site}: {e}"));
                println!("❌ {site}: Failed - {e}");
            }
        }
    }
}

/// Result of a completed run
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    /// Listings added this run, in site order
    pub new_listings: Vec<Listing>,
}

/// Scrape every profile in order, add new listings to `store` and save it once.
///
/// A failing site is recorded and the run moves on. Only a failed save
/// aborts the run.
#[instrument(level = "info", skip_all, fields(sites = profiles.len()))]
pub async fn run_scrape(
    fetcher: &dyn PageFetcher,
    profiles: &[SiteProfile],
    store: &mut BoatStore,
    site_delay: Duration,
) -> Result<RunReport, StorageError> {
    let mut stats = RunStats::default();
    let mut new_listings = Vec::new();

    for (i, profile) in profiles.iter().enumerate() {
        if i > 0 && !site_delay.is_zero() {
            tokio::time::sleep(site_delay).await;
        }

        let outcome = match scrape_site(fetcher, profile, store).await {
            Ok(found) => {
                let mut added = 0;
                for listing in found {
                    if store.upsert_if_absent(listing.clone()) {
                        added += 1;
                        new_listings.push(listing);
                    }
                }
                SiteOutcome::Succeeded { new_listings: added }
            }
            Err(e) => {
                warn!(site = profile.name(), error = %e, "Site failed");
                SiteOutcome::Failed(e)
            }
        };

        stats.record(profile.name(), &outcome);
    }

    store.save().await?;
    stats.total_listings = store.len();

    info!(
        new = stats.new_listings,
        total = stats.total_listings,
        succeeded = stats.sites_succeeded,
        failed = stats.sites_failed,
        "Scrape run finished"
    );

    Ok(RunReport {
        stats,
        new_listings,
    })
}

async fn scrape_site(
    fetcher: &dyn PageFetcher,
    profile: &SiteProfile,
    store: &BoatStore,
) -> Result<Vec<Listing>, SiteError> {
    println!("Scraping {}...", profile.name());
    let extractor = SiteExtractor::new(*profile)?;

    let html = fetcher.fetch(profile.search_url).await?;
    let listings = extractor.extract(&html, &store.known_ids(), Utc::now());

    info!(site = profile.name(), new = listings.len(), "Site scraped");
    Ok(listings)
}
