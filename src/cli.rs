//! Command-line options. Every option can also come from the environment.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Scrape sailing boat ads from five classified sites and publish an RSS feed of new ones.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON store of every boat seen so far
    #[arg(long, env = "BOAT_DATA_FILE", default_value = "boat_data.json")]
    pub data_file: PathBuf,

    /// Where to write the RSS feed
    #[arg(long, env = "BOAT_RSS_FILE", default_value = "sailing_boats.xml")]
    pub rss_file: PathBuf,

    /// Days of listings to include in the feed
    #[arg(long, env = "FEED_WINDOW_DAYS", default_value_t = crate::feed::DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,

    /// Pause between sites, in milliseconds
    #[arg(long, env = "SITE_DELAY_MS", default_value_t = 1000)]
    pub site_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Channel link advertised in the feed
    #[arg(long, env = "FEED_LINK", default_value = "https://example.com")]
    pub feed_link: String,
}

impl Cli {
    pub fn site_delay(&self) -> Duration {
        Duration::from_millis(self.site_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "boat-scout",
            "--data-file",
            "/tmp/boats.json",
            "--rss-file",
            "/tmp/boats.xml",
            "--window-days",
            "14",
            "--site-delay-ms",
            "0",
        ]);

        assert_eq!(cli.data_file, PathBuf::from("/tmp/boats.json"));
        assert_eq!(cli.rss_file, PathBuf::from("/tmp/boats.xml"));
        assert_eq!(cli.window_days, 14);
        assert_eq!(cli.site_delay(), Duration::ZERO);
    }

    #[test]
    fn test_cli_rejects_negative_window() {
        assert!(Cli::try_parse_from(["boat-scout", "--window-days", "-1"]).is_err());
    }
}
