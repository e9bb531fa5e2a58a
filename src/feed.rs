//! RSS 2.0 feed of recently found boats.

use crate::error::FeedError;
use crate::models::{found_at, Listing};
use crate::store::write_atomic;
use chrono::{DateTime, Duration, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Channel-level feed metadata
#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

impl FeedChannel {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            title: "Sailing Boats for Sale - Multi-site Feed".to_string(),
            link: link.into(),
            description: "New sailing boats from dba.dk, blocket.se, finn.no, kleinanzeigen.de, and marktplaats.nl"
                .to_string(),
            language: "en".to_string(),
        }
    }
}

/// Listings found strictly after `now - window_days`, newest first, ties by id
pub fn recent_listings<'a>(
    listings: impl IntoIterator<Item = &'a Listing>,
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<&'a Listing> {
    // A window reaching past chrono's range includes everything
    let cutoff = Duration::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut recent: Vec<&Listing> = listings
        .into_iter()
        .filter(|boat| boat.date_found > cutoff)
        .collect();
    recent.sort_by(|a, b| b.date_found.cmp(&a.date_found).then_with(|| a.id.cmp(&b.id)));
    recent
}

/// HTML body of one feed item
fn item_description(boat: &Listing) -> String {
    format!(
        "<strong>Price:</strong> {}<br><strong>Location:</strong> {}<br><strong>Source:</strong> {}<br><strong>Found:</strong> {}<br><a href='{}'>View Listing</a>",
        escape(boat.price.as_str()),
        escape(boat.location.as_str()),
        boat.source,
        found_at::format(&boat.date_found),
        escape(boat.url.as_str()),
    )
}

fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(FeedError::render)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(FeedError::render)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(FeedError::render)?;
    Ok(())
}

/// Render `entries` as an RSS 2.0 document, in the given order
pub fn render_rss(
    channel: &FeedChannel,
    entries: &[&Listing],
    built_at: DateTime<Utc>,
) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(FeedError::render)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("rss").with_attributes([("version", "2.0")]),
        ))
        .map_err(FeedError::render)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(FeedError::render)?;

    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;
    text_element(&mut writer, "description", &channel.description)?;
    text_element(&mut writer, "language", &channel.language)?;
    text_element(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;
    text_element(
        &mut writer,
        "generator",
        concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
    )?;

    for boat in entries {
        writer
            .write_event(Event::Start(BytesStart::new("item")))
            .map_err(FeedError::render)?;

        text_element(&mut writer, "title", &format!("{} - {}", boat.title, boat.price))?;
        text_element(&mut writer, "link", &boat.url)?;
        text_element(&mut writer, "description", &item_description(boat))?;

        writer
            .write_event(Event::Start(
                BytesStart::new("guid").with_attributes([("isPermaLink", "false")]),
            ))
            .map_err(FeedError::render)?;
        writer
            .write_event(Event::Text(BytesText::new(&boat.id)))
            .map_err(FeedError::render)?;
        writer
            .write_event(Event::End(BytesEnd::new("guid")))
            .map_err(FeedError::render)?;

        text_element(&mut writer, "pubDate", &boat.date_found.to_rfc2822())?;

        writer
            .write_event(Event::End(BytesEnd::new("item")))
            .map_err(FeedError::render)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(FeedError::render)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(FeedError::render)?;

    String::from_utf8(writer.into_inner()).map_err(FeedError::render)
}

/// Write the feed of listings from the last `window_days` days to `path`.
/// Returns the number of items written.
#[instrument(level = "info", skip(listings, channel, path), fields(path = %path.display()))]
pub async fn publish<'a>(
    listings: impl IntoIterator<Item = &'a Listing>,
    window_days: u32,
    channel: &FeedChannel,
    path: &Path,
) -> Result<usize, FeedError> {
    let now = Utc::now();
    let entries = recent_listings(listings, window_days, now);
    let xml = render_rss(channel, &entries, now)?;

    write_atomic(path, xml.as_bytes())
        .await
        .map_err(|source| FeedError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(entries = entries.len(), "Wrote RSS feed");
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 10, 12, 0, 0).unwrap()
    }

    fn boat(n: u32, found: DateTime<Utc>) -> Listing {
        Listing::new(
            format!("https://www.finn.no/bap/forsale/ad.html?finnkode={n}"),
            format!("Boat {n}"),
            format!("{n}0 000 kr"),
            "Norway".to_string(),
            Source::FinnNo,
            found,
        )
    }

    #[test]
    fn test_window_keeps_only_recent() {
        let boats = vec![
            boat(1, now()),
            boat(2, now() - Duration::days(3)),
            boat(3, now() - Duration::days(8)),
        ];

        let recent = recent_listings(&boats, DEFAULT_WINDOW_DAYS, now());

        let titles: Vec<&str> = recent.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Boat 1", "Boat 2"]);
    }

    #[test]
    fn test_cutoff_is_exclusive() {
        let boats = vec![boat(1, now() - Duration::days(7))];

        assert!(recent_listings(&boats, 7, now()).is_empty());
    }

    #[test]
    fn test_legacy_naive_timestamp_is_compared_as_utc() {
        let mut old = boat(1, now());
        old.date_found = found_at::parse("2024-07-09T13:00:00").unwrap();
        let boats = vec![old];

        assert_eq!(recent_listings(&boats, 1, now()).len(), 1);
        assert!(recent_listings(&boats, 0, now()).is_empty());
    }

    #[test]
    fn test_huge_window_includes_everything() {
        let boats = vec![boat(1, now()), boat(2, now() - Duration::days(365 * 50))];

        assert_eq!(recent_listings(&boats, u32::MAX, now()).len(), 2);
        assert_eq!(recent_listings(&boats, 100_000_000, now()).len(), 2);
    }

    #[test]
    fn test_newest_first_with_id_tiebreak() {
        let same = now() - Duration::hours(2);
        let boats = vec![
            boat(1, now() - Duration::days(2)),
            boat(2, same),
            boat(3, now() - Duration::hours(1)),
            boat(4, same),
        ];

        let recent = recent_listings(&boats, 7, now());

        assert_eq!(recent[0].title, "Boat 3");
        assert!(recent[1].id < recent[2].id);
        assert_eq!(recent[1].date_found, same);
        assert_eq!(recent[2].date_found, same);
        assert_eq!(recent[3].title, "Boat 1");
    }

    #[test]
    fn test_render_rss_items() {
        let mut fancy = boat(1, now());
        fancy.title = "Bavaria 32 & trailer".to_string();
        let boats = vec![fancy, boat(2, now() - Duration::days(1))];
        let entries = recent_listings(&boats, 7, now());

        let xml = render_rss(&FeedChannel::new("https://example.com"), &entries, now()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<title>Sailing Boats for Sale - Multi-site Feed</title>"));
        assert!(xml.contains("<language>en</language>"));
        assert!(xml.contains("<title>Bavaria 32 &amp; trailer - 10 000 kr</title>"));
        assert!(xml.contains(&format!("<guid isPermaLink=\"false\">{}</guid>", boats[0].id)));
        assert!(xml.contains("<pubDate>Wed, 10 Jul 2024 12:00:00 +0000</pubDate>"));
        assert!(xml.contains("&lt;strong&gt;Source:&lt;/strong&gt; finn.no"));
        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.find("Boat 2").unwrap() > xml.find("Bavaria 32").unwrap());
    }

    #[test]
    fn test_description_template() {
        let html = item_description(&boat(5, now()));

        assert_eq!(
            html,
            "<strong>Price:</strong> 50 000 kr<br><strong>Location:</strong> Norway<br>\
             <strong>Source:</strong> finn.no<br><strong>Found:</strong> 2024-07-10T12:00:00+00:00<br>\
             <a href='https://www.finn.no/bap/forsale/ad.html?finnkode=5'>View Listing</a>"
        );
    }

    #[tokio::test]
    async fn test_publish_writes_file_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sailing_boats.xml");
        let boats = vec![
            boat(1, Utc::now()),
            boat(2, Utc::now() - Duration::days(30)),
        ];

        let count = publish(&boats, 7, &FeedChannel::new("https://example.com"), &path)
            .await
            .unwrap();

        assert_eq!(count, 1);
        let xml = std::fs::read_to_string(&path).unwrap();
        assert_eq!(xml.matches("<item>").count(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_feed_path_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let boats = vec![boat(1, Utc::now())];

        let err = publish(&boats, 7, &FeedChannel::new("https://example.com"), &blocker.join("feed.xml"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, FeedError::Write { .. }));
    }
}
