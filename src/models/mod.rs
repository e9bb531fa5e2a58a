pub mod identity;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use identity::listing_id;

/// Classified-ad site a listing was found on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Source {
    #[serde(rename = "dba.dk")]
    DbaDk,
    #[serde(rename = "blocket.se")]
    BlocketSe,
    #[serde(rename = "finn.no")]
    FinnNo,
    #[serde(rename = "kleinanzeigen.de")]
    KleinanzeigenDe,
    #[serde(rename = "marktplaats.nl")]
    MarktplaatsNl,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::DbaDk => "dba.dk",
            Source::BlocketSe => "blocket.se",
            Source::FinnNo => "finn.no",
            Source::KleinanzeigenDe => "kleinanzeigen.de",
            Source::MarktplaatsNl => "marktplaats.nl",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boat advertisement.
///
/// Stored once on first sighting and never updated afterwards; `id` is the
/// MD5 of `url` and is the only key into the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    /// Price exactly as the site prints it
    pub price: String,
    pub location: String,
    pub url: String,
    pub source: Source,
    #[serde(with = "found_at")]
    pub date_found: DateTime<Utc>,
}

#[cfg(test)]
impl Listing {
    /// Build a listing, deriving its id from `url`
    pub fn new(
        url: String,
        title: String,
        price: String,
        location: String,
        source: Source,
        date_found: DateTime<Utc>,
    ) -> Self {
        Self {
            id: listing_id(&url),
            title,
            price,
            location,
            url,
            source,
            date_found,
        }
    }
}

/// Timestamp codec for `date_found`.
///
/// Writes RFC 3339 with a `+00:00` offset. Reads RFC 3339 as well as
/// offset-less ISO timestamps from older stores, which are taken as UTC.
pub mod found_at {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        let raw = raw.trim();
        let aware = match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => return Ok(dt.with_timezone(&Utc)),
            Err(e) => e,
        };

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
            .ok_or(aware)
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid date_found {raw:?}: {e}")))
    }
}
