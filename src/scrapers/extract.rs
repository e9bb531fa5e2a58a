//! Generic listing extraction driven by a [`SiteProfile`].
//!
//! A page is split into fragments with the profile's container selector.
//! Each fragment is handled on its own: a broken fragment is logged and
//! skipped, the rest of the page still counts.

use crate::error::{ExtractError, FragmentError};
use crate::models::{listing_id, Listing};
use crate::scrapers::types::{FieldRule, FieldSpec, SiteProfile};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Fragments considered per page
pub const MAX_FRAGMENTS: usize = 20;

enum CompiledRule {
    FirstText(Selector),
    LinkText,
    TextContaining(&'static str),
    Fixed,
}

struct CompiledField {
    rule: CompiledRule,
    fallback: &'static str,
}

impl CompiledField {
    fn compile(spec: FieldSpec) -> Result<Self, ExtractError> {
        let rule = match spec.rule {
            FieldRule::FirstText(sel) => CompiledRule::FirstText(parse_selector(sel)?),
            FieldRule::LinkText => CompiledRule::LinkText,
            FieldRule::TextContaining(needle) => CompiledRule::TextContaining(needle),
            FieldRule::Fixed => CompiledRule::Fixed,
        };

        Ok(Self {
            rule,
            fallback: spec.fallback,
        })
    }

    fn read(&self, fragment: ElementRef<'_>, link: ElementRef<'_>) -> String {
        let found = match &self.rule {
            CompiledRule::FirstText(selector) => fragment.select(selector).next().map(element_text),
            CompiledRule::LinkText => Some(element_text(link)),
            CompiledRule::TextContaining(needle) => fragment
                .text()
                .find(|text| text.contains(needle))
                .map(|text| text.trim().to_string()),
            CompiledRule::Fixed => None,
        };

        found.unwrap_or_else(|| self.fallback.to_string())
    }
}

/// A site profile with its selectors compiled, ready to run over pages
pub struct SiteExtractor {
    profile: SiteProfile,
    base_url: Url,
    container: Selector,
    link: Selector,
    title: CompiledField,
    price: CompiledField,
    location: CompiledField,
}

impl SiteExtractor {
    pub fn new(profile: SiteProfile) -> Result<Self, ExtractError> {
        let base_url = Url::parse(profile.search_url).map_err(|source| ExtractError::BaseUrl {
            url: profile.search_url.to_string(),
            source,
        })?;

        Ok(Self {
            base_url,
            container: parse_selector(profile.container)?,
            link: parse_selector(profile.link)?,
            title: CompiledField::compile(profile.title)?,
            price: CompiledField::compile(profile.price)?,
            location: CompiledField::compile(profile.location)?,
            profile,
        })
    }

    /// Pull listings out of a search page.
    ///
    /// Only listings whose id is neither in `known_ids` nor already produced
    /// from this page are returned. Every returned listing gets `found_at` as
    /// its `date_found`.
    pub fn extract(
        &self,
        html: &str,
        known_ids: &HashSet<String>,
        found_at: DateTime<Utc>,
    ) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut listings = Vec::new();
        let mut skipped = 0usize;

        for (index, fragment) in document.select(&self.container).take(MAX_FRAGMENTS).enumerate() {
            match self.extract_fragment(fragment, known_ids, &seen, found_at) {
                Ok(Some(listing)) => {
                    seen.insert(listing.id.clone());
                    listings.push(listing);
                }
                Ok(None) => {}
                Err(e) => {
                    skipped += 1;
                    debug!(site = self.profile.name(), index, error = %e, "Skipping malformed listing");
                }
            }
        }

        debug!(
            site = self.profile.name(),
            new = listings.len(),
            malformed = skipped,
            "Extracted listings from page"
        );
        listings
    }

    fn extract_fragment(
        &self,
        fragment: ElementRef<'_>,
        known_ids: &HashSet<String>,
        seen: &HashSet<String>,
        found_at: DateTime<Utc>,
    ) -> Result<Option<Listing>, FragmentError> {
        let Some(link) = fragment.select(&self.link).next() else {
            return Ok(None);
        };

        let href = link.value().attr("href").ok_or(FragmentError::MissingHref)?;
        let url = self
            .base_url
            .join(href)
            .map_err(|source| FragmentError::InvalidLink {
                href: href.to_string(),
                source,
            })?
            .to_string();

        let id = listing_id(&url);
        if known_ids.contains(&id) || seen.contains(&id) {
            return Ok(None);
        }

        Ok(Some(Listing {
            id,
            title: self.title.read(fragment, link),
            price: self.price.read(fragment, link),
            location: self.location.read(fragment, link),
            url,
            source: self.profile.source,
            date_found: found_at,
        }))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::selector(selector, e))
}

/// All descendant text, each piece trimmed, joined without separator
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}
