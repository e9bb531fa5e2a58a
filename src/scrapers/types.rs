use crate::models::Source;

/// How one listing field is looked up inside a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Text of the first element matching the selector
    FirstText(&'static str),
    /// Text of the listing's link element
    LinkText,
    /// First text node containing the needle, trimmed
    TextContaining(&'static str),
    /// The site shows nothing usable; always take the fallback
    Fixed,
}

/// A field rule plus the placeholder used when its element is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub rule: FieldRule,
    pub fallback: &'static str,
}

impl FieldSpec {
    pub const fn new(rule: FieldRule, fallback: &'static str) -> Self {
        Self { rule, fallback }
    }

    pub const fn fixed(value: &'static str) -> Self {
        Self::new(FieldRule::Fixed, value)
    }
}

/// Everything that differs between the monitored sites.
///
/// Selectors are plain CSS strings and are compiled when the profile is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteProfile {
    pub source: Source,
    /// Search page to fetch; relative links resolve against it
    pub search_url: &'static str,
    /// Repeated element wrapping one listing
    pub container: &'static str,
    /// Link to the listing, searched inside the container
    pub link: &'static str,
    pub title: FieldSpec,
    pub price: FieldSpec,
    pub location: FieldSpec,
}

impl SiteProfile {
    pub fn name(&self) -> &'static str {
        self.source.as_str()
    }
}
