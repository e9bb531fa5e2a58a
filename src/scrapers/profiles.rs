use crate::models::Source;
use crate::scrapers::types::{FieldRule, FieldSpec, SiteProfile};

const UNKNOWN_TITLE: &str = "Unknown boat";
const NO_PRICE: &str = "Price not listed";

pub const DBA_DK: SiteProfile = SiteProfile {
    source: Source::DbaDk,
    search_url: "https://www.dba.dk/sejlbaade/",
    container: "tr.dbaListing",
    link: "a.listingLink",
    title: FieldSpec::new(FieldRule::LinkText, UNKNOWN_TITLE),
    price: FieldSpec::new(FieldRule::FirstText("td.price"), NO_PRICE),
    location: FieldSpec::new(FieldRule::FirstText("td.city"), "Location not listed"),
};

pub const BLOCKET_SE: SiteProfile = SiteProfile {
    source: Source::BlocketSe,
    search_url: "https://www.blocket.se/annonser/hela_sverige/fordon/batar/segelbaatar",
    container: "article",
    link: "a[href]",
    title: FieldSpec::new(FieldRule::FirstText("h2, h3"), UNKNOWN_TITLE),
    price: FieldSpec::new(FieldRule::TextContaining("kr"), NO_PRICE),
    location: FieldSpec::fixed("Sweden"),
};

pub const FINN_NO: SiteProfile = SiteProfile {
    source: Source::FinnNo,
    search_url: "https://www.finn.no/bap/forsale/search.html?product_category=2.93.3231",
    container: "article.ads__unit",
    link: "a[href]",
    title: FieldSpec::new(FieldRule::FirstText("h2, h3"), UNKNOWN_TITLE),
    price: FieldSpec::new(FieldRule::TextContaining("kr"), NO_PRICE),
    location: FieldSpec::fixed("Norway"),
};

pub const KLEINANZEIGEN_DE: SiteProfile = SiteProfile {
    source: Source::KleinanzeigenDe,
    search_url: "https://www.kleinanzeigen.de/s-segelboote/anzeige:angebote/preis::10000/c211l0",
    container: "article.aditem",
    link: "a.ellipsis",
    title: FieldSpec::new(FieldRule::LinkText, UNKNOWN_TITLE),
    price: FieldSpec::new(
        FieldRule::FirstText("p.aditem-main--middle--price-shipping--price"),
        "VB",
    ),
    location: FieldSpec::new(FieldRule::FirstText("div.aditem-main--top--left"), "Germany"),
};

pub const MARKTPLAATS_NL: SiteProfile = SiteProfile {
    source: Source::MarktplaatsNl,
    search_url: "https://www.marktplaats.nl/l/watersport-en-boten/zeilboten/#q:zeilboot",
    container: "li.mp-Listing",
    link: "a[href]",
    title: FieldSpec::new(FieldRule::FirstText("h3"), UNKNOWN_TITLE),
    price: FieldSpec::new(FieldRule::FirstText("span.mp-text-price-label"), NO_PRICE),
    location: FieldSpec::fixed("Netherlands"),
};

/// All monitored sites, in scrape order
pub fn all() -> [SiteProfile; 5] {
    [DBA_DK, BLOCKET_SE, FINN_NO, KLEINANZEIGEN_DE, MARKTPLAATS_NL]
}
