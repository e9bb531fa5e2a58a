/// Stable listing id: lowercase hex MD5 of the absolute listing URL
pub fn listing_id(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_url_same_id() {
        let url = "https://www.finn.no/bap/forsale/ad.html?finnkode=123";

        assert_eq!(listing_id(url), listing_id(url));
    }

    #[test]
    fn test_known_digest() {
        // md5("") and md5("abc")
        assert_eq!(listing_id(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(listing_id("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_distinct_urls_distinct_ids() {
        let ids: HashSet<String> = (0..1000)
            .map(|i| listing_id(&format!("https://www.blocket.se/annons/{i}")))
            .collect();

        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.len() == 32));
    }
}
