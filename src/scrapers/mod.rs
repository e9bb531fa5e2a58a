pub mod extract;
pub mod http;
pub mod profiles;
pub mod traits;
pub mod types;

pub use extract::SiteExtractor;
pub use http::HttpFetcher;
pub use traits::PageFetcher;
pub use types::SiteProfile;
