// Affiliate link construction. We only build the URL; fetching it is the browser's job.
use crate::config::AffiliateConfig;

/// Shown wherever affiliate links are rendered
pub const AFFILIATE_DISCLOSURE: &str =
    "As an Amazon Associate, Supplyify earns from qualifying purchases.";

/// Build `<search_url>?k=<query>&tag=<tag>` with both values percent-encoded
///
/// No validation on the query: an empty one still yields a (useless) valid link.
pub fn build_link(search_url: &str, query: &str, affiliate_tag: &str) -> String {
    format!(
        "{}?k={}&tag={}",
        search_url,
        urlencoding::encode(query),
        urlencoding::encode(affiliate_tag)
    )
}

/// Link builder bound to one marketplace and tracking tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateLinks {
    search_url: String,
    tag: String,
}

impl AffiliateLinks {
    pub fn new(search_url: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
            tag: tag.into(),
        }
    }

    pub fn from_config(config: &AffiliateConfig) -> Self {
        Self::new(config.search_url.clone(), config.tag.clone())
    }

    pub fn build(&self, query: &str) -> String {
        build_link(&self.search_url, query, &self.tag)
    }
}

impl Default for AffiliateLinks {
    fn default() -> Self {
        Self::from_config(&AffiliateConfig::default())
    }
}
