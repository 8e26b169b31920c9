// ---------------------------------------------------------------------------
// Feed page fetching
// ---------------------------------------------------------------------------
//
// Retrieves one page of the NVD 2.0 API per call. The orchestrator only
// depends on the FeedSource trait, so tests can script pages in memory.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::types::{FeedItem, FeedPage};

/// Default NVD 2.0 endpoint.
pub const DEFAULT_FEED_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

/// Where feed pages come from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch page `page` (1-based) of `page_size` items. An empty vec on a
    /// successful response means the feed is exhausted, not an error.
    async fn fetch_page(&self, page: u32, page_size: u32)
    -> Result<Vec<FeedItem>, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(StatusCode),
    #[error("failed to decode feed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Zero-based offset of the first item on a 1-based page.
pub(crate) fn start_index(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1) * page_size
}

/// HTTP client for the NVD 2.0 CVE feed.
pub struct NvdClient {
    http: reqwest::Client,
    base_url: String,
}

impl NvdClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("cvemirror/0.1")
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl FeedSource for NvdClient {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<FeedItem>, FetchError> {
        let offset = start_index(page, page_size);
        debug!(page, page_size, offset, "requesting feed page");

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("startIndex", offset), ("resultsPerPage", page_size)])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let bytes = resp.bytes().await?;
        let body: FeedPage = serde_json::from_slice(&bytes)?;
        Ok(body.vulnerabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_index_is_zero_based() {
        assert_eq!(start_index(1, 10), 0);
        assert_eq!(start_index(3, 25), 50);
        assert_eq!(start_index(2, 10), 10);
    }

    #[test]
    fn feed_page_decodes_nvd_shape() {
        let body = r#"{
            "resultsPerPage": 2,
            "startIndex": 0,
            "totalResults": 2,
            "vulnerabilities": [
                {"cve": {"id": "CVE-2024-0001",
                         "descriptions": [{"lang": "en", "value": "a bug"}],
                         "published": "2024-01-10T00:00:00.000",
                         "lastModified": "2024-02-01T00:00:00.000",
                         "sourceIdentifier": "cve@mitre.org"}},
                {"cve": {"id": "CVE-2024-0002"}}
            ]
        }"#;
        let page: FeedPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_results, 2);
        assert_eq!(page.vulnerabilities.len(), 2);

        let first = &page.vulnerabilities[0].cve;
        assert_eq!(first.id, "CVE-2024-0001");
        assert_eq!(first.last_modified, "2024-02-01T00:00:00.000");
        // Unmodeled fields survive in the extra map.
        assert_eq!(first.extra["sourceIdentifier"], "cve@mitre.org");

        // A bare cve object decodes with empty defaults.
        let second = &page.vulnerabilities[1].cve;
        assert!(second.descriptions.is_empty());
        assert!(second.references.is_empty());
    }

    #[test]
    fn empty_page_decodes_to_no_items() {
        let body = r#"{"resultsPerPage": 0, "startIndex": 20, "totalResults": 20, "vulnerabilities": []}"#;
        let page: FeedPage = serde_json::from_str(body).unwrap();
        assert!(page.vulnerabilities.is_empty());
    }
}
