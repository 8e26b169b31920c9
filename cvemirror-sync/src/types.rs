// ---------------------------------------------------------------------------
// NVD 2.0 feed shapes
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of the upstream feed response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    #[serde(default)]
    pub vulnerabilities: Vec<FeedItem>,
    #[serde(default)]
    pub total_results: u64,
}

/// A single entry in the `vulnerabilities` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub cve: FeedCve,
}

/// The upstream `cve` object.
///
/// Only the fields the pipeline reads are typed; everything else lands in
/// `extra` so the archival `raw` blob round-trips without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCve {
    pub id: String,
    #[serde(default)]
    pub descriptions: Vec<FeedDescription>,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weaknesses: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A language-tagged description entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDescription {
    pub lang: String,
    pub value: String,
}
