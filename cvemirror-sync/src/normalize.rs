// ---------------------------------------------------------------------------
// Feed item normalization
// ---------------------------------------------------------------------------

use cvemirror_db::CveRecord;
use serde_json::Value;

use crate::types::FeedCve;

/// Map one upstream `cve` object into the stored record shape.
///
/// Total and side-effect free: missing upstream fields become empty
/// defaults, never errors.
pub fn normalize(cve: &FeedCve) -> CveRecord {
    let description = cve
        .descriptions
        .iter()
        .find(|d| d.lang == "en")
        .map(|d| d.value.clone())
        .unwrap_or_default();

    // TODO: populate cvss_score/cvss_vector/severity/vuln_status from
    // metrics.cvssMetricV31 (baseScore, vectorString, baseSeverity) and the
    // top-level vulnStatus; until then the raw blob keeps the data.
    CveRecord {
        cve_id: cve.id.clone(),
        description,
        published: cve.published.clone(),
        last_modified: cve.last_modified.clone(),
        cvss_score: 0.0,
        cvss_vector: String::new(),
        severity: String::new(),
        vuln_status: String::new(),
        references: cve.references.clone(),
        weaknesses: cve.weaknesses.clone(),
        configurations: cve.configurations.clone(),
        raw: serde_json::to_value(cve).unwrap_or(Value::Null),
    }
}
