//! Aggregate statistics about the document library.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of `GET /document-stats/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    #[serde(default)]
    pub total_documents: u64,
    /// Count per document type wire value.
    #[serde(default)]
    pub documents_by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub recent_documents: Vec<RecentDocument>,
}

/// Short form of a recently uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentDocument {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
}
