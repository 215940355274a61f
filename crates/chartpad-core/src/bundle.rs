//! Searchset bundle wire types for responses from the clinical-data server.
//!
//! Only the parts the gateway consumes are modeled: entries, the total, and
//! the paging links. Resources stay as raw JSON values because the gateway
//! re-shapes rather than interprets them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bundle {
    #[serde(rename = "resourceType", default)]
    pub resource_type: String,
    #[serde(rename = "type", default)]
    pub bundle_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub link: Vec<BundleLink>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleEntry {
    #[serde(rename = "fullUrl", skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl Bundle {
    /// URL of the `next` paging link, if the server advertised one.
    pub fn next_link(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == "next")
            .map(|l| l.url.as_str())
    }

    /// The entry resources, skipping entries without one.
    pub fn resources(&self) -> Vec<Value> {
        self.entry
            .iter()
            .filter_map(|e| e.resource.clone())
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.total.unwrap_or(0)
    }
}
