//! Search responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub hits: Hits,
}

impl SearchResponse {
    /// Total matching documents as reported by the cluster, or the number
    /// of returned hits when it reports none
    pub fn total(&self) -> u64 {
        self.hits
            .total
            .as_ref()
            .map(TotalHits::value)
            .unwrap_or(self.hits.hits.len() as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total` is a bare number on older clusters and an object on newer ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Relation { value: u64, relation: String },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Relation { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}
