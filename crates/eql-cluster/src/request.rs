//! Search requests and their query DSL rendering

use crate::FilterNode;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

/// Explicit sort order sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// One sort key; `order: None` leaves the direction to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub order: Option<SortOrder>,
}

/// A search against one target (index, alias or pattern)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    target: String,
    filter: Option<FilterNode>,
    fields: Vec<String>,
    size: Option<u32>,
    from: Option<u32>,
    sort: Vec<SortKey>,
}

impl SearchRequest {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn filter(&self) -> Option<&FilterNode> {
        self.filter.as_ref()
    }

    /// Projected fields; empty means every field
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn from(&self) -> Option<u32> {
        self.from
    }

    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Render the request body
    ///
    /// The query is always a match-all base combined with the optional
    /// filter, so "no filter" and "match everything" share one shape.
    pub fn to_body(&self) -> Value {
        let mut bool_query = Map::new();
        bool_query.insert("must".into(), json!({ "match_all": {} }));
        if let Some(filter) = &self.filter {
            bool_query.insert("filter".into(), filter.to_query_dsl());
        }

        let mut body = Map::new();
        body.insert("query".into(), json!({ "bool": bool_query }));
        if !self.fields.is_empty() {
            body.insert("_source".into(), json!(self.fields));
        }
        if let Some(size) = self.size {
            body.insert("size".into(), json!(size));
        }
        if let Some(from) = self.from {
            body.insert("from".into(), json!(from));
        }
        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|key| match key.order {
                    Some(order) => {
                        let mut entry = Map::new();
                        entry.insert(key.field.clone(), json!({ "order": order }));
                        Value::Object(entry)
                    }
                    None => json!(key.field),
                })
                .collect();
            body.insert("sort".into(), Value::Array(sort));
        }
        Value::Object(body)
    }
}

/// Builder returned by `ClusterConnection::prepare_search`
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            request: SearchRequest {
                target: target.into(),
                filter: None,
                fields: Vec::new(),
                size: None,
                from: None,
                sort: Vec::new(),
            },
        }
    }

    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.request.filter = Some(filter);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.request.size = Some(size);
        self
    }

    pub fn from(mut self, from: u32) -> Self {
        self.request.from = Some(from);
        self
    }

    /// Append a sort key; earlier keys take precedence
    pub fn sort(mut self, field: impl Into<String>, order: Option<SortOrder>) -> Self {
        self.request.sort.push(SortKey {
            field: field.into(),
            order,
        });
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}
