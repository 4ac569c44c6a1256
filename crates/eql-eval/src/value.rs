//! Values produced by evaluation rules

use eql_cluster::{FilterNode, SearchRequest, SearchRequestBuilder, SortOrder};
use serde::Serialize;

/// Direction of one sort key as written in the script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
    /// No marker; the backend picks its default order
    #[default]
    Unspecified,
}

impl SortDirection {
    /// Backend order; `None` for the backend default
    pub fn to_order(self) -> Option<SortOrder> {
        match self {
            Self::Ascending => Some(SortOrder::Asc),
            Self::Descending => Some(SortOrder::Desc),
            Self::Unspecified => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortEntry {
    pub field: String,
    pub direction: SortDirection,
}

impl SortEntry {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Sort keys in priority order; the first entry is the primary key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub entries: Vec<SortEntry>,
}

/// `return limit[, offset]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Everything one query statement asks of the cluster
///
/// Built once per statement and executed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    /// Index, alias or pattern to search
    pub target: String,
    /// `None` matches every document
    pub filter: Option<FilterNode>,
    /// Projected fields; empty means all
    pub fields: Vec<String>,
    pub sort: SortSpec,
    pub page: PageSpec,
}

impl QueryRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            filter: None,
            fields: Vec::new(),
            sort: SortSpec::default(),
            page: PageSpec::default(),
        }
    }

    /// Fill a backend request builder from this request
    pub fn apply(&self, mut builder: SearchRequestBuilder) -> SearchRequest {
        if let Some(filter) = &self.filter {
            builder = builder.filter(filter.clone());
        }
        builder = builder.fields(self.fields.iter().cloned());
        if let Some(limit) = self.page.limit {
            builder = builder.size(limit);
        }
        if let Some(offset) = self.page.offset {
            builder = builder.from(offset);
        }
        for entry in &self.sort.entries {
            builder = builder.sort(entry.field.clone(), entry.direction.to_order());
        }
        builder.build()
    }

    /// Backend request for this query, without a connection
    pub fn to_search_request(&self) -> SearchRequest {
        self.apply(SearchRequestBuilder::new(self.target.clone()))
    }
}
