use serde_json::Value;

use super::search::WebSearchQuery;
use super::Collection;

/// A single predicate against a row.
///
/// Columns are dotted paths. A segment that lands on an array fans out over its
/// elements, so `professional_services.service_type.slug` matches when any
/// embedded service carries the slug.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    Neq { column: String, value: Value },
    In { column: String, values: Vec<Value> },
    /// Array column holds every listed value.
    ContainsAll { column: String, values: Vec<Value> },
    /// Case-insensitive `LIKE` with `%` and `_` wildcards.
    ILike { column: String, pattern: String },
    TextSearch { column: String, query: WebSearchQuery },
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Neq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn in_list<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains_all<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::ContainsAll {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ilike(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::ILike {
            column: column.into(),
            pattern: pattern.into(),
        }
    }

    pub fn text_search(column: impl Into<String>, query: WebSearchQuery) -> Self {
        Self::TextSearch {
            column: column.into(),
            query,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Column { column: String, ascending: bool },
    /// Full-text rank of the query's text search, best match first.
    Relevance,
}

/// Inclusive row window, `from..=to`, applied after filtering and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub from: u64,
    pub to: u64,
}

impl RowRange {
    pub fn len(&self) -> u64 {
        if self.to < self.from {
            0
        } else {
            self.to - self.from + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Declarative select against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: Collection,
    filters: Vec<Filter>,
    order: Vec<Order>,
    range: Option<RowRange>,
    limit: Option<u64>,
    count_exact: bool,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: Vec::new(),
            range: None,
            limit: None,
            count_exact: false,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Filter::neq(column, value))
    }

    pub fn in_list<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(Filter::in_list(column, values))
    }

    pub fn contains_all<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(Filter::contains_all(column, values))
    }

    pub fn text_search(self, column: impl Into<String>, query: WebSearchQuery) -> Self {
        self.filter(Filter::text_search(column, query))
    }

    pub fn or(self, alternatives: Vec<Filter>) -> Self {
        self.filter(Filter::Or(alternatives))
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(Order::Column {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn order_by_relevance(mut self) -> Self {
        self.order.push(Order::Relevance);
        self
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some(RowRange { from, to });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> &[Order] {
        &self.order
    }

    pub fn row_range(&self) -> Option<RowRange> {
        self.range
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn wants_count(&self) -> bool {
        self.count_exact
    }

    /// First text search in the filter list, used to rank relevance ordering.
    pub fn text_query(&self) -> Option<(&str, &WebSearchQuery)> {
        self.filters.iter().find_map(|filter| match filter {
            Filter::TextSearch { column, query } => Some((column.as_str(), query)),
            _ => None,
        })
    }
}
