//! Record store abstraction.
//!
//! Services talk to the backing store through [`RecordStore`], issuing
//! declarative [`Query`] values against named [`Collection`]s. Rows come back
//! as loosely typed JSON documents shaped like the hosted store's joined
//! selects; the content transformer validates them into typed entities.

pub mod memory;
pub mod query;
pub mod search;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use memory::{FixtureError, InMemoryStore};
pub use query::{Filter, Order, Query, RowRange};
pub use search::WebSearchQuery;

/// Named record collections exposed by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Professionals,
    Locations,
    ServiceTypes,
    AgeGroups,
    PaymentMethods,
    BlogPosts,
    BlogCategories,
    BlogTags,
    SearchQueries,
}

impl Collection {
    pub const fn all() -> [Self; 9] {
        [
            Self::Professionals,
            Self::Locations,
            Self::ServiceTypes,
            Self::AgeGroups,
            Self::PaymentMethods,
            Self::BlogPosts,
            Self::BlogCategories,
            Self::BlogTags,
            Self::SearchQueries,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Professionals => "professionals",
            Self::Locations => "locations",
            Self::ServiceTypes => "service_types",
            Self::AgeGroups => "age_groups",
            Self::PaymentMethods => "payment_methods",
            Self::BlogPosts => "blog_posts",
            Self::BlogCategories => "blog_categories",
            Self::BlogTags => "blog_tags",
            Self::SearchQueries => "search_queries",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|collection| collection.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows matched by a query plus the exact match count before the range was applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Value>,
    pub exact_count: Option<u64>,
}

/// Read access to the backing store plus the single write used for search analytics.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select(&self, query: &Query) -> Result<QueryResult, StoreError>;
    async fn insert(&self, collection: Collection, row: Value) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn select(&self, query: &Query) -> Result<QueryResult, StoreError> {
        (**self).select(query).await
    }

    async fn insert(&self, collection: Collection, row: Value) -> Result<(), StoreError> {
        (**self).insert(collection, row).await
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store is not configured")]
    NotConfigured,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid query against {collection}: {reason}")]
    InvalidQuery {
        collection: Collection,
        reason: String,
    },
}

/// Stand-in used when no data source is configured: every call fails, so pages
/// fall back to their empty states instead of the process refusing to start.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredStore;

#[async_trait]
impl RecordStore for UnconfiguredStore {
    async fn select(&self, _query: &Query) -> Result<QueryResult, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn insert(&self, _collection: Collection, _row: Value) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for collection in Collection::all() {
            assert_eq!(Collection::from_name(collection.as_str()), Some(collection));
        }
        assert_eq!(Collection::from_name("professional_services"), None);
    }

    #[tokio::test]
    async fn unconfigured_store_rejects_every_call() {
        let store = UnconfiguredStore;
        let query = Query::new(Collection::BlogPosts);
        assert!(matches!(
            store.select(&query).await,
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(
            store
                .insert(Collection::SearchQueries, serde_json::json!({}))
                .await,
            Err(StoreError::NotConfigured)
        ));
    }
}
