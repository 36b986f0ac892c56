//! Search analytics sink.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::{Collection, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Directory,
    Blog,
    Site,
}

impl QueryType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Blog => "blog",
            Self::Site => "site",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryEvent {
    pub query: String,
    pub query_type: QueryType,
    pub results_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicked_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_location: Option<String>,
}

impl SearchQueryEvent {
    pub fn new(query: impl Into<String>, query_type: QueryType, results_count: u64) -> Self {
        Self {
            query: query.into(),
            query_type,
            results_count,
            clicked_result: None,
            user_location: None,
        }
    }

    fn to_row(&self) -> serde_json::Value {
        json!({
            "query": self.query,
            "query_type": self.query_type.as_str(),
            "results_count": self.results_count,
            "clicked_result": self.clicked_result,
            "user_location": self.user_location,
        })
    }
}

pub struct SearchAnalytics<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SearchAnalytics<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SearchAnalytics<S>
where
    S: RecordStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record the event in the background. Failures are logged and never
    /// reach the caller. Must be called from within a tokio runtime.
    pub fn track(&self, event: SearchQueryEvent) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match store.insert(Collection::SearchQueries, event.to_row()).await {
                Ok(()) => debug!(
                    query_type = event.query_type.as_str(),
                    results = event.results_count,
                    "search query tracked"
                ),
                Err(err) => warn!(error = %err, "failed to track search query"),
            }
        })
    }
}
