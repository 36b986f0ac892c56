use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::query::{Filter, Order, Query};
use super::{Collection, QueryResult, RecordStore, StoreError};

/// Store backed by JSON documents held in memory.
///
/// Documents are stored the way the hosted store returns joined selects:
/// professionals carry their `locations`, `professional_services`,
/// `professional_age_groups` and `professional_payment_methods`; posts carry
/// `blog_post_categories` and `blog_post_tags`. A `search_vector` is derived
/// for professionals and posts when the fixture does not provide one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<Collection, Vec<Value>>>,
}

/// Error raised while loading a seed fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("unable to read fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("fixture is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fixture root must be an object keyed by collection name")]
    NotAnObject,
    #[error("unknown collection '{0}' in fixture")]
    UnknownCollection(String),
    #[error("collection '{0}' must be an array of objects")]
    NotAnArray(String),
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection, replacing any rows it already held.
    pub fn with_rows(self, collection: Collection, rows: Vec<Value>) -> Self {
        if let Ok(mut guard) = self.collections.write() {
            let rows = rows
                .into_iter()
                .map(|row| with_search_vector(collection, row))
                .collect();
            guard.insert(collection, rows);
        }
        self
    }

    pub fn from_fixture_json(raw: &str) -> Result<Self, FixtureError> {
        let root: Value = serde_json::from_str(raw)?;
        let Value::Object(entries) = root else {
            return Err(FixtureError::NotAnObject);
        };

        let mut store = Self::new();
        for (name, rows) in entries {
            let collection = Collection::from_name(&name)
                .ok_or_else(|| FixtureError::UnknownCollection(name.clone()))?;
            let Value::Array(rows) = rows else {
                return Err(FixtureError::NotAnArray(name));
            };
            if rows.iter().any(|row| !row.is_object()) {
                return Err(FixtureError::NotAnArray(name));
            }
            store = store.with_rows(collection, rows);
        }
        Ok(store)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_fixture_json(&raw)
    }

    /// Rows currently stored in a collection, in insertion order.
    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        self.collections
            .read()
            .map(|guard| guard.get(&collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn run(&self, query: &Query) -> Result<QueryResult, StoreError> {
        let guard = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))?;

        let rows = guard
            .get(&query.collection())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut matched: Vec<(u32, &Value)> = rows
            .iter()
            .filter(|row| query.filters().iter().all(|filter| filter_holds(filter, row)))
            .map(|row| (relevance(query, row), row))
            .collect();

        if query.ordering().contains(&Order::Relevance) && query.text_query().is_none() {
            return Err(StoreError::InvalidQuery {
                collection: query.collection(),
                reason: "relevance ordering requires a text search".to_string(),
            });
        }

        matched.sort_by(|(left_rank, left), (right_rank, right)| {
            for order in query.ordering() {
                let ordering = match order {
                    Order::Relevance => right_rank.cmp(left_rank),
                    Order::Column { column, ascending } => {
                        compare_column(left, right, column, *ascending)
                    }
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let exact_count = query.wants_count().then_some(matched.len() as u64);

        let (skip, take) = match query.row_range() {
            Some(range) => (range.from, range.len()),
            None => (0, u64::MAX),
        };
        let take = query.row_limit().map_or(take, |limit| take.min(limit));

        let rows = matched
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .map(|(_, row)| row.clone())
            .collect();

        Ok(QueryResult { rows, exact_count })
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn select(&self, query: &Query) -> Result<QueryResult, StoreError> {
        self.run(query)
    }

    async fn insert(&self, collection: Collection, row: Value) -> Result<(), StoreError> {
        if !row.is_object() {
            return Err(StoreError::InvalidQuery {
                collection,
                reason: "inserted rows must be objects".to_string(),
            });
        }
        let mut guard = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))?;
        guard
            .entry(collection)
            .or_default()
            .push(with_search_vector(collection, row));
        Ok(())
    }
}

fn relevance(query: &Query, row: &Value) -> u32 {
    match query.text_query() {
        Some((column, search)) => search.rank(&text_of(row, column)),
        None => 0,
    }
}

/// Values reached by walking a dotted path, fanning out through arrays.
fn resolve<'a>(row: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![row];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get(segment) {
                        next.push(child);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(child) = item.get(segment) {
                            next.push(child);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }
    current
}

fn filter_holds(filter: &Filter, row: &Value) -> bool {
    match filter {
        Filter::Eq { column, value } => resolve(row, column)
            .into_iter()
            .any(|found| values_equal(found, value)),
        Filter::Neq { column, value } => !resolve(row, column)
            .into_iter()
            .any(|found| values_equal(found, value)),
        Filter::In { column, values } => resolve(row, column)
            .into_iter()
            .any(|found| values.iter().any(|value| values_equal(found, value))),
        Filter::ContainsAll { column, values } => {
            resolve(row, column).into_iter().any(|found| match found {
                Value::Array(items) => values
                    .iter()
                    .all(|value| items.iter().any(|item| values_equal(item, value))),
                _ => false,
            })
        }
        Filter::ILike { column, pattern } => {
            let pattern = pattern.to_lowercase();
            resolve(row, column).into_iter().any(|found| match found {
                Value::String(text) => like_matches(&pattern, &text.to_lowercase()),
                _ => false,
            })
        }
        Filter::TextSearch { column, query } => query.matches(&text_of(row, column)),
        Filter::Or(alternatives) => alternatives
            .iter()
            .any(|alternative| filter_holds(alternative, row)),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(a), Value::Number(b)) | (Value::Number(b), Value::String(a)) => {
            a.parse::<f64>().ok() == b.as_f64()
        }
        _ => left == right,
    }
}

fn text_of(row: &Value, column: &str) -> String {
    let mut parts = Vec::new();
    for value in resolve(row, column) {
        collect_text(value, &mut parts);
    }
    parts.join(" ")
}

fn collect_text(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::String(text) => parts.push(text.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_text(item, parts)),
        Value::Number(number) => parts.push(number.to_string()),
        _ => {}
    }
}

/// SQL `LIKE` over already-lowercased inputs.
fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    // dp[j]: pattern[..i] matches text[..j]
    let mut dp = vec![false; text.len() + 1];
    dp[0] = true;
    for &symbol in &pattern {
        let mut next = vec![false; text.len() + 1];
        if symbol == '%' {
            let mut reachable = false;
            for j in 0..=text.len() {
                reachable |= dp[j];
                next[j] = reachable;
            }
        } else {
            for j in 1..=text.len() {
                next[j] = dp[j - 1] && (symbol == '_' || symbol == text[j - 1]);
            }
        }
        dp = next;
    }
    dp[text.len()]
}

fn compare_column(left: &Value, right: &Value, column: &str, ascending: bool) -> Ordering {
    let left = resolve(left, column).into_iter().find(|value| !value.is_null());
    let right = resolve(right, column).into_iter().find(|value| !value.is_null());
    match (left, right) {
        (None, None) => Ordering::Equal,
        // nulls last in both directions
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            let ordering = compare_values(left, right);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn search_sources(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Professionals => &[
            "title",
            "first_name",
            "last_name",
            "credentials",
            "bio",
            "approach",
            "specializations",
            "languages",
            "professional_services.service_type.name",
            "locations.suburb",
        ],
        Collection::BlogPosts => &[
            "title",
            "excerpt",
            "content",
            "blog_post_categories.category.name",
            "blog_post_tags.tag.name",
        ],
        _ => &[],
    }
}

fn with_search_vector(collection: Collection, row: Value) -> Value {
    let sources = search_sources(collection);
    let mut map = match row {
        Value::Object(map) => map,
        other => return other,
    };
    if sources.is_empty() || map.contains_key("search_vector") {
        return Value::Object(map);
    }

    let snapshot = Value::Object(map.clone());
    let text = sources
        .iter()
        .map(|column| text_of(&snapshot, column))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    map.insert("search_vector".to_string(), Value::String(text));
    Value::Object(map)
}
