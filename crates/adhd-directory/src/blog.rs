//! Blog listing, lookups and taxonomy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::{select_entities, BlogCategory, BlogPost, BlogTag, PostStatus};
use crate::error::ServiceError;
use crate::pagination::{PageRequest, PaginatedResponse, CONTENT_PAGE_SIZE};
use crate::store::{Collection, Query, RecordStore, WebSearchQuery};

pub const RELATED_LIMIT: u64 = 3;
pub const FEATURED_LIMIT: u64 = 5;
pub const POPULAR_TAG_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogSearchParams {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// `None` leaves featured and regular posts mixed.
    pub featured: Option<bool>,
    pub page: u64,
    pub limit: u64,
}

impl Default for BlogSearchParams {
    fn default() -> Self {
        Self {
            query: None,
            categories: Vec::new(),
            tags: Vec::new(),
            featured: None,
            page: 1,
            limit: CONTENT_PAGE_SIZE,
        }
    }
}

impl BlogSearchParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn search_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

fn published_posts() -> Query {
    Query::new(Collection::BlogPosts).eq("status", PostStatus::Published.as_str())
}

/// Compose the published-post listing against the store, newest first.
pub fn blog_post_query(params: &BlogSearchParams) -> Query {
    let mut query = published_posts().count_exact();

    if let Some(featured) = params.featured {
        query = query.eq("is_featured", featured);
    }
    if !params.categories.is_empty() {
        query = query.in_list(
            "blog_post_categories.category.slug",
            params.categories.iter().cloned(),
        );
    }
    if !params.tags.is_empty() {
        query = query.in_list("blog_post_tags.tag.slug", params.tags.iter().cloned());
    }
    if let Some(search) = params
        .search_text()
        .map(WebSearchQuery::parse)
        .filter(|search| !search.is_empty())
    {
        query = query.text_search("search_vector", search);
    }

    query = query.order("published_at", false);
    match params.page_request().range() {
        Some((from, to)) => query.range(from, to),
        None => query.limit(0),
    }
}

pub struct BlogService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for BlogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> BlogService<S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn get_blog_posts(
        &self,
        params: &BlogSearchParams,
    ) -> Result<PaginatedResponse<BlogPost>, ServiceError> {
        let query = blog_post_query(params);
        let (data, count) = select_entities::<BlogPost, _>(self.store.as_ref(), &query)
            .await
            .inspect_err(|err| warn!(error = %err, "blog listing failed"))?;
        let total = count.unwrap_or(data.len() as u64);
        debug!(total, page = params.page, "blog listing complete");

        Ok(PaginatedResponse {
            data,
            pagination: params.page_request().paginate(total),
        })
    }

    pub async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, ServiceError> {
        let query = published_posts().eq("slug", slug).limit(1);
        let (posts, _) = select_entities::<BlogPost, _>(self.store.as_ref(), &query).await?;
        posts
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("blog post", slug))
    }

    /// Published posts sharing a category with `post_id`, excluding the post itself.
    pub async fn get_related_posts(
        &self,
        post_id: &str,
        category_ids: &[String],
        limit: u64,
    ) -> Result<Vec<BlogPost>, ServiceError> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = published_posts()
            .neq("id", post_id)
            .in_list("blog_post_categories.category.id", category_ids.iter().cloned())
            .order("published_at", false)
            .limit(limit);
        let (posts, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(posts)
    }

    pub async fn get_featured_posts(&self, limit: u64) -> Result<Vec<BlogPost>, ServiceError> {
        let query = published_posts()
            .eq("is_featured", true)
            .order("published_at", false)
            .limit(limit);
        let (posts, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(posts)
    }

    pub async fn get_categories(&self) -> Result<Vec<BlogCategory>, ServiceError> {
        let query = Query::new(Collection::BlogCategories).order("display_order", true);
        let (categories, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(categories)
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<BlogCategory, ServiceError> {
        let query = Query::new(Collection::BlogCategories)
            .eq("slug", slug)
            .limit(1);
        let (categories, _) =
            select_entities::<BlogCategory, _>(self.store.as_ref(), &query).await?;
        categories
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("blog category", slug))
    }

    /// Tags in store order; usage counts are not tracked.
    pub async fn get_popular_tags(&self, limit: u64) -> Result<Vec<BlogTag>, ServiceError> {
        let query = Query::new(Collection::BlogTags).limit(limit);
        let (tags, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Filter, InMemoryStore, Order, RowRange};
    use serde_json::json;

    #[test]
    fn listing_is_published_only_and_newest_first() {
        let query = blog_post_query(&BlogSearchParams::default());
        assert_eq!(query.filters(), &[Filter::eq("status", "published")]);
        assert_eq!(
            query.ordering(),
            &[Order::Column {
                column: "published_at".to_string(),
                ascending: false
            }]
        );
        assert_eq!(query.row_range(), Some(RowRange { from: 0, to: 11 }));
    }

    #[test]
    fn featured_is_tri_state() {
        let unset = blog_post_query(&BlogSearchParams::default());
        assert!(!unset
            .filters()
            .iter()
            .any(|filter| matches!(filter, Filter::Eq { column, .. } if column == "is_featured")));

        let regular_only = blog_post_query(&BlogSearchParams {
            featured: Some(false),
            ..BlogSearchParams::default()
        });
        assert!(regular_only
            .filters()
            .contains(&Filter::eq("is_featured", false)));
    }

    #[test]
    fn taxonomy_filters_use_joined_slugs() {
        let query = blog_post_query(&BlogSearchParams {
            categories: vec!["diagnosis-guides".to_string()],
            tags: vec!["medication".to_string()],
            query: Some("\"adult adhd\" -children".to_string()),
            ..BlogSearchParams::default()
        });
        assert!(query.filters().contains(&Filter::in_list(
            "blog_post_categories.category.slug",
            ["diagnosis-guides"]
        )));
        assert!(query
            .filters()
            .contains(&Filter::in_list("blog_post_tags.tag.slug", ["medication"])));
        assert!(query.text_query().is_some());
    }

    fn post(id: &str, category: &str, published_at: &str, featured: bool) -> serde_json::Value {
        json!({
            "id": id,
            "slug": format!("post-{id}"),
            "title": format!("Post {id}"),
            "status": "published",
            "published_at": published_at,
            "is_featured": featured,
            "blog_post_categories": [
                { "category": { "id": category, "slug": category, "name": category } }
            ]
        })
    }

    fn service() -> BlogService<InMemoryStore> {
        let store = InMemoryStore::new().with_rows(
            Collection::BlogPosts,
            vec![
                post("1", "cat-a", "2024-01-01T00:00:00Z", false),
                post("2", "cat-a", "2024-03-01T00:00:00Z", true),
                post("3", "cat-b", "2024-02-01T00:00:00Z", true),
                post("4", "cat-a", "2024-04-01T00:00:00Z", false),
            ],
        );
        BlogService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn related_posts_share_a_category_and_exclude_the_source() {
        let related = service()
            .get_related_posts("4", &["cat-a".to_string()], RELATED_LIMIT)
            .await
            .expect("related posts");
        let ids: Vec<&str> = related.iter().map(|post| post.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);

        let none = service()
            .get_related_posts("4", &[], RELATED_LIMIT)
            .await
            .expect("no categories");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn featured_posts_are_newest_first_and_limited() {
        let featured = service().get_featured_posts(1).await.expect("featured");
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, "2");
    }

    #[tokio::test]
    async fn unknown_category_slug_is_not_found() {
        let err = service()
            .get_category_by_slug("missing")
            .await
            .expect_err("no categories seeded");
        assert!(err.is_not_found());
    }
}
