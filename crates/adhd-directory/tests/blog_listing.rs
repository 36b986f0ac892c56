use std::sync::Arc;

use adhd_directory::blog::{BlogSearchParams, BlogService};
use adhd_directory::content::PostStatus;
use adhd_directory::store::{Collection, InMemoryStore};
use serde_json::{json, Value};

fn post(index: u32, category: &str, status: &str) -> Value {
    json!({
        "id": format!("post-{index}"),
        "slug": format!("{category}-{index}"),
        "title": format!("Guide {index}"),
        "excerpt": "What to expect from an ADHD assessment.",
        "content": "Assessment steps for adults and children.",
        "author_name": "ADHD NSW Editorial",
        "status": status,
        "published_at": format!("2024-01-{:02}T09:00:00Z", index),
        "created_at": "2023-12-01T00:00:00Z",
        "updated_at": format!("2024-02-{:02}T09:00:00Z", index),
        "blog_post_categories": [
            { "category": { "id": format!("cat-{category}"), "slug": category, "name": category } }
        ],
        "blog_post_tags": [
            { "tag": { "id": "tag-assessment", "slug": "assessment", "name": "Assessment" } }
        ]
    })
}

fn blog() -> BlogService<InMemoryStore> {
    let mut rows: Vec<Value> = (1..=15)
        .map(|index| post(index, "diagnosis-guides", "published"))
        .collect();
    rows.push(post(16, "diagnosis-guides", "draft"));
    rows.push(post(17, "diagnosis-guides", "archived"));
    rows.push(post(18, "school-support", "published"));

    let store = InMemoryStore::new()
        .with_rows(Collection::BlogPosts, rows)
        .with_rows(
            Collection::BlogCategories,
            vec![
                json!({ "id": "cat-school-support", "slug": "school-support", "name": "School Support", "display_order": 2 }),
                json!({ "id": "cat-diagnosis-guides", "slug": "diagnosis-guides", "name": "Diagnosis Guides", "display_order": 1 }),
            ],
        )
        .with_rows(
            Collection::BlogTags,
            vec![
                json!({ "id": "tag-assessment", "slug": "assessment", "name": "Assessment" }),
                json!({ "id": "tag-medication", "slug": "medication", "name": "Medication" }),
            ],
        );
    BlogService::new(Arc::new(store))
}

#[tokio::test]
async fn second_page_of_a_category_holds_the_remainder() {
    let params = BlogSearchParams {
        categories: vec!["diagnosis-guides".to_string()],
        page: 2,
        limit: 12,
        ..BlogSearchParams::default()
    };
    let listing = blog().get_blog_posts(&params).await.expect("listing");

    assert_eq!(listing.data.len(), 3);
    assert_eq!(listing.pagination.total, 15);
    assert_eq!(listing.pagination.total_pages, 2);
    assert_eq!(listing.pagination.page, 2);

    // newest first, so the second page holds the three oldest posts
    let slugs: Vec<&str> = listing.data.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["diagnosis-guides-3", "diagnosis-guides-2", "diagnosis-guides-1"]
    );
}

#[tokio::test]
async fn drafts_and_archived_posts_are_never_listed() {
    let listing = blog()
        .get_blog_posts(&BlogSearchParams {
            limit: 100,
            ..BlogSearchParams::default()
        })
        .await
        .expect("listing");
    assert_eq!(listing.pagination.total, 16);
    assert!(listing
        .data
        .iter()
        .all(|post| post.status == PostStatus::Published));

    let err = blog()
        .get_blog_post_by_slug("diagnosis-guides-16")
        .await
        .expect_err("draft hidden");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn post_lookup_flattens_taxonomy() {
    let post = blog()
        .get_blog_post_by_slug("school-support-18")
        .await
        .expect("published post");
    assert_eq!(post.categories[0].name, "school-support");
    assert_eq!(post.tags[0].slug, "assessment");
    assert_eq!(post.author_name, "ADHD NSW Editorial");
    assert!(post.last_modified().is_some());
}

#[tokio::test]
async fn tag_and_text_filters_compose() {
    let listing = blog()
        .get_blog_posts(&BlogSearchParams {
            tags: vec!["assessment".to_string()],
            query: Some("\"adhd assessment\"".to_string()),
            categories: vec!["school-support".to_string()],
            ..BlogSearchParams::default()
        })
        .await
        .expect("listing");
    assert_eq!(listing.pagination.total, 1);

    let none = blog()
        .get_blog_posts(&BlogSearchParams {
            tags: vec!["medication".to_string()],
            ..BlogSearchParams::default()
        })
        .await
        .expect("listing");
    assert!(none.data.is_empty());
    assert_eq!(none.pagination.total_pages, 0);
}

#[tokio::test]
async fn taxonomy_lookups() {
    let blog = blog();
    let categories = blog.get_categories().await.expect("categories");
    assert_eq!(categories[0].slug, "diagnosis-guides");

    let category = blog
        .get_category_by_slug("school-support")
        .await
        .expect("category");
    assert_eq!(category.display_order, 2);

    let tags = blog.get_popular_tags(1).await.expect("tags");
    assert_eq!(tags.len(), 1);
}
