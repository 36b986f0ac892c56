use std::sync::Arc;

use adhd_directory::blog::BlogService;
use adhd_directory::config::SiteConfig;
use adhd_directory::directory::DirectoryService;
use adhd_directory::feeds::{render_robots, render_sitemap, rss_feed, sitemap_entries, static_entries};
use adhd_directory::store::{Collection, InMemoryStore, UnconfiguredStore};
use chrono::{TimeZone, Utc};
use serde_json::json;

const SEED: &str = include_str!("../../../services/site/fixtures/seed.json");

fn seeded() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::from_fixture_json(SEED).expect("seed fixture parses"))
}

#[tokio::test]
async fn seeded_sitemap_lists_every_indexable_url() {
    let store = seeded();
    let site = SiteConfig::default();
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let entries = sitemap_entries(
        &DirectoryService::new(Arc::clone(&store)),
        &BlogService::new(Arc::clone(&store)),
        &site,
        now,
    )
    .await;

    let locs: Vec<&str> = entries.iter().map(|entry| entry.loc.as_str()).collect();
    assert!(locs.contains(&"https://adhdnsw.org/professionals/dr-amelia-nguyen"));
    assert!(!locs.contains(&"https://adhdnsw.org/professionals/jordan-lee"));
    assert!(locs.contains(&"https://adhdnsw.org/blog/getting-an-adult-adhd-assessment-in-nsw"));
    assert!(!locs.contains(&"https://adhdnsw.org/blog/workplace-adjustments-draft"));
    assert!(locs.contains(&"https://adhdnsw.org/blog?category=school-support"));
    assert_eq!(locs.iter().filter(|loc| **loc == "https://adhdnsw.org/blog").count(), 1);

    let featured = entries
        .iter()
        .find(|entry| entry.loc.ends_with("/blog/getting-an-adult-adhd-assessment-in-nsw"))
        .expect("featured post listed");
    assert!((featured.priority - 0.9).abs() < f32::EPSILON);
    assert_eq!(
        featured.last_modified,
        Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap()
    );

    let xml = render_sitemap(&entries);
    assert!(xml.contains("<loc>https://adhdnsw.org/directory?location=Central%20Coast</loc>"));
}

#[tokio::test]
async fn sitemap_without_a_store_keeps_the_static_pages() {
    let store = Arc::new(UnconfiguredStore);
    let site = SiteConfig::default();
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let entries = sitemap_entries(
        &DirectoryService::new(Arc::clone(&store)),
        &BlogService::new(Arc::clone(&store)),
        &site,
        now,
    )
    .await;
    assert_eq!(entries, static_entries(&site, now));
}

#[tokio::test]
async fn rss_caps_items_and_skips_unpublished_posts() {
    let posts = (1..=25)
        .map(|index| {
            json!({
                "id": index,
                "slug": format!("post-{index}"),
                "title": format!("Post {index}"),
                "status": if index == 25 { "draft" } else { "published" },
                "published_at": format!("2024-03-{:02}T00:00:00Z", index),
            })
        })
        .collect();
    let store = Arc::new(InMemoryStore::new().with_rows(Collection::BlogPosts, posts));
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

    let xml = rss_feed(&BlogService::new(store), &SiteConfig::default(), now).await;
    assert_eq!(xml.matches("<item>").count(), 20);
    assert!(xml.contains("/blog/post-24</link>"));
    assert!(!xml.contains("/blog/post-25</link>"));
    assert!(!xml.contains("/blog/post-4</link>"));
}

#[tokio::test]
async fn rss_without_a_store_is_an_empty_channel() {
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let xml = rss_feed(
        &BlogService::new(Arc::new(UnconfiguredStore)),
        &SiteConfig::default(),
        now,
    )
    .await;
    assert!(xml.contains("<channel>"));
    assert!(xml.contains("</channel>"));
    assert!(!xml.contains("<item>"));
}

#[test]
fn robots_points_at_the_sitemap() {
    let robots = render_robots(&SiteConfig::default());
    assert!(robots.ends_with("Sitemap: https://adhdnsw.org/sitemap.xml\n"));
}
