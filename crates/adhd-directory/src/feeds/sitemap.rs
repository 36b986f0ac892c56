use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use super::xml_escape;
use crate::blog::{BlogSearchParams, BlogService};
use crate::config::SiteConfig;
use crate::directory::{DirectorySearchParams, DirectoryService};
use crate::error::ServiceError;
use crate::store::RecordStore;

/// Upper bound on professionals and posts listed in one sitemap.
pub const SITEMAP_RECORD_LIMIT: u64 = 1000;

pub const LOCATION_FACETS: &[&str] = &[
    "Sydney",
    "Newcastle",
    "Wollongong",
    "Central Coast",
    "Parramatta",
    "Penrith",
];

pub const SERVICE_FACETS: &[&str] = &["psychiatrist", "psychologist", "paediatrician", "adhd-coach"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl SitemapEntry {
    fn new(loc: String, last_modified: DateTime<Utc>, change_frequency: ChangeFrequency, priority: f32) -> Self {
        Self {
            loc,
            last_modified,
            change_frequency,
            priority,
        }
    }
}

pub fn static_entries(site: &SiteConfig, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    [
        ("/", ChangeFrequency::Daily, 1.0),
        ("/directory", ChangeFrequency::Daily, 0.9),
        ("/blog", ChangeFrequency::Daily, 0.8),
        ("/about", ChangeFrequency::Monthly, 0.5),
        ("/contact", ChangeFrequency::Monthly, 0.5),
        ("/privacy", ChangeFrequency::Yearly, 0.3),
        ("/terms", ChangeFrequency::Yearly, 0.3),
        ("/sitemap", ChangeFrequency::Monthly, 0.3),
    ]
    .into_iter()
    .map(|(path, frequency, priority)| SitemapEntry::new(site.url(path), now, frequency, priority))
    .collect()
}

/// Every indexable URL. Any failed fetch degrades to the static pages alone.
pub async fn sitemap_entries<S>(
    directory: &DirectoryService<S>,
    blog: &BlogService<S>,
    site: &SiteConfig,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry>
where
    S: RecordStore + ?Sized,
{
    match dynamic_entries(directory, blog, site, now).await {
        Ok(dynamic) => {
            let mut entries = static_entries(site, now);
            entries.extend(dynamic);
            entries
        }
        Err(err) => {
            warn!(error = %err, "sitemap falling back to static pages");
            static_entries(site, now)
        }
    }
}

async fn dynamic_entries<S>(
    directory: &DirectoryService<S>,
    blog: &BlogService<S>,
    site: &SiteConfig,
    now: DateTime<Utc>,
) -> Result<Vec<SitemapEntry>, ServiceError>
where
    S: RecordStore + ?Sized,
{
    let professional_params = DirectorySearchParams {
        limit: SITEMAP_RECORD_LIMIT,
        ..DirectorySearchParams::default()
    };
    let post_params = BlogSearchParams {
        limit: SITEMAP_RECORD_LIMIT,
        ..BlogSearchParams::default()
    };
    let (professionals, posts, categories) = tokio::join!(
        directory.search_professionals(&professional_params),
        blog.get_blog_posts(&post_params),
        blog.get_categories(),
    );
    let (professionals, posts, categories) = (professionals?, posts?, categories?);

    let mut entries = Vec::new();
    entries.extend(professionals.data.iter().map(|professional| {
        SitemapEntry::new(
            site.url(&professional.canonical_path()),
            now,
            ChangeFrequency::Weekly,
            0.7,
        )
    }));
    entries.extend(LOCATION_FACETS.iter().map(|location| {
        SitemapEntry::new(
            site.url(&format!("/directory?location={}", urlencoding::encode(location))),
            now,
            ChangeFrequency::Weekly,
            0.8,
        )
    }));
    entries.extend(SERVICE_FACETS.iter().map(|service| {
        SitemapEntry::new(
            site.url(&format!("/directory?services={service}")),
            now,
            ChangeFrequency::Weekly,
            0.8,
        )
    }));
    entries.extend(categories.iter().map(|category| {
        SitemapEntry::new(
            site.url(&format!("/blog?category={}", urlencoding::encode(&category.slug))),
            now,
            ChangeFrequency::Weekly,
            0.7,
        )
    }));
    entries.extend(posts.data.iter().map(|post| {
        SitemapEntry::new(
            site.url(&post.canonical_path()),
            post.last_modified().unwrap_or(now),
            if post.is_evergreen {
                ChangeFrequency::Monthly
            } else {
                ChangeFrequency::Yearly
            },
            if post.is_featured { 0.9 } else { 0.6 },
        )
    }));
    Ok(entries)
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}
