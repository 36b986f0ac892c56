//! Machine-readable site documents: RSS, sitemap and robots.txt.

pub mod robots;
pub mod rss;
pub mod sitemap;

pub use robots::render_robots;
pub use rss::{render_rss, rss_feed, RSS_CACHE_CONTROL, RSS_CONTENT_TYPE, RSS_ITEM_LIMIT};
pub use sitemap::{render_sitemap, sitemap_entries, static_entries, ChangeFrequency, SitemapEntry};

/// Escape text for XML element and attribute content.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
