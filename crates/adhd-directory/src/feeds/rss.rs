use chrono::{DateTime, Utc};
use tracing::warn;

use super::xml_escape;
use crate::blog::{BlogSearchParams, BlogService};
use crate::config::SiteConfig;
use crate::content::BlogPost;
use crate::store::RecordStore;

pub const RSS_ITEM_LIMIT: u64 = 20;
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const RSS_CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=3600";

const CHANNEL_DESCRIPTION: &str = "Latest ADHD news, guides, and resources for New South Wales";

/// Newest published posts as an RSS 2.0 document. A failed fetch still yields a
/// valid channel with no items.
pub async fn rss_feed<S>(blog: &BlogService<S>, site: &SiteConfig, now: DateTime<Utc>) -> String
where
    S: RecordStore + ?Sized,
{
    let params = BlogSearchParams {
        limit: RSS_ITEM_LIMIT,
        ..BlogSearchParams::default()
    };
    let posts = match blog.get_blog_posts(&params).await {
        Ok(listing) => listing.data,
        Err(err) => {
            warn!(error = %err, "rss feed falling back to an empty channel");
            Vec::new()
        }
    };
    render_rss(site, &posts, now)
}

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

pub fn render_rss(site: &SiteConfig, posts: &[BlogPost], now: DateTime<Utc>) -> String {
    let blog_url = xml_escape(&site.url("/blog"));
    let feed_url = xml_escape(&site.url("/blog/rss.xml"));

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
    xml.push_str("  <channel>\n");
    xml.push_str(&format!(
        "    <title>{} Blog</title>\n",
        xml_escape(&site.name)
    ));
    xml.push_str(&format!(
        "    <description>{CHANNEL_DESCRIPTION}</description>\n"
    ));
    xml.push_str(&format!("    <link>{blog_url}</link>\n"));
    xml.push_str(&format!(
        "    <atom:link href=\"{feed_url}\" rel=\"self\" type=\"application/rss+xml\" />\n"
    ));
    xml.push_str("    <language>en-AU</language>\n");
    xml.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        now.to_rfc2822()
    ));

    for post in posts.iter().take(RSS_ITEM_LIMIT as usize) {
        let link = xml_escape(&site.url(&post.canonical_path()));
        let description = post
            .excerpt
            .as_deref()
            .or(post.meta_description.as_deref())
            .unwrap_or_default();

        xml.push_str("    <item>\n");
        xml.push_str(&format!("      <title>{}</title>\n", cdata(&post.title)));
        xml.push_str(&format!(
            "      <description>{}</description>\n",
            cdata(description)
        ));
        xml.push_str(&format!("      <link>{link}</link>\n"));
        xml.push_str(&format!(
            "      <guid isPermaLink=\"true\">{link}</guid>\n"
        ));
        if let Some(published) = post.published_at {
            xml.push_str(&format!(
                "      <pubDate>{}</pubDate>\n",
                published.to_rfc2822()
            ));
        }
        for category in &post.categories {
            xml.push_str(&format!(
                "      <category>{}</category>\n",
                xml_escape(&category.name)
            ));
        }
        xml.push_str("    </item>\n");
    }

    xml.push_str("  </channel>\n</rss>\n");
    xml
}
