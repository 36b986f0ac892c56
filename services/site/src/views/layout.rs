use adhd_directory::config::SiteConfig;
use adhd_directory::seo::SeoMetadata;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde_json::Value;

const NAV: &[(&str, &str)] = &[
    ("/directory", "Find a Professional"),
    ("/blog", "Blog"),
    ("/about", "About"),
    ("/contact", "Contact"),
];

/// JSON-LD is emitted raw inside `<script>`, so a `</` in any string value must
/// not close the element early.
pub(crate) fn json_ld(schema: &Value) -> String {
    schema.to_string().replace("</", "<\\/")
}

fn head(seo: &SeoMetadata, site: &SiteConfig) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (seo.title) }
            meta name="description" content=(seo.description);
            link rel="canonical" href=(seo.canonical);
            link rel="alternate" type="application/rss+xml" title={ (site.name) " Blog" } href="/blog/rss.xml";

            meta property="og:title" content=(seo.open_graph.title);
            meta property="og:description" content=(seo.open_graph.description);
            meta property="og:type" content=(seo.open_graph.kind);
            meta property="og:url" content=(seo.open_graph.url);
            meta property="og:image" content=(seo.open_graph.image);
            meta property="og:site_name" content=(seo.open_graph.site_name);
            meta property="og:locale" content="en_AU";

            meta name="twitter:card" content=(seo.twitter.card);
            meta name="twitter:title" content=(seo.twitter.title);
            meta name="twitter:description" content=(seo.twitter.description);
            meta name="twitter:site" content=(seo.twitter.site);
            @if let Some(image) = &seo.twitter.image {
                meta name="twitter:image" content=(image);
            }

            @for schema in &seo.json_ld {
                script type="application/ld+json" { (PreEscaped(json_ld(schema))) }
            }
            link rel="stylesheet" href="/static/site.css";
        }
    }
}

fn site_header(site: &SiteConfig, current_path: &str) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (site.name) }
            nav.site-nav aria-label="Main" {
                ul {
                    @for (path, label) in NAV {
                        @let is_current = current_path == *path
                            || current_path.starts_with(&format!("{path}/"));
                        li class=[is_current.then_some("current")] {
                            a href=(path) { (label) }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(site: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p {
                "Information in this directory is general in nature and is not a substitute for advice from your GP or specialist."
            }
            nav aria-label="Footer" {
                a href="/privacy" { "Privacy Policy" }
                " · "
                a href="/terms" { "Terms of Use" }
                " · "
                a href="/sitemap" { "Sitemap" }
                " · "
                a href="/blog/rss.xml" { "RSS" }
            }
            p.copyright { "© " (site.name) }
        }
    }
}

/// Full HTML document around `content`, with every metadata tag the page carries.
pub(crate) fn document(
    seo: &SeoMetadata,
    site: &SiteConfig,
    current_path: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en-AU" {
            (head(seo, site))
            body {
                (site_header(site, current_path))
                main { (content) }
                (site_footer(site))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adhd_directory::seo::SeoService;

    #[test]
    fn document_carries_social_and_structured_metadata() {
        let seo = SeoService::new(SiteConfig::default());
        let meta = seo.home_meta();
        let doc = document(&meta, seo.site(), "/", html! { p { "hello" } }).into_string();

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<link rel=\"canonical\" href=\"https://adhdnsw.org\">"));
        assert!(doc.contains("property=\"og:type\" content=\"website\""));
        assert!(doc.contains("<script type=\"application/ld+json\">{"));
        assert!(doc.contains("MedicalOrganization"));
    }

    #[test]
    fn json_ld_cannot_close_its_script_tag() {
        let schema = serde_json::json!({ "name": "</script><script>alert(1)" });
        assert!(!json_ld(&schema).contains("</script>"));
    }

    #[test]
    fn nav_marks_the_current_section() {
        let header = site_header(&SiteConfig::default(), "/blog/some-post").into_string();
        assert!(header.contains("<li class=\"current\"><a href=\"/blog\">"));
    }

    #[test]
    fn footer_links_the_html_sitemap() {
        let footer = site_footer(&SiteConfig::default()).into_string();
        assert!(footer.contains("<a href=\"/sitemap\">Sitemap</a>"));
    }
}
