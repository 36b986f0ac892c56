//! Page metadata: titles, descriptions, canonical URLs, social cards and
//! JSON-LD structured data.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::SiteConfig;
use crate::content::{BlogCategory, BlogPost, Professional};

pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

const BIO_SNIPPET_CHARS: usize = 120;
const PROFESSIONAL_IMAGE: &str = "/images/og-professional-default.jpg";
const BLOG_IMAGE: &str = "/images/og-blog-default.jpg";
const DEFAULT_IMAGE: &str = "/images/og-default.jpg";
const LOGO: &str = "/images/logo.png";
const ORGANIZATION_DESCRIPTION: &str =
    "Trusted directory of ADHD professionals and resources for New South Wales";

static MARKUP_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"#{1,6}\s", ""),
        (r"\[([^\]]+)\]\([^)]+\)", "$1"),
        (r"<[^>]+>", ""),
        (r"\n+", " "),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| {
        Regex::new(pattern).ok().map(|regex| (regex, replacement))
    })
    .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
    pub image: String,
    pub site_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub json_ld: Vec<Value>,
}

/// Directory facets that shape the listing's title and canonical URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryFacets<'a> {
    pub location: Option<&'a str>,
    /// `(slug, display name)` of the first selected service.
    pub service: Option<(&'a str, &'a str)>,
    pub page: u64,
}

/// `first max-3 chars + "..."` when longer than `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

pub fn truncate_title(title: &str) -> String {
    truncate(title, TITLE_MAX_CHARS)
}

pub fn truncate_description(description: &str) -> String {
    truncate(description, DESCRIPTION_MAX_CHARS)
}

/// Plain-text excerpt of markdown or HTML content.
pub fn excerpt(content: &str) -> String {
    let plain = MARKUP_RULES
        .iter()
        .fold(content.to_string(), |text, (regex, replacement)| {
            regex.replace_all(&text, *replacement).into_owned()
        });
    truncate_description(plain.trim())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct SeoService {
    site: SiteConfig,
}

impl SeoService {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    fn metadata(
        &self,
        title: &str,
        description: &str,
        canonical: String,
        og_kind: &'static str,
        image: &str,
        twitter_card: &'static str,
        json_ld: Vec<Value>,
    ) -> SeoMetadata {
        let title = truncate_title(title);
        let description = truncate_description(description);
        let image = self.site.url(image);
        SeoMetadata {
            open_graph: OpenGraph {
                title: title.clone(),
                description: description.clone(),
                kind: og_kind,
                url: canonical.clone(),
                image: image.clone(),
                site_name: self.site.name.clone(),
            },
            twitter: TwitterCard {
                card: twitter_card,
                title: title.clone(),
                description: description.clone(),
                image: (twitter_card == "summary_large_image").then_some(image),
                site: self.site.twitter_handle.clone(),
            },
            title,
            description,
            canonical,
            json_ld,
        }
    }

    pub fn professional_meta(&self, professional: &Professional) -> SeoMetadata {
        let full_name = professional.full_name();
        let location_text = match professional.primary_location() {
            Some(location) if !location.suburb.trim().is_empty() => {
                format!(" in {}, NSW", location.suburb.trim())
            }
            _ => " in NSW".to_string(),
        };

        let title = match non_blank(professional.meta_title.as_deref()) {
            Some(title) => title.to_string(),
            None => {
                let speciality = professional
                    .services
                    .first()
                    .map_or("Specialist", |service| service.name.as_str());
                format!("{full_name} - ADHD {speciality}{location_text}")
            }
        };

        let description = match non_blank(professional.meta_description.as_deref()) {
            Some(description) => description.to_string(),
            None => {
                let credentials = if professional.credentials.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", professional.credentials.join(", "))
                };
                let services = if professional.services.is_empty() {
                    "ADHD Services".to_string()
                } else {
                    professional
                        .services
                        .iter()
                        .map(|service| service.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let bio = non_blank(professional.bio.as_deref())
                    .map(|bio| bio.chars().take(BIO_SNIPPET_CHARS).collect::<String>())
                    .unwrap_or_else(|| "Experienced ADHD professional".to_string());
                format!(
                    "{full_name}{credentials} - {services}{location_text}. {bio}... Book online or view contact details."
                )
            }
        };

        let canonical = self.site.url(&professional.canonical_path());
        let json_ld = vec![
            self.professional_schema(professional),
            self.breadcrumb_schema(&[
                ("Home", "/"),
                ("Directory", "/directory"),
                (full_name.as_str(), professional.canonical_path().as_str()),
            ]),
        ];

        self.metadata(
            &title,
            &description,
            canonical,
            "profile",
            PROFESSIONAL_IMAGE,
            "summary",
            json_ld,
        )
    }

    pub fn blog_post_meta(&self, post: &BlogPost) -> SeoMetadata {
        let title = non_blank(post.meta_title.as_deref()).unwrap_or(&post.title);
        let description = non_blank(post.meta_description.as_deref())
            .or_else(|| non_blank(post.excerpt.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| excerpt(&post.content));
        let canonical = non_blank(post.canonical_url.as_deref())
            .map(|url| self.site.url(url))
            .unwrap_or_else(|| self.site.url(&post.canonical_path()));
        let image = non_blank(post.featured_image.as_deref()).unwrap_or(BLOG_IMAGE);

        let json_ld = vec![
            self.article_schema(post),
            self.breadcrumb_schema(&[
                ("Home", "/"),
                ("Blog", "/blog"),
                (post.title.as_str(), post.canonical_path().as_str()),
            ]),
        ];

        self.metadata(
            title,
            &description,
            canonical,
            "article",
            image,
            "summary_large_image",
            json_ld,
        )
    }

    pub fn directory_meta(&self, facets: DirectoryFacets<'_>) -> SeoMetadata {
        let location = non_blank(facets.location);
        let service = facets.service.map(|(_, name)| name);

        let (mut title, description) = match (service, location) {
            (Some(service), Some(location)) => (
                format!("ADHD {service} in {location}, NSW"),
                format!(
                    "Find verified ADHD {} in {location}, NSW. View profiles, specialties, and book appointments.",
                    service.to_lowercase()
                ),
            ),
            (Some(service), None) => (
                format!("ADHD {service} in NSW - Directory"),
                format!(
                    "Find qualified ADHD {} across New South Wales. Compare specialists and book appointments online.",
                    service.to_lowercase()
                ),
            ),
            (None, Some(location)) => (
                format!("ADHD Specialists in {location}, NSW"),
                format!(
                    "Find ADHD psychiatrists, psychologists, and coaches in {location}, NSW. Verified professionals accepting new patients."
                ),
            ),
            (None, None) => (
                "ADHD Professionals Directory NSW".to_string(),
                "Find verified ADHD specialists in New South Wales. Search psychiatrists, psychologists, coaches, and more.".to_string(),
            ),
        };
        if facets.page > 1 {
            title.push_str(&format!(" - Page {}", facets.page));
        }

        let mut params = Vec::new();
        if let Some(location) = location {
            params.push(format!("location={}", urlencoding::encode(location)));
        }
        if let Some((slug, _)) = facets.service {
            params.push(format!("services={}", urlencoding::encode(slug)));
        }
        if facets.page > 1 {
            params.push(format!("page={}", facets.page));
        }
        let path = if params.is_empty() {
            "/directory".to_string()
        } else {
            format!("/directory?{}", params.join("&"))
        };

        self.metadata(
            &title,
            &description,
            self.site.url(&path),
            "website",
            DEFAULT_IMAGE,
            "summary",
            Vec::new(),
        )
    }

    /// Blog listing metadata. `category_slug` is the requested facet and
    /// `category` its resolved record, when one exists.
    pub fn blog_index_meta(
        &self,
        category_slug: Option<&str>,
        category: Option<&BlogCategory>,
        page: u64,
    ) -> SeoMetadata {
        let (mut title, description) = match category {
            Some(category) => (
                format!("{} - {} Blog", category.name, self.site.name),
                non_blank(category.description.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!(
                            "Latest {} articles and resources for the ADHD community in NSW.",
                            category.name
                        )
                    }),
            ),
            None => (
                "ADHD Blog & Resources - NSW Updates, Guides & News".to_string(),
                "Expert ADHD content for NSW: diagnosis guides, treatment options, school support, workplace strategies, and local news.".to_string(),
            ),
        };
        if page > 1 {
            title.push_str(&format!(" - Page {page}"));
        }

        let mut params = Vec::new();
        if let Some(slug) = non_blank(category_slug) {
            params.push(format!("category={}", urlencoding::encode(slug)));
        }
        if page > 1 {
            params.push(format!("page={page}"));
        }
        let path = if params.is_empty() {
            "/blog".to_string()
        } else {
            format!("/blog?{}", params.join("&"))
        };

        self.metadata(
            &title,
            &description,
            self.site.url(&path),
            "website",
            BLOG_IMAGE,
            "summary",
            Vec::new(),
        )
    }

    pub fn home_meta(&self) -> SeoMetadata {
        self.metadata(
            &format!("{} - Find ADHD Specialists in New South Wales", self.site.name),
            ORGANIZATION_DESCRIPTION,
            self.site.url("/"),
            "website",
            DEFAULT_IMAGE,
            "summary_large_image",
            vec![self.organization_schema()],
        )
    }

    /// Fixed metadata for informational pages.
    pub fn static_page_meta(&self, path: &str, title: &str, description: &str) -> SeoMetadata {
        let page_title = format!("{title} - {}", self.site.name);
        self.metadata(
            &page_title,
            description,
            self.site.url(path),
            "website",
            DEFAULT_IMAGE,
            "summary",
            vec![self.breadcrumb_schema(&[("Home", "/"), (title, path)])],
        )
    }

    pub fn professional_schema(&self, professional: &Professional) -> Value {
        let mut schema = Map::new();
        schema.insert("@context".into(), json!("https://schema.org"));
        schema.insert("@type".into(), json!("MedicalBusiness"));
        schema.insert(
            "@id".into(),
            json!(self.site.url(&professional.canonical_path())),
        );
        schema.insert("name".into(), json!(professional.full_name()));
        if let Some(bio) = non_blank(professional.bio.as_deref()) {
            schema.insert("description".into(), json!(bio));
        }
        if !professional.services.is_empty() {
            let specialties: Vec<Value> = professional
                .services
                .iter()
                .map(|service| json!({ "@type": "MedicalSpecialty", "name": service.name }))
                .collect();
            schema.insert("medicalSpecialty".into(), Value::Array(specialties));
        }
        if !professional.credentials.is_empty() {
            let credentials: Vec<Value> = professional
                .credentials
                .iter()
                .map(|credential| {
                    json!({
                        "@type": "EducationalOccupationalCredential",
                        "credentialCategory": credential,
                    })
                })
                .collect();
            schema.insert("hasCredential".into(), Value::Array(credentials));
        }

        let primary = professional.primary_location();
        if let Some(location) = primary {
            let mut address = Map::new();
            address.insert("@type".into(), json!("PostalAddress"));
            for (key, value) in [
                ("streetAddress", &location.street_address),
                ("addressLocality", &location.suburb),
                ("addressRegion", &location.state),
                ("postalCode", &location.postcode),
            ] {
                if !value.trim().is_empty() {
                    address.insert(key.into(), json!(value));
                }
            }
            address.insert("addressCountry".into(), json!("AU"));
            schema.insert("address".into(), Value::Object(address));

            if let Some((latitude, longitude)) = location.coordinates() {
                schema.insert(
                    "geo".into(),
                    json!({
                        "@type": "GeoCoordinates",
                        "latitude": latitude,
                        "longitude": longitude,
                    }),
                );
            }
        }
        let telephone = primary
            .and_then(|location| non_blank(location.phone.as_deref()))
            .or_else(|| non_blank(professional.phone.as_deref()));
        if let Some(telephone) = telephone {
            schema.insert("telephone".into(), json!(telephone));
        }
        if let Some(website) = non_blank(professional.website.as_deref()) {
            schema.insert("url".into(), json!(website));
        }
        Value::Object(schema)
    }

    pub fn article_schema(&self, post: &BlogPost) -> Value {
        let url = self.site.url(&post.canonical_path());
        let description = non_blank(post.excerpt.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| excerpt(&post.content));
        let author = non_blank(Some(post.author_name.as_str())).unwrap_or(&self.site.name);

        let mut schema = Map::new();
        schema.insert("@context".into(), json!("https://schema.org"));
        schema.insert("@type".into(), json!("MedicalWebPage"));
        schema.insert("@id".into(), json!(url));
        schema.insert("headline".into(), json!(post.title));
        schema.insert("description".into(), json!(description));
        if let Some(image) = non_blank(post.featured_image.as_deref()) {
            schema.insert("image".into(), json!(self.site.url(image)));
        }
        if let Some(published) = post.published_at {
            schema.insert("datePublished".into(), json!(published.to_rfc3339()));
        }
        if let Some(modified) = post.updated_at {
            schema.insert("dateModified".into(), json!(modified.to_rfc3339()));
        }
        schema.insert(
            "author".into(),
            json!({ "@type": "Organization", "name": author, "url": self.site.base_url }),
        );
        schema.insert("publisher".into(), self.publisher());
        schema.insert(
            "mainEntityOfPage".into(),
            json!({ "@type": "WebPage", "@id": url }),
        );
        Value::Object(schema)
    }

    fn publisher(&self) -> Value {
        json!({
            "@type": "Organization",
            "name": self.site.name,
            "url": self.site.base_url,
            "logo": { "@type": "ImageObject", "url": self.site.url(LOGO) },
        })
    }

    pub fn organization_schema(&self) -> Value {
        let handle = self.site.twitter_handle.trim_start_matches('@');
        json!({
            "@context": "https://schema.org",
            "@type": "MedicalOrganization",
            "@id": self.site.base_url,
            "name": self.site.name,
            "url": self.site.base_url,
            "logo": self.site.url(LOGO),
            "description": ORGANIZATION_DESCRIPTION,
            "address": {
                "@type": "PostalAddress",
                "addressRegion": "NSW",
                "addressCountry": "AU",
            },
            "sameAs": [
                format!("https://twitter.com/{handle}"),
                format!("https://facebook.com/{handle}"),
            ],
        })
    }

    /// BreadcrumbList from `(name, path)` pairs, positions starting at 1.
    pub fn breadcrumb_schema(&self, trail: &[(&str, &str)]) -> Value {
        let items: Vec<Value> = trail
            .iter()
            .enumerate()
            .map(|(index, (name, path))| {
                json!({
                    "@type": "ListItem",
                    "position": index + 1,
                    "name": name,
                    "item": self.site.url(path),
                })
            })
            .collect();
        json!({
            "@context": "https://schema.org",
            "@type": "BreadcrumbList",
            "itemListElement": items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{from_record, PostStatus};

    fn seo() -> SeoService {
        SeoService::new(SiteConfig::default())
    }

    fn professional(extra: Value) -> Professional {
        let mut row = json!({
            "id": "p1",
            "slug": "dr-jane-smith",
            "title": "Dr",
            "first_name": "Jane",
            "last_name": "Smith",
        });
        if let (Value::Object(row), Value::Object(extra)) = (&mut row, extra) {
            row.extend(extra);
        }
        from_record(&row).expect("professional row")
    }

    fn post() -> BlogPost {
        from_record(&json!({
            "id": "b1",
            "slug": "understanding-adult-adhd",
            "title": "Understanding Adult ADHD",
            "content": "## Signs\nSee [the guide](https://example.org) for <em>more</em> detail.",
            "status": "published",
            "published_at": "2024-05-01T10:00:00Z",
        }))
        .expect("post row")
    }

    #[test]
    fn truncation_counts_characters() {
        let short = "a".repeat(60);
        assert_eq!(truncate_title(&short), short);

        let long = "b".repeat(61);
        let truncated = truncate_title(&long);
        assert_eq!(truncated.chars().count(), 60);
        assert!(truncated.ends_with("..."));

        let accented = "é".repeat(200);
        assert_eq!(truncate_description(&accented).chars().count(), 160);
    }

    #[test]
    fn excerpt_strips_markdown_and_html() {
        assert_eq!(
            excerpt("# Title\n\nRead [this](http://x.y) <b>now</b>"),
            "Title Read this now"
        );
    }

    #[test]
    fn professional_meta_synthesizes_title_and_description() {
        let meta = seo().professional_meta(&professional(json!({
            "credentials": ["MBBS", "FRANZCP"],
            "bio": "Adult ADHD assessments.",
            "locations": [{ "id": "l1", "suburb": "Newcastle", "is_primary": true }],
            "professional_services": [
                { "service_type": { "id": "s1", "slug": "psychiatrist", "name": "Psychiatrist" } }
            ]
        })));

        assert_eq!(meta.title, "Dr Jane Smith - ADHD Psychiatrist in Newcastle, NSW");
        assert!(meta
            .description
            .starts_with("Dr Jane Smith (MBBS, FRANZCP) - Psychiatrist in Newcastle, NSW. Adult ADHD"));
        assert_eq!(meta.canonical, "https://adhdnsw.org/professionals/dr-jane-smith");
        assert_eq!(meta.open_graph.kind, "profile");
        assert_eq!(
            meta.open_graph.image,
            "https://adhdnsw.org/images/og-professional-default.jpg"
        );
        assert_eq!(meta.twitter.card, "summary");

        let schema = &meta.json_ld[0];
        assert_eq!(schema["@type"], "MedicalBusiness");
        assert_eq!(schema["address"]["addressLocality"], "Newcastle");
        assert!(schema.get("geo").is_none());
        assert!(schema.get("telephone").is_none());
        assert_eq!(meta.json_ld[1]["itemListElement"][2]["position"], 3);
    }

    #[test]
    fn professional_overrides_win() {
        let meta = seo().professional_meta(&professional(json!({
            "meta_title": "Custom title",
            "meta_description": "Custom description",
        })));
        assert_eq!(meta.title, "Custom title");
        assert_eq!(meta.description, "Custom description");
    }

    #[test]
    fn blog_meta_falls_back_to_content_excerpt() {
        let post = post();
        assert_eq!(post.status, PostStatus::Published);
        let meta = seo().blog_post_meta(&post);
        assert_eq!(meta.title, "Understanding Adult ADHD");
        assert_eq!(meta.description, "Signs See the guide for more detail.");
        assert_eq!(meta.twitter.card, "summary_large_image");
        assert_eq!(
            meta.twitter.image.as_deref(),
            Some("https://adhdnsw.org/images/og-blog-default.jpg")
        );

        let article = &meta.json_ld[0];
        assert_eq!(article["@type"], "MedicalWebPage");
        assert_eq!(article["author"]["name"], "ADHD NSW");
        assert!(article.get("image").is_none());
        assert!(article.get("dateModified").is_none());
        assert_eq!(article["datePublished"], "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn directory_meta_reflects_facets() {
        let plain = seo().directory_meta(DirectoryFacets::default());
        assert_eq!(plain.title, "ADHD Professionals Directory NSW");
        assert_eq!(plain.canonical, "https://adhdnsw.org/directory");

        let faceted = seo().directory_meta(DirectoryFacets {
            location: Some("Central Coast"),
            service: Some(("psychiatrist", "Psychiatrists")),
            page: 3,
        });
        assert_eq!(faceted.title, "ADHD Psychiatrists in Central Coast, NSW - Page 3");
        assert!(faceted
            .description
            .contains("ADHD psychiatrists in Central Coast, NSW"));
        assert_eq!(
            faceted.canonical,
            "https://adhdnsw.org/directory?location=Central%20Coast&services=psychiatrist&page=3"
        );
    }

    #[test]
    fn blog_index_meta_uses_category_details() {
        let category: BlogCategory = from_record(&json!({
            "id": "c1", "slug": "diagnosis-guides", "name": "Diagnosis Guides"
        }))
        .expect("category");
        let meta = seo().blog_index_meta(Some("diagnosis-guides"), Some(&category), 2);
        assert_eq!(meta.title, "Diagnosis Guides - ADHD NSW Blog - Page 2");
        assert!(meta.description.starts_with("Latest Diagnosis Guides articles"));
        assert_eq!(
            meta.canonical,
            "https://adhdnsw.org/blog?category=diagnosis-guides&page=2"
        );

        let plain = seo().blog_index_meta(None, None, 1);
        assert_eq!(plain.canonical, "https://adhdnsw.org/blog");
        assert_eq!(plain.title, "ADHD Blog & Resources - NSW Updates, Guides & News");
    }

    #[test]
    fn static_pages_get_breadcrumbs() {
        let meta = seo().static_page_meta("/about", "About Us", "Learn about us.");
        assert_eq!(meta.title, "About Us - ADHD NSW");
        assert_eq!(meta.canonical, "https://adhdnsw.org/about");
        assert_eq!(
            meta.json_ld[0]["itemListElement"][1]["item"],
            "https://adhdnsw.org/about"
        );
    }

    #[test]
    fn organization_schema_links_social_profiles() {
        let schema = seo().organization_schema();
        assert_eq!(schema["@type"], "MedicalOrganization");
        assert_eq!(schema["sameAs"][0], "https://twitter.com/adhdnsw");
    }
}
