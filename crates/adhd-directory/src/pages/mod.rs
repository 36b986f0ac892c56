//! Page composers: fan out the reads a page needs, absorb failures the page can
//! live without, and attach metadata.

pub mod params;
mod static_pages;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::analytics::{QueryType, SearchAnalytics, SearchQueryEvent};
use crate::blog::{BlogSearchParams, BlogService, RELATED_LIMIT};
use crate::config::SiteConfig;
use crate::content::{AgeGroup, BlogCategory, BlogPost, Professional, ServiceType};
use crate::directory::{DirectorySearchParams, DirectoryService};
use crate::error::ServiceError;
use crate::feeds::sitemap::{LOCATION_FACETS, SERVICE_FACETS};
use crate::pagination::PaginatedResponse;
use crate::seo::{DirectoryFacets, SeoMetadata, SeoService};
use crate::store::RecordStore;

pub use static_pages::{Section, StaticPage};

pub const INDEX_FEATURED_LIMIT: u64 = 3;
pub const HOME_FEATURED_LIMIT: u64 = 3;

#[derive(Debug, Clone)]
pub struct DirectoryPage {
    pub params: DirectorySearchParams,
    pub results: PaginatedResponse<Professional>,
    pub service_types: Vec<ServiceType>,
    pub age_groups: Vec<AgeGroup>,
    pub seo: SeoMetadata,
}

#[derive(Debug, Clone)]
pub struct ProfessionalPage {
    pub professional: Professional,
    pub seo: SeoMetadata,
}

#[derive(Debug, Clone)]
pub struct BlogIndexPage {
    pub params: BlogSearchParams,
    pub posts: PaginatedResponse<BlogPost>,
    pub categories: Vec<BlogCategory>,
    /// Empty unless this is the first unfiltered page.
    pub featured: Vec<BlogPost>,
    pub active_category: Option<BlogCategory>,
    pub seo: SeoMetadata,
}

#[derive(Debug, Clone)]
pub struct BlogPostPage {
    pub post: BlogPost,
    pub related: Vec<BlogPost>,
    pub seo: SeoMetadata,
}

#[derive(Debug, Clone)]
pub struct HomePage {
    pub featured_posts: Vec<BlogPost>,
    pub service_types: Vec<ServiceType>,
    pub seo: SeoMetadata,
}

#[derive(Debug, Clone)]
pub struct StaticPageView {
    pub page: StaticPage,
    pub seo: SeoMetadata,
}

/// A labelled link into a filtered directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetLink {
    pub label: String,
    pub href: String,
}

/// Human-readable index of the site's pages, facets and blog categories.
#[derive(Debug, Clone)]
pub struct SitemapPage {
    pub services: Vec<FacetLink>,
    pub locations: Vec<FacetLink>,
    pub categories: Vec<BlogCategory>,
    pub seo: SeoMetadata,
}

pub const SITEMAP_PAGE_PATH: &str = "/sitemap";

/// Title-cased slug, used when a service slug has no matching record.
fn humanize(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything a page needs, built once per process around one store.
pub struct PageComposer<S: ?Sized> {
    directory: DirectoryService<S>,
    blog: BlogService<S>,
    analytics: SearchAnalytics<S>,
    seo: SeoService,
}

impl<S: ?Sized> Clone for PageComposer<S> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            blog: self.blog.clone(),
            analytics: self.analytics.clone(),
            seo: self.seo.clone(),
        }
    }
}

impl<S> PageComposer<S>
where
    S: RecordStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, site: SiteConfig) -> Self {
        Self {
            directory: DirectoryService::new(Arc::clone(&store)),
            blog: BlogService::new(Arc::clone(&store)),
            analytics: SearchAnalytics::new(store),
            seo: SeoService::new(site),
        }
    }

    pub fn directory(&self) -> &DirectoryService<S> {
        &self.directory
    }

    pub fn blog(&self) -> &BlogService<S> {
        &self.blog
    }

    pub fn analytics(&self) -> &SearchAnalytics<S> {
        &self.analytics
    }

    pub fn seo(&self) -> &SeoService {
        &self.seo
    }

    pub fn site(&self) -> &SiteConfig {
        self.seo.site()
    }

    pub async fn directory_page(&self, raw: &HashMap<String, String>) -> DirectoryPage {
        let params = params::directory_params(raw);
        let (results, service_types, age_groups) = tokio::join!(
            self.directory.search_professionals(&params),
            self.directory.get_service_types(),
            self.directory.get_age_groups(),
        );

        let (results, service_types, age_groups) = match (results, service_types, age_groups) {
            (Ok(results), Ok(service_types), Ok(age_groups)) => (results, service_types, age_groups),
            (results, service_types, age_groups) => {
                let error = results
                    .err()
                    .or(service_types.err())
                    .or(age_groups.err());
                if let Some(error) = error {
                    warn!(error = %error, "directory page falling back to empty results");
                }
                (PaginatedResponse::empty(params.limit), Vec::new(), Vec::new())
            }
        };

        if let Some(query) = params.search_text() {
            let mut event = SearchQueryEvent::new(
                query,
                QueryType::Directory,
                results.pagination.total,
            );
            event.user_location = params.location_text().map(str::to_string);
            self.analytics.track(event);
        }

        let service = params.services.first().map(|slug| {
            let name = service_types
                .iter()
                .find(|service| &service.slug == slug)
                .map(|service| service.name.clone())
                .unwrap_or_else(|| humanize(slug));
            (slug.as_str(), name)
        });
        let seo = self.seo.directory_meta(DirectoryFacets {
            location: params.location_text(),
            service: service.as_ref().map(|(slug, name)| (*slug, name.as_str())),
            page: params.page,
        });

        DirectoryPage {
            params,
            results,
            service_types,
            age_groups,
            seo,
        }
    }

    pub async fn professional_page(&self, slug: &str) -> Result<ProfessionalPage, ServiceError> {
        let professional = self.directory.get_professional_by_slug(slug).await?;
        let seo = self.seo.professional_meta(&professional);
        Ok(ProfessionalPage { professional, seo })
    }

    pub async fn blog_index_page(&self, raw: &HashMap<String, String>) -> BlogIndexPage {
        let params = params::blog_params(raw);
        let (posts, categories, featured) = tokio::join!(
            self.blog.get_blog_posts(&params),
            self.blog.get_categories(),
            self.blog.get_featured_posts(INDEX_FEATURED_LIMIT),
        );

        let (posts, categories, featured) = match (posts, categories, featured) {
            (Ok(posts), Ok(categories), Ok(featured)) => (posts, categories, featured),
            (posts, categories, featured) => {
                let error = posts.err().or(categories.err()).or(featured.err());
                if let Some(error) = error {
                    warn!(error = %error, "blog index falling back to empty results");
                }
                (PaginatedResponse::empty(params.limit), Vec::new(), Vec::new())
            }
        };

        let category_slug = params.categories.first().cloned();
        let active_category = category_slug.as_ref().and_then(|slug| {
            categories
                .iter()
                .find(|category| &category.slug == slug)
                .cloned()
        });
        let featured = if params.page == 1 && category_slug.is_none() {
            featured
        } else {
            Vec::new()
        };
        let seo = self.seo.blog_index_meta(
            category_slug.as_deref(),
            active_category.as_ref(),
            params.page,
        );

        BlogIndexPage {
            params,
            posts,
            categories,
            featured,
            active_category,
            seo,
        }
    }

    pub async fn blog_post_page(&self, slug: &str) -> Result<BlogPostPage, ServiceError> {
        let post = self.blog.get_blog_post_by_slug(slug).await?;
        let category_ids: Vec<String> = post
            .categories
            .iter()
            .map(|category| category.id.clone())
            .collect();
        let related = self
            .blog
            .get_related_posts(&post.id, &category_ids, RELATED_LIMIT)
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, post = %post.slug, "related posts unavailable");
                Vec::new()
            });
        let seo = self.seo.blog_post_meta(&post);
        Ok(BlogPostPage { post, related, seo })
    }

    pub async fn home_page(&self) -> HomePage {
        let (featured_posts, service_types) = tokio::join!(
            self.blog.get_featured_posts(HOME_FEATURED_LIMIT),
            self.directory.get_service_types(),
        );
        let featured_posts = featured_posts.unwrap_or_else(|err| {
            warn!(error = %err, "home page without featured posts");
            Vec::new()
        });
        let service_types = service_types.unwrap_or_else(|err| {
            warn!(error = %err, "home page without service types");
            Vec::new()
        });
        HomePage {
            featured_posts,
            service_types,
            seo: self.seo.home_meta(),
        }
    }

    pub fn static_page(&self, page: StaticPage) -> StaticPageView {
        StaticPageView {
            page,
            seo: self
                .seo
                .static_page_meta(page.path(), page.title(), page.description()),
        }
    }

    /// Service links prefer stored names; the fixed facet slugs stand in when
    /// the lookup fails or is empty.
    pub async fn sitemap_page(&self) -> SitemapPage {
        let (service_types, categories) =
            tokio::join!(self.directory.get_service_types(), self.blog.get_categories());
        let service_types = service_types.unwrap_or_else(|err| {
            warn!(error = %err, "sitemap page without service types");
            Vec::new()
        });
        let categories = categories.unwrap_or_else(|err| {
            warn!(error = %err, "sitemap page without categories");
            Vec::new()
        });

        let services = if service_types.is_empty() {
            SERVICE_FACETS
                .iter()
                .map(|slug| FacetLink {
                    label: humanize(slug),
                    href: format!("/directory?services={}", urlencoding::encode(slug)),
                })
                .collect()
        } else {
            service_types
                .iter()
                .map(|service| FacetLink {
                    label: service.name.clone(),
                    href: format!("/directory?services={}", urlencoding::encode(&service.slug)),
                })
                .collect()
        };
        let locations = LOCATION_FACETS
            .iter()
            .map(|location| FacetLink {
                label: format!("{location} ADHD Services"),
                href: format!("/directory?location={}", urlencoding::encode(location)),
            })
            .collect();

        SitemapPage {
            services,
            locations,
            categories,
            seo: self.seo.static_page_meta(
                SITEMAP_PAGE_PATH,
                "Sitemap",
                "Site navigation and directory of all pages on ADHD NSW.",
            ),
        }
    }
}
