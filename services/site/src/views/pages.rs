use super::components::{
    blog_href, directory_filters, directory_href, display_date, pagination_nav, post_card,
    professional_card,
};
use super::content::render_body;
use super::layout::document;
use adhd_directory::config::SiteConfig;
use adhd_directory::content::{PaymentMethod, Professional};
use adhd_directory::pages::{
    BlogIndexPage, BlogPostPage, DirectoryPage, FacetLink, HomePage, ProfessionalPage,
    SitemapPage, StaticPage, StaticPageView, SITEMAP_PAGE_PATH,
};
use adhd_directory::seo::SeoMetadata;
use chrono::Utc;
use maud::{html, Markup};

pub(crate) fn home(view: &HomePage, site: &SiteConfig) -> Markup {
    let content = html! {
        section.hero {
            h1 { "Find ADHD support in New South Wales" }
            p { "Search psychiatrists, psychologists, paediatricians and coaches who work with ADHD across NSW." }
            form method="get" action="/directory" {
                input type="search" name="q" placeholder="Search by name, specialty or concern";
                input type="text" name="location" placeholder="Suburb or postcode";
                button type="submit" { "Search the directory" }
            }
        }
        @if !view.service_types.is_empty() {
            section.services {
                h2 { "Browse by service" }
                ul {
                    @for service in &view.service_types {
                        li {
                            a href={ "/directory?services=" (urlencoding::encode(&service.slug)) } { (service.name) }
                            @if let Some(description) = &service.description {
                                p { (description) }
                            }
                        }
                    }
                }
            }
        }
        @if !view.featured_posts.is_empty() {
            section.featured-posts {
                h2 { "From the blog" }
                div.post-grid {
                    @for post in &view.featured_posts {
                        (post_card(post))
                    }
                }
                a href="/blog" { "All articles" }
            }
        }
    };
    document(&view.seo, site, "/", content)
}

pub(crate) fn directory(view: &DirectoryPage, site: &SiteConfig) -> Markup {
    let results = &view.results;
    let content = html! {
        h1 { "Find ADHD Professionals in NSW" }
        (directory_filters(&view.params, &view.service_types, &view.age_groups))
        p.result-count {
            (results.pagination.total) " "
            @if results.pagination.total == 1 { "professional" } @else { "professionals" }
            " found"
        }
        @if results.data.is_empty() {
            div.empty-state {
                p { "No professionals match these filters yet." }
                a href="/directory" { "Clear all filters" }
            }
        } @else {
            div.professional-list {
                @for professional in &results.data {
                    (professional_card(professional))
                }
            }
        }
        (pagination_nav(&results.pagination, |page| directory_href(&view.params, page)))
    };
    document(&view.seo, site, "/directory", content)
}

fn payment_label(method: &PaymentMethod) -> String {
    match method.bulk_billing_available {
        Some(true) => format!("{} (bulk billing available)", method.name),
        _ => method.name.clone(),
    }
}

fn contact_details(professional: &Professional) -> Markup {
    html! {
        section.contact {
            h2 { "Contact" }
            @if let Some(phone) = &professional.phone {
                p { "Phone: " a href={ "tel:" (phone.replace(' ', "")) } { (phone) } }
            }
            @if let Some(email) = &professional.email {
                p { "Email: " a href={ "mailto:" (email) } { (email) } }
            }
            @if let Some(website) = &professional.website {
                p { a href=(website) rel="noopener" target="_blank" { "Visit website" } }
            }
            @if let Some(booking_url) = &professional.booking_url {
                p { a.button href=(booking_url) rel="noopener" target="_blank" { "Book an appointment" } }
            }
        }
    }
}

pub(crate) fn professional(view: &ProfessionalPage, site: &SiteConfig) -> Markup {
    let professional = &view.professional;
    let content = html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { "Home" } " / " a href="/directory" { "Directory" } " / " (professional.full_name())
        }
        article.professional-profile {
            header {
                h1 { (professional.full_name()) }
                @if !professional.credentials.is_empty() {
                    p.credentials { (professional.credentials.join(", ")) }
                }
                @if professional.is_verified {
                    p.badge.verified {
                        "Verified"
                        @if let Some(verified_at) = professional.verified_at {
                            " " time datetime=(verified_at.to_rfc3339()) { (display_date(verified_at)) }
                        }
                    }
                }
                p.availability {
                    @if professional.accepts_new_patients {
                        "Accepting new patients"
                    } @else {
                        "Not currently accepting new patients"
                    }
                    @if let Some(weeks) = professional.waitlist_weeks {
                        " · approx. " (weeks) " week wait"
                    }
                }
            }
            @if let Some(bio) = &professional.bio {
                section.bio { h2 { "About" } p { (bio) } }
            }
            @if let Some(approach) = &professional.approach {
                section.approach { h2 { "Approach" } p { (approach) } }
            }
            @if !professional.services.is_empty() {
                section { h2 { "Services" } ul { @for service in &professional.services { li { (service.name) } } } }
            }
            @if !professional.specializations.is_empty() {
                section { h2 { "Specialisations" } ul { @for item in &professional.specializations { li { (item) } } } }
            }
            @if !professional.age_groups.is_empty() {
                section { h2 { "Age groups" } ul { @for group in &professional.age_groups { li { (group.name) } } } }
            }
            @if !professional.payment_methods.is_empty() {
                section { h2 { "Fees and payment" } ul { @for method in &professional.payment_methods { li { (payment_label(method)) } } } }
            }
            @if !professional.languages.is_empty() {
                section { h2 { "Languages" } p { (professional.languages.join(", ")) } }
            }
            @if professional.ndis_registered {
                p.badge { "NDIS registered provider" }
            }
            @if !professional.locations.is_empty() {
                section.locations {
                    h2 { "Locations" }
                    @for location in &professional.locations {
                        div.location {
                            @if !location.name.is_empty() { h3 { (location.name) } }
                            address {
                                @if !location.street_address.is_empty() { (location.street_address) br; }
                                (location.locality())
                            }
                            @if location.offers_telehealth { p { "Telehealth available" } }
                        }
                    }
                }
            }
            (contact_details(professional))
            @if let Some(registration) = &professional.registration_number {
                p.registration { "AHPRA registration: " (registration) }
            }
        }
    };
    document(&view.seo, site, "/directory", content)
}

pub(crate) fn blog_index(view: &BlogIndexPage, site: &SiteConfig) -> Markup {
    let active_slug = view.params.categories.first().map(String::as_str);
    let content = html! {
        header.blog-header {
            @match &view.active_category {
                Some(category) => {
                    h1 { (category.name) }
                    @if let Some(description) = &category.description { p { (description) } }
                }
                None => {
                    h1 { "ADHD Blog & Resources" }
                    p { "Guides, news and practical support for people with ADHD in NSW." }
                }
            }
        }
        nav.categories aria-label="Categories" {
            a class=[active_slug.is_none().then_some("current")] href="/blog" { "All" }
            @for category in &view.categories {
                a class=[(active_slug == Some(category.slug.as_str())).then_some("current")]
                    href={ "/blog?category=" (urlencoding::encode(&category.slug)) } { (category.name) }
            }
        }
        @if !view.featured.is_empty() {
            section.featured-posts {
                h2 { "Featured" }
                div.post-grid { @for post in &view.featured { (post_card(post)) } }
            }
        }
        @if view.posts.data.is_empty() {
            p.empty-state { "No articles found." }
        } @else {
            div.post-grid { @for post in &view.posts.data { (post_card(post)) } }
        }
        (pagination_nav(&view.posts.pagination, |page| blog_href(&view.params, page)))
    };
    document(&view.seo, site, "/blog", content)
}

pub(crate) fn blog_post(view: &BlogPostPage, site: &SiteConfig) -> Markup {
    let post = &view.post;
    let content = html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { "Home" } " / " a href="/blog" { "Blog" } " / " (post.title)
        }
        article.blog-post {
            header {
                @if !post.categories.is_empty() {
                    p.categories {
                        @for category in &post.categories {
                            a href={ "/blog?category=" (urlencoding::encode(&category.slug)) } { (category.name) } " "
                        }
                    }
                }
                h1 { (post.title) }
                p.byline {
                    @if !post.author_name.is_empty() { "By " (post.author_name) }
                    @if let Some(published_at) = post.published_at {
                        " · " time datetime=(published_at.to_rfc3339()) { (display_date(published_at)) }
                    }
                }
                @if let Some(image) = &post.featured_image {
                    img src=(image) alt=(post.title);
                }
            }
            div.post-body { (render_body(&post.content)) }
            @if !post.tags.is_empty() {
                ul.tags {
                    @for tag in &post.tags {
                        li { a href={ "/blog?tag=" (urlencoding::encode(&tag.slug)) } { "#" (tag.name) } }
                    }
                }
            }
            @if let Some(author_bio) = &post.author_bio {
                aside.author {
                    @if let Some(author_image) = &post.author_image {
                        img src=(author_image) alt=(post.author_name);
                    }
                    p { (author_bio) }
                }
            }
        }
        @if !view.related.is_empty() {
            section.related-posts {
                h2 { "Related articles" }
                div.post-grid { @for related in &view.related { (post_card(related)) } }
            }
        }
    };
    document(&view.seo, site, "/blog", content)
}

pub(crate) fn static_page(view: &StaticPageView, site: &SiteConfig) -> Markup {
    let page = view.page;
    let content = html! {
        article.static-page {
            h1 { (page.heading()) }
            @if page.is_legal() {
                p.updated { "Last updated: " (display_date(Utc::now())) }
            }
            @for section in page.sections() {
                section {
                    h2 { (section.heading) }
                    @for paragraph in section.paragraphs { p { (paragraph) } }
                }
            }
        }
    };
    document(&view.seo, site, page.path(), content)
}

fn link_list(links: &[FacetLink]) -> Markup {
    html! {
        ul {
            @for link in links {
                li { a href=(link.href) { (link.label) } }
            }
        }
    }
}

pub(crate) fn sitemap(view: &SitemapPage, site: &SiteConfig) -> Markup {
    let content = html! {
        article.site-map {
            h1 { "Site Map" }
            div.site-map-grid {
                section {
                    h2 { "Main Pages" }
                    ul {
                        li { a href="/" { "Home" } }
                        li { a href="/directory" { "Professional Directory" } }
                        li { a href="/blog" { "Blog & Resources" } }
                        li { a href=(StaticPage::About.path()) { (StaticPage::About.title()) } }
                        li { a href=(StaticPage::Contact.path()) { "Contact" } }
                    }
                }
                section {
                    h2 { "Directory Filters" }
                    (link_list(&view.services))
                }
                section {
                    h2 { "Popular Locations" }
                    (link_list(&view.locations))
                }
                @if !view.categories.is_empty() {
                    section {
                        h2 { "Blog Categories" }
                        ul {
                            @for category in &view.categories {
                                li { a href={ "/blog?category=" (urlencoding::encode(&category.slug)) } { (category.name) } }
                            }
                        }
                    }
                }
                section {
                    h2 { "Legal & Support" }
                    ul {
                        li { a href=(StaticPage::Privacy.path()) { (StaticPage::Privacy.title()) } }
                        li { a href=(StaticPage::Terms.path()) { (StaticPage::Terms.title()) } }
                        li { a href="/sitemap.xml" { "XML Sitemap" } }
                    }
                }
            }
        }
    };
    document(&view.seo, site, SITEMAP_PAGE_PATH, content)
}

/// Body for 404 and 503 responses, wrapped in the normal layout.
pub(crate) fn error_page(seo: &SeoMetadata, site: &SiteConfig, heading: &str, message: &str) -> Markup {
    let content = html! {
        section.error-page {
            h1 { (heading) }
            p { (message) }
            p {
                a href="/" { "Go home" } " or " a href="/directory" { "search the directory" }
            }
        }
    };
    document(seo, site, "", content)
}
