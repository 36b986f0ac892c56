use adhd_directory::blog::BlogSearchParams;
use adhd_directory::content::{AgeGroup, BlogPost, Professional, ServiceType};
use adhd_directory::directory::{DirectorySearchParams, SortBy};
use adhd_directory::pagination::Pagination;
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub(crate) fn display_date(date: DateTime<Utc>) -> String {
    date.format("%-d %B %Y").to_string()
}

fn push_param(pairs: &mut Vec<String>, key: &str, value: &str) {
    pairs.push(format!("{key}={}", urlencoding::encode(value)));
}

fn with_query(path: &str, pairs: Vec<String>) -> String {
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

/// Directory URL that reproduces `params` on another page.
pub(crate) fn directory_href(params: &DirectorySearchParams, page: u64) -> String {
    let mut pairs = Vec::new();
    if let Some(query) = params.search_text() {
        push_param(&mut pairs, "q", query);
    }
    if let Some(location) = params.location_text() {
        push_param(&mut pairs, "location", location);
    }
    for (key, values) in [
        ("services", &params.services),
        ("ages", &params.age_groups),
        ("languages", &params.languages),
    ] {
        if !values.is_empty() {
            push_param(&mut pairs, key, &values.join(","));
        }
    }
    for (key, enabled) in [
        ("ndis", params.ndis_only),
        ("telehealth", params.telehealth_only),
        ("accepting", params.accepting_new_patients),
    ] {
        if enabled {
            push_param(&mut pairs, key, "true");
        }
    }
    if params.sort_by != SortBy::Relevance {
        push_param(&mut pairs, "sort", params.sort_by.as_str());
    }
    if page > 1 {
        push_param(&mut pairs, "page", &page.to_string());
    }
    with_query("/directory", pairs)
}

pub(crate) fn blog_href(params: &BlogSearchParams, page: u64) -> String {
    let mut pairs = Vec::new();
    if let Some(query) = params.search_text() {
        push_param(&mut pairs, "q", query);
    }
    if let Some(category) = params.categories.first() {
        push_param(&mut pairs, "category", category);
    }
    if let Some(tag) = params.tags.first() {
        push_param(&mut pairs, "tag", tag);
    }
    if page > 1 {
        push_param(&mut pairs, "page", &page.to_string());
    }
    with_query("/blog", pairs)
}

/// Previous/next links plus a position readout. Nothing when there is a single page.
pub(crate) fn pagination_nav(pagination: &Pagination, href: impl Fn(u64) -> String) -> Markup {
    html! {
        @if pagination.total_pages > 1 {
            nav.pagination aria-label="Pagination" {
                @if pagination.has_previous() {
                    a rel="prev" href=(href(pagination.page - 1)) { "Previous" }
                }
                span.position { "Page " (pagination.page) " of " (pagination.total_pages) }
                @if pagination.has_next() {
                    a rel="next" href=(href(pagination.page + 1)) { "Next" }
                }
            }
        }
    }
}

pub(crate) fn professional_card(professional: &Professional) -> Markup {
    let services = professional
        .services
        .iter()
        .map(|service| service.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    html! {
        article.professional-card {
            h3 {
                a href=(professional.canonical_path()) { (professional.full_name()) }
                @if professional.is_verified {
                    span.badge.verified title="Verified profile" { "Verified" }
                }
            }
            @if !professional.credentials.is_empty() {
                p.credentials { (professional.credentials.join(", ")) }
            }
            @if !services.is_empty() {
                p.services { (services) }
            }
            @if let Some(location) = professional.primary_location() {
                p.location { (location.locality()) }
            }
            ul.tags {
                @if professional.accepts_new_patients {
                    li { "Accepting new patients" }
                }
                @if professional.offers_telehealth() {
                    li { "Telehealth" }
                }
                @if professional.ndis_registered {
                    li { "NDIS registered" }
                }
                @if professional.is_multilingual() {
                    li { (professional.languages.join(", ")) }
                }
            }
        }
    }
}

pub(crate) fn post_card(post: &BlogPost) -> Markup {
    html! {
        article.post-card {
            @if let Some(image) = &post.featured_image {
                img src=(image) alt=(post.title) loading="lazy";
            }
            @if let Some(category) = post.categories.first() {
                a.category href={ "/blog?category=" (urlencoding::encode(&category.slug)) } { (category.name) }
            }
            h3 { a href=(post.canonical_path()) { (post.title) } }
            @if let Some(excerpt) = &post.excerpt {
                p.excerpt { (excerpt) }
            }
            @if let Some(published_at) = post.published_at {
                time datetime=(published_at.to_rfc3339()) { (display_date(published_at)) }
            }
        }
    }
}

fn sort_option(value: SortBy, current: SortBy, label: &str) -> Markup {
    html! {
        option value=(value.as_str()) selected[value == current] { (label) }
    }
}

/// GET form whose field names match the directory's query parameters.
pub(crate) fn directory_filters(
    params: &DirectorySearchParams,
    service_types: &[ServiceType],
    age_groups: &[AgeGroup],
) -> Markup {
    let selected_service = params.services.first().map(String::as_str);
    let selected_age = params.age_groups.first().map(String::as_str);
    html! {
        form.directory-filters method="get" action="/directory" {
            label {
                "Search"
                input type="search" name="q" value=[params.search_text()] placeholder="e.g. adult assessment";
            }
            label {
                "Suburb or postcode"
                input type="text" name="location" value=[params.location_text()];
            }
            label {
                "Service"
                select name="services" {
                    option value="" { "Any service" }
                    @for service in service_types {
                        option value=(service.slug) selected[Some(service.slug.as_str()) == selected_service] {
                            (service.name)
                        }
                    }
                }
            }
            label {
                "Age group"
                select name="ages" {
                    option value="" { "Any age" }
                    @for group in age_groups {
                        option value=(group.slug) selected[Some(group.slug.as_str()) == selected_age] {
                            (group.name)
                        }
                    }
                }
            }
            fieldset {
                label { input type="checkbox" name="ndis" value="true" checked[params.ndis_only]; " NDIS registered" }
                label { input type="checkbox" name="telehealth" value="true" checked[params.telehealth_only]; " Telehealth" }
                label { input type="checkbox" name="accepting" value="true" checked[params.accepting_new_patients]; " Accepting new patients" }
            }
            label {
                "Sort by"
                select name="sort" {
                    (sort_option(SortBy::Relevance, params.sort_by, "Relevance"))
                    (sort_option(SortBy::Distance, params.sort_by, "Location"))
                    (sort_option(SortBy::Name, params.sort_by, "Name"))
                }
            }
            button type="submit" { "Search" }
        }
    }
}
