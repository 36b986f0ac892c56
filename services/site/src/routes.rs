use crate::infra::{AppState, SitePages};
use crate::views;
use adhd_directory::analytics::SearchQueryEvent;
use adhd_directory::blog::POPULAR_TAG_LIMIT;
use adhd_directory::content::{
    AgeGroup, BlogCategory, BlogPost, BlogTag, PaymentMethod, Professional, ServiceType,
};
use adhd_directory::directory::{NearbyProfessional, NEARBY_LIMIT, NEARBY_RADIUS_KM};
use adhd_directory::error::{AppError, ServiceError};
use adhd_directory::feeds::{
    render_robots, render_sitemap, rss_feed, sitemap_entries, RSS_CACHE_CONTROL, RSS_CONTENT_TYPE,
};
use adhd_directory::pages::params::{blog_params, directory_params};
use adhd_directory::pages::{StaticPage, SITEMAP_PAGE_PATH};
use adhd_directory::pagination::PaginatedResponse;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Extension, Json, Router};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const CSS_CONTENT_TYPE: &str = "text/css; charset=utf-8";
const API_MAX_LIMIT: u64 = 100;

pub(crate) fn with_site_routes(pages: SitePages) -> Router {
    let router = Router::new()
        .route("/", get(home_page))
        .route("/directory", get(directory_page))
        .route("/professionals/:slug", get(professional_page))
        .route("/blog", get(blog_index_page))
        .route("/blog/rss.xml", get(rss_endpoint))
        .route("/blog/:slug", get(blog_post_page))
        .route("/sitemap.xml", get(sitemap_endpoint))
        .route(SITEMAP_PAGE_PATH, get(sitemap_page))
        .route("/robots.txt", get(robots_endpoint))
        .route("/static/site.css", get(stylesheet))
        .route("/api/v1/directory/professionals", get(list_professionals))
        .route("/api/v1/directory/professionals/:slug", get(get_professional))
        .route("/api/v1/directory/nearby", get(nearby_professionals))
        .route("/api/v1/directory/service-types", get(list_service_types))
        .route("/api/v1/directory/age-groups", get(list_age_groups))
        .route("/api/v1/directory/payment-methods", get(list_payment_methods))
        .route("/api/v1/blog/posts", get(list_posts))
        .route("/api/v1/blog/posts/:slug", get(get_post))
        .route("/api/v1/blog/categories", get(list_categories))
        .route("/api/v1/blog/tags", get(list_tags))
        .route("/api/v1/search/track", post(track_search));

    StaticPage::ALL
        .into_iter()
        .fold(router, |router, page| router.route(page.path(), static_route(page)))
        .fallback(not_found_page)
        .with_state(pages)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn static_route(page: StaticPage) -> MethodRouter<SitePages> {
    get(move |State(pages): State<SitePages>| async move {
        views::static_page(&pages.static_page(page), pages.site())
    })
}

fn not_found_response(pages: &SitePages) -> Response {
    let seo = pages.seo().static_page_meta(
        "/404",
        "Page Not Found",
        "The page you are looking for could not be found.",
    );
    let body = views::error_page(
        &seo,
        pages.site(),
        "Page not found",
        "The page you are looking for doesn't exist or may have moved.",
    );
    (StatusCode::NOT_FOUND, body).into_response()
}

/// NotFound renders the 404 page; anything else means the store let us down.
fn page_error(pages: &SitePages, err: ServiceError) -> Response {
    if err.is_not_found() {
        return not_found_response(pages);
    }
    warn!(error = %err, "page unavailable");
    let seo = pages.seo().static_page_meta(
        "/",
        "Temporarily Unavailable",
        "This page is temporarily unavailable. Please try again shortly.",
    );
    let body = views::error_page(
        &seo,
        pages.site(),
        "Temporarily unavailable",
        "We couldn't load this page right now. Please try again shortly.",
    );
    (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
}

pub(crate) async fn not_found_page(State(pages): State<SitePages>) -> Response {
    not_found_response(&pages)
}

pub(crate) async fn home_page(State(pages): State<SitePages>) -> Markup {
    let view = pages.home_page().await;
    views::home(&view, pages.site())
}

pub(crate) async fn sitemap_page(State(pages): State<SitePages>) -> Markup {
    let view = pages.sitemap_page().await;
    views::sitemap(&view, pages.site())
}

pub(crate) async fn directory_page(
    State(pages): State<SitePages>,
    Query(raw): Query<HashMap<String, String>>,
) -> Markup {
    let view = pages.directory_page(&raw).await;
    views::directory(&view, pages.site())
}

pub(crate) async fn professional_page(
    State(pages): State<SitePages>,
    Path(slug): Path<String>,
) -> Response {
    match pages.professional_page(&slug).await {
        Ok(view) => views::professional(&view, pages.site()).into_response(),
        Err(err) => page_error(&pages, err),
    }
}

pub(crate) async fn blog_index_page(
    State(pages): State<SitePages>,
    Query(raw): Query<HashMap<String, String>>,
) -> Markup {
    let view = pages.blog_index_page(&raw).await;
    views::blog_index(&view, pages.site())
}

pub(crate) async fn blog_post_page(
    State(pages): State<SitePages>,
    Path(slug): Path<String>,
) -> Response {
    match pages.blog_post_page(&slug).await {
        Ok(view) => views::blog_post(&view, pages.site()).into_response(),
        Err(err) => page_error(&pages, err),
    }
}

pub(crate) async fn rss_endpoint(State(pages): State<SitePages>) -> impl IntoResponse {
    let xml = rss_feed(pages.blog(), pages.site(), Utc::now()).await;
    (
        [
            (header::CONTENT_TYPE, RSS_CONTENT_TYPE),
            (header::CACHE_CONTROL, RSS_CACHE_CONTROL),
        ],
        xml,
    )
}

pub(crate) async fn sitemap_endpoint(State(pages): State<SitePages>) -> impl IntoResponse {
    let entries = sitemap_entries(pages.directory(), pages.blog(), pages.site(), Utc::now()).await;
    ([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], render_sitemap(&entries))
}

pub(crate) async fn robots_endpoint(State(pages): State<SitePages>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], render_robots(pages.site()))
}

pub(crate) async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, CSS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        views::STYLESHEET,
    )
}

fn api_limit(raw: &HashMap<String, String>) -> Option<u64> {
    raw.get("limit")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|limit| limit.clamp(1, API_MAX_LIMIT))
}

pub(crate) async fn list_professionals(
    State(pages): State<SitePages>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<PaginatedResponse<Professional>>, AppError> {
    let mut params = directory_params(&raw);
    if let Some(limit) = api_limit(&raw) {
        params.limit = limit;
    }
    let results = pages.directory().search_professionals(&params).await?;
    Ok(Json(results))
}

pub(crate) async fn get_professional(
    State(pages): State<SitePages>,
    Path(slug): Path<String>,
) -> Result<Json<Professional>, AppError> {
    Ok(Json(pages.directory().get_professional_by_slug(&slug).await?))
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyRequest {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn nearby_professionals(
    State(pages): State<SitePages>,
    Query(request): Query<NearbyRequest>,
) -> Result<Json<Vec<NearbyProfessional>>, AppError> {
    let radius = request.radius.unwrap_or(NEARBY_RADIUS_KM);
    let limit = request
        .limit
        .unwrap_or(NEARBY_LIMIT)
        .clamp(1, API_MAX_LIMIT as usize);
    let nearby = pages
        .directory()
        .get_nearby_professionals(request.lat, request.lng, radius, limit)
        .await?;
    Ok(Json(nearby))
}

pub(crate) async fn list_service_types(
    State(pages): State<SitePages>,
) -> Result<Json<Vec<ServiceType>>, AppError> {
    Ok(Json(pages.directory().get_service_types().await?))
}

pub(crate) async fn list_age_groups(
    State(pages): State<SitePages>,
) -> Result<Json<Vec<AgeGroup>>, AppError> {
    Ok(Json(pages.directory().get_age_groups().await?))
}

pub(crate) async fn list_payment_methods(
    State(pages): State<SitePages>,
) -> Result<Json<Vec<PaymentMethod>>, AppError> {
    Ok(Json(pages.directory().get_payment_methods().await?))
}

pub(crate) async fn list_posts(
    State(pages): State<SitePages>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<PaginatedResponse<BlogPost>>, AppError> {
    let mut params = blog_params(&raw);
    if let Some(limit) = api_limit(&raw) {
        params.limit = limit;
    }
    if let Some(featured) = raw.get("featured") {
        params.featured = Some(featured == "true");
    }
    Ok(Json(pages.blog().get_blog_posts(&params).await?))
}

pub(crate) async fn get_post(
    State(pages): State<SitePages>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    Ok(Json(pages.blog().get_blog_post_by_slug(&slug).await?))
}

pub(crate) async fn list_categories(
    State(pages): State<SitePages>,
) -> Result<Json<Vec<BlogCategory>>, AppError> {
    Ok(Json(pages.blog().get_categories().await?))
}

pub(crate) async fn list_tags(
    State(pages): State<SitePages>,
) -> Result<Json<Vec<BlogTag>>, AppError> {
    Ok(Json(pages.blog().get_popular_tags(POPULAR_TAG_LIMIT).await?))
}

/// Accepts the event and records it in the background.
pub(crate) async fn track_search(
    State(pages): State<SitePages>,
    Json(event): Json<SearchQueryEvent>,
) -> Response {
    if event.query.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "query must not be empty" })),
        )
            .into_response();
    }
    pages.analytics().track(event);
    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" }))).into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
