//! Professional directory search and lookups.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::{select_entities, AgeGroup, PaymentMethod, Professional, ServiceType};
use crate::error::ServiceError;
use crate::pagination::{PageRequest, PaginatedResponse, DIRECTORY_PAGE_SIZE};
use crate::store::{Collection, Filter, Query, RecordStore, WebSearchQuery};

pub const DEFAULT_RADIUS_KM: u32 = 50;
pub const NEARBY_RADIUS_KM: f64 = 10.0;
pub const NEARBY_LIMIT: usize = 10;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Distance,
    Name,
}

impl SortBy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(Self::Relevance),
            "distance" => Some(Self::Distance),
            "name" => Some(Self::Name),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Distance => "distance",
            Self::Name => "name",
        }
    }
}

/// Structured directory request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectorySearchParams {
    pub query: Option<String>,
    pub location: Option<String>,
    /// Accepted and logged. Geo filtering lives in `get_nearby_professionals`.
    pub radius: u32,
    pub services: Vec<String>,
    pub age_groups: Vec<String>,
    pub languages: Vec<String>,
    pub ndis_only: bool,
    pub telehealth_only: bool,
    pub accepting_new_patients: bool,
    pub sort_by: SortBy,
    pub page: u64,
    pub limit: u64,
}

impl Default for DirectorySearchParams {
    fn default() -> Self {
        Self {
            query: None,
            location: None,
            radius: DEFAULT_RADIUS_KM,
            services: Vec::new(),
            age_groups: Vec::new(),
            languages: Vec::new(),
            ndis_only: false,
            telehealth_only: false,
            accepting_new_patients: false,
            sort_by: SortBy::Relevance,
            page: 1,
            limit: DIRECTORY_PAGE_SIZE,
        }
    }
}

impl DirectorySearchParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Trimmed free-text query, `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    pub fn location_text(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Compose the professional search against the store.
pub fn professional_query(params: &DirectorySearchParams) -> Query {
    let mut query = Query::new(Collection::Professionals)
        .count_exact()
        .eq("is_active", true);

    if params.accepting_new_patients {
        query = query.eq("accepts_new_patients", true);
    }
    if params.ndis_only {
        query = query.eq("ndis_registered", true);
    }
    if params.telehealth_only {
        query = query.eq("locations.offers_telehealth", true);
    }
    if !params.services.is_empty() {
        query = query.in_list(
            "professional_services.service_type.slug",
            params.services.iter().cloned(),
        );
    }
    if !params.age_groups.is_empty() {
        query = query.in_list(
            "professional_age_groups.age_group.slug",
            params.age_groups.iter().cloned(),
        );
    }
    if !params.languages.is_empty() {
        query = query.contains_all("languages", params.languages.iter().cloned());
    }

    let search = params
        .search_text()
        .map(WebSearchQuery::parse)
        .filter(|search| !search.is_empty());
    let has_search = search.is_some();
    if let Some(search) = search {
        query = query.text_search("search_vector", search);
    }

    if let Some(location) = params.location_text() {
        query = query.or(vec![
            Filter::ilike("locations.suburb", format!("%{location}%")),
            Filter::eq("locations.postcode", location),
        ]);
    }

    query = match params.sort_by {
        SortBy::Name => query.order("last_name", true).order("first_name", true),
        SortBy::Distance => query.order("locations.suburb", true),
        SortBy::Relevance if has_search => query.order_by_relevance(),
        SortBy::Relevance => query.order("is_verified", false),
    };

    match params.page_request().range() {
        Some((from, to)) => query.range(from, to),
        None => query.limit(0),
    }
}

/// A professional found by a proximity search, with the distance to their
/// nearest located practice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyProfessional {
    #[serde(flatten)]
    pub professional: Professional,
    pub distance_km: f64,
}

/// Great-circle distance in kilometres.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lng2) = (to.0.to_radians(), to.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub struct DirectoryService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for DirectoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> DirectoryService<S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn search_professionals(
        &self,
        params: &DirectorySearchParams,
    ) -> Result<PaginatedResponse<Professional>, ServiceError> {
        if params.location_text().is_some() {
            debug!(
                location = params.location_text(),
                radius_km = params.radius,
                "location filter uses suburb/postcode matching"
            );
        }

        let query = professional_query(params);
        let (data, count) = select_entities::<Professional, _>(self.store.as_ref(), &query)
            .await
            .inspect_err(|err| warn!(error = %err, "professional search failed"))?;
        let total = count.unwrap_or(data.len() as u64);

        debug!(
            total,
            page = params.page,
            sort = params.sort_by.as_str(),
            "professional search complete"
        );

        Ok(PaginatedResponse {
            data,
            pagination: params.page_request().paginate(total),
        })
    }

    pub async fn get_professional_by_slug(&self, slug: &str) -> Result<Professional, ServiceError> {
        let query = Query::new(Collection::Professionals)
            .eq("slug", slug)
            .eq("is_active", true)
            .limit(1);
        let (professionals, _) =
            select_entities::<Professional, _>(self.store.as_ref(), &query).await?;
        professionals
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("professional", slug))
    }

    /// Active professionals with a located practice inside `radius_km`, nearest first.
    pub async fn get_nearby_professionals(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<NearbyProfessional>, ServiceError> {
        let query = Query::new(Collection::Professionals).eq("is_active", true);
        let (professionals, _) =
            select_entities::<Professional, _>(self.store.as_ref(), &query).await?;

        let origin = (latitude, longitude);
        let mut nearby: Vec<NearbyProfessional> = professionals
            .into_iter()
            .filter_map(|professional| {
                let distance_km = professional
                    .locations
                    .iter()
                    .filter_map(|location| location.coordinates())
                    .map(|coordinates| haversine_km(origin, coordinates))
                    .min_by(f64::total_cmp)?;
                (distance_km <= radius_km).then_some(NearbyProfessional {
                    professional,
                    distance_km,
                })
            })
            .collect();

        nearby.sort_by(|left, right| left.distance_km.total_cmp(&right.distance_km));
        nearby.truncate(limit);
        Ok(nearby)
    }

    pub async fn get_service_types(&self) -> Result<Vec<ServiceType>, ServiceError> {
        let query = Query::new(Collection::ServiceTypes).order("display_order", true);
        let (services, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(services)
    }

    pub async fn get_age_groups(&self) -> Result<Vec<AgeGroup>, ServiceError> {
        let query = Query::new(Collection::AgeGroups).order("min_age", true);
        let (groups, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(groups)
    }

    pub async fn get_payment_methods(&self) -> Result<Vec<PaymentMethod>, ServiceError> {
        let query = Query::new(Collection::PaymentMethods).order("name", true);
        let (methods, _) = select_entities(self.store.as_ref(), &query).await?;
        Ok(methods)
    }
}
