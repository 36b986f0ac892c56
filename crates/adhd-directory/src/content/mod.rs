//! Typed view entities served by the directory and blog.

pub mod transform;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::store::{Query, RecordStore};

pub use transform::{from_record, transform_rows, FromRecord, TransformError};

/// Run a select and decode every returned row. The count is the store's exact
/// total when the query asked for one.
pub(crate) async fn select_entities<T, S>(
    store: &S,
    query: &Query,
) -> Result<(Vec<T>, Option<u64>), ServiceError>
where
    T: FromRecord,
    S: RecordStore + ?Sized,
{
    debug_assert_eq!(query.collection(), T::COLLECTION);
    let result = store.select(query).await?;
    let entities = transform_rows::<T>(&result.rows)?;
    Ok((entities, result.exact_count))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub credentials: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub accepts_new_patients: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_weeks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<String>,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub ndis_registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub locations: Vec<Location>,
    pub services: Vec<ServiceType>,
    pub age_groups: Vec<AgeGroup>,
    pub payment_methods: Vec<PaymentMethod>,
}

impl Professional {
    /// Display name, e.g. "Dr Jane Smith". A missing honorific is skipped.
    pub fn full_name(&self) -> String {
        [
            self.title.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// The location flagged primary. Several flagged rows resolve to the lowest id.
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations
            .iter()
            .filter(|location| location.is_primary)
            .min_by(|left, right| compare_ids(&left.id, &right.id))
    }

    pub fn offers_telehealth(&self) -> bool {
        self.locations
            .iter()
            .any(|location| location.offers_telehealth)
    }

    pub fn is_multilingual(&self) -> bool {
        self.languages
            .iter()
            .any(|language| !language.eq_ignore_ascii_case("english"))
    }

    pub fn canonical_path(&self) -> String {
        format!("/professionals/{}", self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
    pub name: String,
    pub street_address: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_primary: bool,
    pub offers_telehealth: bool,
}

impl Location {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// "Sydney, NSW 2000"
    pub fn locality(&self) -> String {
        let region = [self.state.trim(), self.postcode.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        match (self.suburb.trim().is_empty(), region.is_empty()) {
            (true, _) => region,
            (false, true) => self.suburb.trim().to_string(),
            (false, false) => format!("{}, {}", self.suburb.trim(), region),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Medical,
    Therapy,
    Coaching,
    Assessment,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceType {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: ServiceCategory,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroup {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_billing_available: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    pub is_featured: bool,
    pub is_evergreen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub categories: Vec<BlogCategory>,
    pub tags: Vec<BlogTag>,
}

impl BlogPost {
    pub fn canonical_path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Most recent known change, for sitemap `lastmod`.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.published_at).or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub display_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogTag {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// Store ids arrive as text. Integer ids compare by value so "9" sorts before
/// "10"; anything else keeps plain string order.
fn compare_ids(left: &str, right: &str) -> Ordering {
    match (left.parse::<i64>(), right.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => left.cmp(right),
    }
}
