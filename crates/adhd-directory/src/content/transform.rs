//! Store rows to typed entities.
//!
//! Each entity has a raw, snake_case mirror of the store row. Raw structs are
//! deserialized straight from the row, so identity fields that are missing or
//! ill-typed fail with a serde diagnostic, while optional fields fall back to
//! empty values. Junction rows are flattened into the lookup they point at.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{
    AgeGroup, BlogCategory, BlogPost, BlogTag, Location, PaymentMethod, PostStatus, Professional,
    ServiceCategory, ServiceType,
};
use crate::store::Collection;

/// A store row failed validation.
#[derive(Debug, thiserror::Error)]
#[error("malformed {collection} record '{record_id}': {source}")]
pub struct TransformError {
    pub collection: Collection,
    pub record_id: String,
    #[source]
    pub source: serde_json::Error,
}

/// Entities that can be decoded from a row of a store collection.
pub trait FromRecord: Sized {
    const COLLECTION: Collection;
    type Raw: DeserializeOwned + Into<Self>;
}

pub fn from_record<T: FromRecord>(row: &Value) -> Result<T, TransformError> {
    T::Raw::deserialize(row)
        .map(Into::into)
        .map_err(|source| TransformError {
            collection: T::COLLECTION,
            record_id: record_id(row),
            source,
        })
}

pub fn transform_rows<T: FromRecord>(rows: &[Value]) -> Result<Vec<T>, TransformError> {
    rows.iter().map(from_record::<T>).collect()
}

fn record_id(row: &Value) -> String {
    match row.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => "<unknown>".to_string(),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.trim().is_empty() => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a non-empty string or numeric id, found {other}"
        ))),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or numeric id, found {other}"
        ))),
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as a timestamp"))
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_timestamp(&value).map_err(D::Error::custom))
        .transpose()
}

#[derive(Debug, Deserialize)]
pub struct RawServiceType {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<ServiceCategory>,
    #[serde(default)]
    display_order: Option<i32>,
}

impl From<RawServiceType> for ServiceType {
    fn from(raw: RawServiceType) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            name: raw.name,
            description: raw.description,
            category: raw.category.unwrap_or_default(),
            display_order: raw.display_order.unwrap_or_default(),
        }
    }
}

impl FromRecord for ServiceType {
    const COLLECTION: Collection = Collection::ServiceTypes;
    type Raw = RawServiceType;
}

#[derive(Debug, Deserialize)]
pub struct RawAgeGroup {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    name: String,
    #[serde(default)]
    min_age: Option<u32>,
    #[serde(default)]
    max_age: Option<u32>,
}

impl From<RawAgeGroup> for AgeGroup {
    fn from(raw: RawAgeGroup) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            name: raw.name,
            min_age: raw.min_age,
            max_age: raw.max_age,
        }
    }
}

impl FromRecord for AgeGroup {
    const COLLECTION: Collection = Collection::AgeGroups;
    type Raw = RawAgeGroup;
}

#[derive(Debug, Deserialize)]
pub struct RawPaymentMethod {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    bulk_billing_available: Option<bool>,
}

impl From<RawPaymentMethod> for PaymentMethod {
    fn from(raw: RawPaymentMethod) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            name: raw.name,
            description: raw.description,
            bulk_billing_available: raw.bulk_billing_available,
        }
    }
}

impl FromRecord for PaymentMethod {
    const COLLECTION: Collection = Collection::PaymentMethods;
    type Raw = RawPaymentMethod;
}

#[derive(Debug, Deserialize)]
pub struct RawLocation {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    professional_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    street_address: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    is_primary: Option<bool>,
    #[serde(default)]
    offers_telehealth: Option<bool>,
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        Self {
            id: raw.id,
            professional_id: raw.professional_id,
            name: raw.name.unwrap_or_default(),
            street_address: raw.street_address.unwrap_or_default(),
            suburb: raw.suburb.unwrap_or_default(),
            state: raw.state.unwrap_or_default(),
            postcode: raw.postcode.unwrap_or_default(),
            latitude: raw.latitude,
            longitude: raw.longitude,
            phone: raw.phone,
            email: raw.email,
            is_primary: raw.is_primary.unwrap_or(false),
            offers_telehealth: raw.offers_telehealth.unwrap_or(false),
        }
    }
}

impl FromRecord for Location {
    const COLLECTION: Collection = Collection::Locations;
    type Raw = RawLocation;
}

#[derive(Debug, Deserialize)]
struct ServiceLink {
    #[serde(default)]
    service_type: Option<RawServiceType>,
}

#[derive(Debug, Deserialize)]
struct AgeGroupLink {
    #[serde(default)]
    age_group: Option<RawAgeGroup>,
}

#[derive(Debug, Deserialize)]
struct PaymentMethodLink {
    #[serde(default)]
    payment_method: Option<RawPaymentMethod>,
    #[serde(default)]
    bulk_billing_available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RawProfessional {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    #[serde(default)]
    title: Option<String>,
    first_name: String,
    last_name: String,
    #[serde(default)]
    credentials: Option<Vec<String>>,
    #[serde(default)]
    registration_number: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    booking_url: Option<String>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    accepts_new_patients: Option<bool>,
    #[serde(default)]
    waitlist_weeks: Option<u32>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    approach: Option<String>,
    #[serde(default)]
    specializations: Option<Vec<String>>,
    #[serde(default)]
    languages: Option<Vec<String>>,
    #[serde(default)]
    ndis_registered: Option<bool>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    locations: Option<Vec<RawLocation>>,
    #[serde(default)]
    professional_services: Option<Vec<ServiceLink>>,
    #[serde(default)]
    professional_age_groups: Option<Vec<AgeGroupLink>>,
    #[serde(default)]
    professional_payment_methods: Option<Vec<PaymentMethodLink>>,
}

impl From<RawProfessional> for Professional {
    fn from(raw: RawProfessional) -> Self {
        let services = raw
            .professional_services
            .unwrap_or_default()
            .into_iter()
            .filter_map(|link| link.service_type.map(ServiceType::from))
            .collect();
        let age_groups = raw
            .professional_age_groups
            .unwrap_or_default()
            .into_iter()
            .filter_map(|link| link.age_group.map(AgeGroup::from))
            .collect();
        let payment_methods = raw
            .professional_payment_methods
            .unwrap_or_default()
            .into_iter()
            .filter_map(|link| {
                let bulk_billing = link.bulk_billing_available;
                link.payment_method.map(|method| {
                    let mut method = PaymentMethod::from(method);
                    method.bulk_billing_available = bulk_billing.or(method.bulk_billing_available);
                    method
                })
            })
            .collect();

        Self {
            id: raw.id,
            slug: raw.slug,
            title: raw.title.unwrap_or_default(),
            first_name: raw.first_name,
            last_name: raw.last_name,
            credentials: raw.credentials.unwrap_or_default(),
            registration_number: raw.registration_number,
            email: raw.email,
            phone: raw.phone,
            website: raw.website,
            booking_url: raw.booking_url,
            is_verified: raw.is_verified.unwrap_or(false),
            verified_at: raw.verified_at,
            is_active: raw.is_active.unwrap_or(false),
            accepts_new_patients: raw.accepts_new_patients.unwrap_or(false),
            waitlist_weeks: raw.waitlist_weeks,
            bio: raw.bio,
            approach: raw.approach,
            specializations: raw.specializations.unwrap_or_default(),
            languages: raw.languages.unwrap_or_default(),
            ndis_registered: raw.ndis_registered.unwrap_or(false),
            meta_title: raw.meta_title,
            meta_description: raw.meta_description,
            locations: raw
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(Location::from)
                .collect(),
            services,
            age_groups,
            payment_methods,
        }
    }
}

impl FromRecord for Professional {
    const COLLECTION: Collection = Collection::Professionals;
    type Raw = RawProfessional;
}

#[derive(Debug, Deserialize)]
pub struct RawBlogCategory {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    parent_id: Option<String>,
    #[serde(default)]
    display_order: Option<i32>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
}

impl From<RawBlogCategory> for BlogCategory {
    fn from(raw: RawBlogCategory) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            name: raw.name,
            description: raw.description,
            parent_id: raw.parent_id,
            display_order: raw.display_order.unwrap_or_default(),
            meta_title: raw.meta_title,
            meta_description: raw.meta_description,
        }
    }
}

impl FromRecord for BlogCategory {
    const COLLECTION: Collection = Collection::BlogCategories;
    type Raw = RawBlogCategory;
}

#[derive(Debug, Deserialize)]
pub struct RawBlogTag {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    name: String,
}

impl From<RawBlogTag> for BlogTag {
    fn from(raw: RawBlogTag) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            name: raw.name,
        }
    }
}

impl FromRecord for BlogTag {
    const COLLECTION: Collection = Collection::BlogTags;
    type Raw = RawBlogTag;
}

#[derive(Debug, Deserialize)]
struct CategoryLink {
    #[serde(default)]
    category: Option<RawBlogCategory>,
}

#[derive(Debug, Deserialize)]
struct TagLink {
    #[serde(default)]
    tag: Option<RawBlogTag>,
}

#[derive(Debug, Deserialize)]
pub struct RawBlogPost {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    slug: String,
    title: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    featured_image: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    author_bio: Option<String>,
    #[serde(default)]
    author_image: Option<String>,
    #[serde(default)]
    status: Option<PostStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    canonical_url: Option<String>,
    #[serde(default)]
    is_featured: Option<bool>,
    #[serde(default)]
    is_evergreen: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    blog_post_categories: Option<Vec<CategoryLink>>,
    #[serde(default)]
    blog_post_tags: Option<Vec<TagLink>>,
}

impl From<RawBlogPost> for BlogPost {
    fn from(raw: RawBlogPost) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            title: raw.title,
            excerpt: raw.excerpt,
            content: raw.content.unwrap_or_default(),
            featured_image: raw.featured_image,
            author_name: raw.author_name.unwrap_or_default(),
            author_bio: raw.author_bio,
            author_image: raw.author_image,
            status: raw.status.unwrap_or_default(),
            published_at: raw.published_at,
            meta_title: raw.meta_title,
            meta_description: raw.meta_description,
            canonical_url: raw.canonical_url,
            is_featured: raw.is_featured.unwrap_or(false),
            is_evergreen: raw.is_evergreen.unwrap_or(false),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            categories: raw
                .blog_post_categories
                .unwrap_or_default()
                .into_iter()
                .filter_map(|link| link.category.map(BlogCategory::from))
                .collect(),
            tags: raw
                .blog_post_tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|link| link.tag.map(BlogTag::from))
                .collect(),
        }
    }
}

impl FromRecord for BlogPost {
    const COLLECTION: Collection = Collection::BlogPosts;
    type Raw = RawBlogPost;
}
