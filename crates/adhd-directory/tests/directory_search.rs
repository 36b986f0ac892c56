use std::sync::Arc;

use adhd_directory::directory::{DirectorySearchParams, DirectoryService, SortBy};
use adhd_directory::store::{Collection, InMemoryStore};
use serde_json::{json, Value};

fn service(slug: &str, name: &str) -> Value {
    json!({ "service_type": { "id": format!("svc-{slug}"), "slug": slug, "name": name, "category": "medical" } })
}

fn professional(
    id: &str,
    last_name: &str,
    active: bool,
    ndis: bool,
    services: Vec<Value>,
    suburb: &str,
    coordinates: (f64, f64),
) -> Value {
    json!({
        "id": id,
        "slug": format!("dr-{}", last_name.to_lowercase()),
        "title": "Dr",
        "first_name": "Sam",
        "last_name": last_name,
        "is_active": active,
        "is_verified": id.ends_with('1'),
        "ndis_registered": ndis,
        "accepts_new_patients": true,
        "languages": ["English", "Mandarin"],
        "bio": format!("{last_name} supports adults with ADHD in {suburb}."),
        "locations": [{
            "id": format!("loc-{id}"),
            "suburb": suburb,
            "state": "NSW",
            "postcode": "2000",
            "is_primary": true,
            "latitude": coordinates.0,
            "longitude": coordinates.1
        }],
        "professional_services": services,
        "professional_age_groups": [{ "age_group": { "id": "ag-1", "slug": "adults", "name": "Adults", "min_age": 18 } }]
    })
}

fn directory() -> DirectoryService<InMemoryStore> {
    let psychiatrist = || service("psychiatrist", "Psychiatrist");
    let psychologist = || service("psychologist", "Psychologist");
    let store = InMemoryStore::new()
        .with_rows(
            Collection::Professionals,
            vec![
                professional("p1", "Nguyen", true, true, vec![psychiatrist()], "Sydney", (-33.8688, 151.2093)),
                professional("p2", "Abbott", true, false, vec![psychiatrist()], "Newcastle", (-32.9283, 151.7817)),
                professional("p3", "Clarke", true, true, vec![psychologist()], "Parramatta", (-33.8150, 151.0011)),
                professional("p4", "Ellis", false, true, vec![psychiatrist()], "Sydney", (-33.87, 151.21)),
                professional("p5", "Baker", true, true, vec![psychiatrist(), psychologist()], "Penrith", (-33.7507, 150.6877)),
            ],
        )
        .with_rows(
            Collection::ServiceTypes,
            vec![
                json!({ "id": "svc-psychologist", "slug": "psychologist", "name": "Psychologist", "display_order": 2 }),
                json!({ "id": "svc-psychiatrist", "slug": "psychiatrist", "name": "Psychiatrist", "display_order": 1 }),
            ],
        )
        .with_rows(
            Collection::PaymentMethods,
            vec![
                json!({ "id": "pm-2", "slug": "private", "name": "Private" }),
                json!({ "id": "pm-1", "slug": "medicare", "name": "Medicare" }),
            ],
        );
    DirectoryService::new(Arc::new(store))
}

fn slugs(professionals: &[adhd_directory::content::Professional]) -> Vec<&str> {
    professionals.iter().map(|p| p.slug.as_str()).collect()
}

#[tokio::test]
async fn psychiatrists_with_ndis_only_returns_active_matches() {
    let params = DirectorySearchParams {
        services: vec!["psychiatrist".to_string()],
        ndis_only: true,
        sort_by: SortBy::Name,
        ..DirectorySearchParams::default()
    };
    let results = directory()
        .search_professionals(&params)
        .await
        .expect("search succeeds");

    assert_eq!(slugs(&results.data), vec!["dr-baker", "dr-nguyen"]);
    assert_eq!(results.pagination.total, 2);
    assert_eq!(results.pagination.total_pages, 1);
    assert!(results
        .data
        .iter()
        .all(|p| p.is_active && p.ndis_registered));
}

#[tokio::test]
async fn inactive_professionals_are_never_returned() {
    let results = directory()
        .search_professionals(&DirectorySearchParams::default())
        .await
        .expect("search succeeds");
    assert_eq!(results.pagination.total, 4);
    assert!(!slugs(&results.data).contains(&"dr-ellis"));

    let err = directory()
        .get_professional_by_slug("dr-ellis")
        .await
        .expect_err("inactive profile hidden");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let err = directory()
        .get_professional_by_slug("dr-nobody")
        .await
        .expect_err("missing profile");
    assert!(err.is_not_found());

    let found = directory()
        .get_professional_by_slug("dr-clarke")
        .await
        .expect("known profile");
    assert_eq!(found.full_name(), "Dr Sam Clarke");
    assert_eq!(found.services[0].slug, "psychologist");
}

#[tokio::test]
async fn pages_past_the_end_are_empty_with_true_totals() {
    let params = DirectorySearchParams {
        page: 5,
        limit: 2,
        ..DirectorySearchParams::default()
    };
    let results = directory()
        .search_professionals(&params)
        .await
        .expect("search succeeds");
    assert!(results.data.is_empty());
    assert_eq!(results.pagination.total, 4);
    assert_eq!(results.pagination.total_pages, 2);
    assert_eq!(results.pagination.page, 5);
}

#[tokio::test]
async fn free_text_and_location_narrow_results() {
    let params = DirectorySearchParams {
        query: Some("adults -newcastle".to_string()),
        location: Some("syd".to_string()),
        ..DirectorySearchParams::default()
    };
    let results = directory()
        .search_professionals(&params)
        .await
        .expect("search succeeds");
    assert_eq!(slugs(&results.data), vec!["dr-nguyen"]);

    let by_postcode = DirectorySearchParams {
        location: Some("2000".to_string()),
        languages: vec!["Mandarin".to_string()],
        ..DirectorySearchParams::default()
    };
    let results = directory()
        .search_professionals(&by_postcode)
        .await
        .expect("search succeeds");
    assert_eq!(results.pagination.total, 4);
}

#[tokio::test]
async fn nearby_professionals_are_sorted_by_distance() {
    let nearby = directory()
        .get_nearby_professionals(-33.8688, 151.2093, 25.0, 10)
        .await
        .expect("nearby succeeds");
    let slugs: Vec<&str> = nearby
        .iter()
        .map(|found| found.professional.slug.as_str())
        .collect();
    assert_eq!(slugs, vec!["dr-nguyen", "dr-clarke"]);
    assert!(nearby[0].distance_km < 0.01);
}

#[tokio::test]
async fn lookups_follow_their_display_order() {
    let directory = directory();
    let services = directory.get_service_types().await.expect("service types");
    assert_eq!(services[0].slug, "psychiatrist");

    let methods = directory.get_payment_methods().await.expect("payment methods");
    assert_eq!(methods[0].name, "Medicare");

    let groups = directory.get_age_groups().await.expect("age groups");
    assert!(groups.is_empty());
}
