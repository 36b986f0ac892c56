//! Query-string parameters for listing pages.
//!
//! Pages receive a flat string map. Malformed values fall back to their
//! defaults and unknown keys are ignored.

use std::collections::HashMap;

use crate::blog::BlogSearchParams;
use crate::directory::{DirectorySearchParams, SortBy};

fn text(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn list(params: &HashMap<String, String>, key: &str) -> Vec<String> {
    params
        .get(key)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn flag(params: &HashMap<String, String>, key: &str) -> bool {
    params.get(key).is_some_and(|value| value == "true")
}

/// Positive page number, defaulting to 1.
pub fn page_number(params: &HashMap<String, String>) -> u64 {
    params
        .get("page")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

pub fn directory_params(params: &HashMap<String, String>) -> DirectorySearchParams {
    DirectorySearchParams {
        query: text(params, "q"),
        location: text(params, "location"),
        services: list(params, "services"),
        age_groups: list(params, "ages"),
        languages: list(params, "languages"),
        ndis_only: flag(params, "ndis"),
        telehealth_only: flag(params, "telehealth"),
        accepting_new_patients: flag(params, "accepting"),
        sort_by: params
            .get("sort")
            .and_then(|value| SortBy::parse(value))
            .unwrap_or_default(),
        page: page_number(params),
        ..DirectorySearchParams::default()
    }
}

pub fn blog_params(params: &HashMap<String, String>) -> BlogSearchParams {
    BlogSearchParams {
        query: text(params, "q"),
        categories: text(params, "category").into_iter().collect(),
        tags: text(params, "tag").into_iter().collect(),
        page: page_number(params),
        ..BlogSearchParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{CONTENT_PAGE_SIZE, DIRECTORY_PAGE_SIZE};

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn directory_params_split_lists_and_read_flags() {
        let params = directory_params(&map(&[
            ("q", " adult adhd "),
            ("services", "psychiatrist, psychologist,,"),
            ("ages", "adults"),
            ("ndis", "true"),
            ("telehealth", "yes"),
            ("sort", "name"),
            ("page", "3"),
            ("utm_source", "newsletter"),
        ]));
        assert_eq!(params.query.as_deref(), Some("adult adhd"));
        assert_eq!(params.services, vec!["psychiatrist", "psychologist"]);
        assert_eq!(params.age_groups, vec!["adults"]);
        assert!(params.ndis_only);
        assert!(!params.telehealth_only);
        assert_eq!(params.sort_by, SortBy::Name);
        assert_eq!(params.page, 3);
        assert_eq!(params.limit, DIRECTORY_PAGE_SIZE);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let params = directory_params(&map(&[("page", "-2"), ("sort", "closest"), ("q", "  ")]));
        assert_eq!(params.page, 1);
        assert_eq!(params.sort_by, SortBy::Relevance);
        assert!(params.query.is_none());

        assert_eq!(page_number(&map(&[("page", "0")])), 1);
        assert_eq!(page_number(&map(&[("page", "abc")])), 1);
    }

    #[test]
    fn blog_params_take_single_category_and_tag() {
        let params = blog_params(&map(&[("category", "diagnosis-guides"), ("page", "2")]));
        assert_eq!(params.categories, vec!["diagnosis-guides"]);
        assert!(params.tags.is_empty());
        assert_eq!(params.page, 2);
        assert_eq!(params.limit, CONTENT_PAGE_SIZE);
        assert!(params.featured.is_none());
    }
}
