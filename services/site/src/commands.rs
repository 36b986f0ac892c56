use crate::cli::{SearchArgs, SourceArgs};
use crate::infra::{build_pages, load_config};
use adhd_directory::content::Professional;
use adhd_directory::directory::DirectorySearchParams;
use adhd_directory::error::AppError;
use adhd_directory::feeds::{render_sitemap, rss_feed, sitemap_entries};
use adhd_directory::pagination::{PaginatedResponse, DIRECTORY_PAGE_SIZE};
use chrono::Utc;

pub(crate) async fn print_sitemap(args: SourceArgs) -> Result<(), AppError> {
    let config = load_config(args.fixture)?;
    let pages = build_pages(&config)?;
    let entries = sitemap_entries(pages.directory(), pages.blog(), pages.site(), Utc::now()).await;
    print!("{}", render_sitemap(&entries));
    Ok(())
}

pub(crate) async fn print_rss(args: SourceArgs) -> Result<(), AppError> {
    let config = load_config(args.fixture)?;
    let pages = build_pages(&config)?;
    print!("{}", rss_feed(pages.blog(), pages.site(), Utc::now()).await);
    Ok(())
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        query,
        location,
        services,
        age_groups,
        languages,
        ndis,
        telehealth,
        accepting,
        sort,
        page,
        source,
    } = args;

    let config = load_config(source.fixture)?;
    let pages = build_pages(&config)?;
    let params = DirectorySearchParams {
        query,
        location,
        services,
        age_groups,
        languages,
        ndis_only: ndis,
        telehealth_only: telehealth,
        accepting_new_patients: accepting,
        sort_by: sort,
        page: page.max(1),
        limit: DIRECTORY_PAGE_SIZE,
        ..DirectorySearchParams::default()
    };

    let results = pages.directory().search_professionals(&params).await?;
    print!("{}", format_results(&results));
    Ok(())
}

fn format_results(results: &PaginatedResponse<Professional>) -> String {
    let mut output = String::new();
    for professional in &results.data {
        let services = professional
            .services
            .iter()
            .map(|service| service.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let locality = professional
            .primary_location()
            .map(|location| location.locality())
            .unwrap_or_else(|| "no listed practice".to_string());
        output.push_str(&format!(
            "{:<32} {:<28} {}\n",
            professional.full_name(),
            services,
            locality
        ));
    }
    output.push_str(&format!(
        "page {} of {} ({} professionals)\n",
        results.pagination.page, results.pagination.total_pages, results.pagination.total
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::seeded_pages;
    use adhd_directory::directory::SortBy;

    #[tokio::test]
    async fn search_output_lists_matches_and_totals() {
        let pages = seeded_pages();
        let params = DirectorySearchParams {
            services: vec!["paediatrician".to_string()],
            ndis_only: true,
            sort_by: SortBy::Name,
            ..DirectorySearchParams::default()
        };
        let results = pages
            .directory()
            .search_professionals(&params)
            .await
            .expect("search succeeds");

        let output = format_results(&results);
        assert!(output.contains("Dr Priya Sharma"));
        assert!(output.contains("Parramatta, NSW 2150"));
        assert!(output.ends_with("page 1 of 1 (1 professionals)\n"));
    }

    #[test]
    fn empty_results_still_report_totals() {
        let output = format_results(&PaginatedResponse::empty(DIRECTORY_PAGE_SIZE));
        assert_eq!(output, "page 1 of 0 (0 professionals)\n");
    }
}
