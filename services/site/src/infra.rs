use adhd_directory::config::{AppConfig, StoreConfig};
use adhd_directory::error::AppError;
use adhd_directory::pages::PageComposer;
use adhd_directory::store::{Collection, InMemoryStore, RecordStore, UnconfiguredStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

/// Page composer over whichever store the process was configured with.
pub(crate) type SitePages = PageComposer<dyn RecordStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration from the environment, letting a `--fixture` flag win.
pub(crate) fn load_config(fixture: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = fixture {
        config.store.fixture_path = Some(path);
    }
    Ok(config)
}

/// A configured fixture must load; without one every read fails and pages
/// render their empty states.
pub(crate) fn build_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, AppError> {
    match &config.fixture_path {
        Some(path) => {
            let store = InMemoryStore::from_path(path)?;
            info!(
                path = %path.display(),
                professionals = store.rows(Collection::Professionals).len(),
                posts = store.rows(Collection::BlogPosts).len(),
                "record store seeded from fixture"
            );
            Ok(Arc::new(store))
        }
        None => {
            warn!("STORE_FIXTURE_PATH not set; serving without a record store");
            Ok(Arc::new(UnconfiguredStore))
        }
    }
}

pub(crate) fn build_pages(config: &AppConfig) -> Result<SitePages, AppError> {
    let store = build_store(&config.store)?;
    Ok(PageComposer::new(store, config.site.clone()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use adhd_directory::config::SiteConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;

    pub(crate) const SEED: &str = include_str!("../fixtures/seed.json");

    pub(crate) fn seeded_pages() -> SitePages {
        let store: Arc<dyn RecordStore> =
            Arc::new(InMemoryStore::from_fixture_json(SEED).expect("seed fixture parses"));
        PageComposer::new(store, SiteConfig::default())
    }

    pub(crate) fn unconfigured_pages() -> SitePages {
        let store: Arc<dyn RecordStore> = Arc::new(UnconfiguredStore);
        PageComposer::new(store, SiteConfig::default())
    }

    pub(crate) fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fixture_path_falls_back_to_unconfigured_store() {
        let store = build_store(&StoreConfig { fixture_path: None });
        assert!(store.is_ok());
    }

    #[test]
    fn unreadable_fixture_is_a_startup_error() {
        let config = StoreConfig {
            fixture_path: Some(PathBuf::from("/nonexistent/adhd-seed.json")),
        };
        let err = build_store(&config).err().expect("missing file rejected");
        assert!(matches!(err, AppError::Fixture(_)));
    }
}
