#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the missing migrants explorer.
//!
//! Loads the incident table once, precomputes the cluster hulls, and
//! serves one read-only JSON endpoint per visualization under `/api`.
//! Handlers only parse parameters; every computation lives in the
//! analytics and spatial crates.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use missing_migrants_dataset::{
    Dataset, DatasetError, DatasetHandle, RegionLookup, null_progress, paths,
};
use missing_migrants_spatial::{ClusterConfigError, ClusterGeometry, build_clusters};

/// Errors that can occur while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The incident table failed to load.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The cluster registry failed to load.
    #[error(transparent)]
    Clusters(#[from] ClusterConfigError),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`, default `127.0.0.1`).
    pub bind_addr: String,
    /// Port to bind (`PORT`, default `8080`).
    pub port: u16,
    /// Incident CSV path.
    pub data_path: PathBuf,
    /// Country lookup CSV path.
    pub countries_path: PathBuf,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `MM_DATA_PATH`, and `MM_COUNTRIES_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            bind_addr,
            port,
            data_path: paths::incidents_path(),
            countries_path: paths::countries_path(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Loaded incident table.
    pub dataset: Arc<Dataset>,
    /// Country lookup, if its file was available.
    pub countries: Option<Arc<RegionLookup>>,
    /// Cluster hulls over the full table.
    pub clusters: Arc<Vec<ClusterGeometry>>,
}

impl AppState {
    /// Builds the state and precomputes cluster hulls.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterConfigError`] if the cluster registry fails to load.
    pub fn new(
        dataset: Arc<Dataset>,
        countries: Option<RegionLookup>,
    ) -> Result<Self, ClusterConfigError> {
        let clusters = build_clusters(dataset.incidents())?;
        Ok(Self {
            dataset,
            countries: countries.map(Arc::new),
            clusters: Arc::new(clusters),
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary_handler))
            .route("/columns", web::get().to(handlers::columns))
            .route("/timeseries", web::get().to(handlers::timeseries))
            .route("/histogram", web::get().to(handlers::histogram))
            .route("/demographics", web::get().to(handlers::demographics))
            .route("/causes", web::get().to(handlers::causes))
            .route("/sources", web::get().to(handlers::sources))
            .route("/map", web::get().to(handlers::map))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/clusters", web::get().to(handlers::clusters))
            .route("/clusters/summary", web::get().to(handlers::clusters_summary))
            .route("/countries", web::get().to(handlers::countries)),
    );
}

/// Loads the input files described by `config` into application state.
///
/// A missing or malformed country lookup is logged and skipped; the
/// incident table is required.
///
/// # Errors
///
/// Returns [`ServerError`] if the incident table or cluster registry
/// fails to load.
pub fn load_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let handle = DatasetHandle::new(config.data_path.clone(), null_progress());
    let dataset = handle.get()?;

    let countries = match RegionLookup::load(&config.countries_path) {
        Ok(lookup) => Some(lookup),
        Err(e) => {
            log::warn!(
                "Country lookup unavailable ({}): {e}",
                config.countries_path.display()
            );
            None
        }
    };

    Ok(AppState::new(dataset, countries)?)
}

/// Starts the missing migrants API server.
///
/// Loads the dataset and lookup, then starts the Actix-Web HTTP server.
/// This is a regular async function; the caller provides the async
/// runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError`] if loading fails, or if the HTTP server fails
/// to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = web::Data::new(load_state(&config)?);

    log::info!(
        "Starting server on {}:{} ({} incidents)",
        config.bind_addr,
        config.port,
        state.dataset.len()
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use missing_migrants_dataset::load_incidents_from_reader;
    use serde_json::Value;

    use super::*;

    const SAMPLE: &str = include_str!("../../dataset/fixtures/incidents_sample.csv");
    const COUNTRIES: &str = include_str!("../../dataset/fixtures/countries_sample.csv");

    fn state() -> web::Data<AppState> {
        let dataset = load_incidents_from_reader(SAMPLE.as_bytes(), &null_progress()).unwrap();
        let countries = RegionLookup::from_reader(COUNTRIES.as_bytes()).unwrap();
        web::Data::new(AppState::new(Arc::new(dataset), Some(countries)).unwrap())
    }

    async fn get(uri: &str) -> Value {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_and_read_body_json(&app, req).await
    }

    #[actix_web::test]
    async fn health_reports_row_count() {
        let body = get("/api/health").await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["incidents"], 15);
    }

    #[actix_web::test]
    async fn summary_has_grand_total() {
        let body = get("/api/summary").await;
        assert_eq!(body["totalDeadAndMissing"], 89);
        assert_eq!(body["firstDate"], "2014-01-04");
    }

    #[actix_web::test]
    async fn timeseries_sums_month() {
        let body = get("/api/timeseries?regions=Mediterranean&from=2014-01-01&to=2014-01-31").await;
        assert!(body["advisory"].is_null());
        assert_eq!(body["data"][0]["total"], 25);
        assert_eq!(body["data"][0]["month"], "2014-01-01");
    }

    #[actix_web::test]
    async fn empty_region_param_is_advisory() {
        let body = get("/api/demographics?regions=").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert_eq!(body["advisory"], "Select at least one region to see data");
    }

    #[actix_web::test]
    async fn map_rejects_two_regions() {
        let body = get("/api/map?region=Europe,Caribbean").await;
        assert_eq!(body["advisory"], "Select at most 1 region (currently 2)");
    }

    #[actix_web::test]
    async fn histogram_by_route() {
        let body = get("/api/histogram?column=migration_route").await;
        assert_eq!(body["data"][0]["value"], "Sahara Desert crossing");
    }

    #[actix_web::test]
    async fn histogram_honors_pick() {
        let body = get("/api/histogram?column=region&pick=cause_of_death:Violence").await;
        let values: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|row| row["value"].as_str())
            .collect();
        assert_eq!(values, vec!["North Africa", "Europe"]);
    }

    #[actix_web::test]
    async fn malformed_pick_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/map?pick=Drowning")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn causes_sorted_by_cause() {
        let body = get("/api/causes?regions=Mediterranean,Caribbean&sortCause=Drowning").await;
        assert_eq!(body["data"][0]["region"], "Caribbean");
        assert_eq!(body["data"][0]["percentage"], 100.0);
    }

    #[actix_web::test]
    async fn clusters_are_geojson() {
        let body = get("/api/clusters").await;
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn countries_filtered_by_region() {
        let body = get("/api/countries?region=North%20Africa").await;
        let names: Vec<&str> = body["countries"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["country"].as_str())
            .collect();
        assert_eq!(names, vec!["Libya", "Niger"]);
        assert_eq!(body["countries"][0]["region"], "North Africa");
        assert_eq!(body["unassigned"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn country_param_resolves_its_region() {
        let body = get("/api/countries?country=Libya").await;
        assert_eq!(body["countries"].as_array().unwrap().len(), 1);
        assert_eq!(body["countries"][0]["region"], "North Africa");

        let body = get("/api/countries?country=Atlantis").await;
        assert!(body["countries"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unassigned_country_has_null_region() {
        let body = get("/api/countries").await;
        let countries = body["countries"].as_array().unwrap();
        assert_eq!(countries.len(), 7);
        assert!(countries.iter().any(|c| c["region"].is_null()));
    }
}
