//! HTTP handler functions for the missing migrants API.

use actix_web::{HttpResponse, web};
use missing_migrants_analytics::{charts, summary};
use missing_migrants_analytics_models::{ChartResult, FilterSpec};
use missing_migrants_incident_models::{CategoricalColumn, Column};
use missing_migrants_server_models::{
    ApiChart, ApiColumn, ApiCountries, ApiCountry, ApiHealth, CausesQueryParams,
    CountriesQueryParams, HistogramQueryParams, MapQueryParams, RegionQueryParams,
    SourcesQueryParams, TimeSeriesQueryParams, parse_regions,
};
use missing_migrants_spatial::{ClusterSummary, to_feature_collection};
use serde::Serialize;

use crate::AppState;

/// Default number of sources returned by `/sources`.
const DEFAULT_SOURCE_LIMIT: usize = 10;

fn chart<T: Serialize>(endpoint: &str, result: ChartResult<Vec<T>>) -> HttpResponse {
    if let Some(advisory) = result.advisory() {
        log::warn!("{endpoint}: {advisory}");
    }
    HttpResponse::Ok().json(ApiChart::from(result))
}

fn bad_request(error: &impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": error.to_string() }))
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        incidents: state.dataset.len(),
    })
}

/// `GET /api/summary`
///
/// Row count, grand total, regions, and date bounds.
pub async fn summary_handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(summary(state.dataset.incidents()))
}

/// `GET /api/columns`
///
/// The data dictionary.
pub async fn columns() -> HttpResponse {
    let columns: Vec<ApiColumn> = Column::all().iter().copied().map(ApiColumn::from).collect();
    HttpResponse::Ok().json(columns)
}

/// `GET /api/timeseries`
pub async fn timeseries(
    state: web::Data<AppState>,
    params: web::Query<TimeSeriesQueryParams>,
) -> HttpResponse {
    chart(
        "timeseries",
        charts::time_series(state.dataset.incidents(), &params.filter()),
    )
}

/// `GET /api/histogram`
pub async fn histogram(
    state: web::Data<AppState>,
    params: web::Query<HistogramQueryParams>,
) -> HttpResponse {
    let spec = match params.filter() {
        Ok(spec) => spec,
        Err(e) => return bad_request(&e),
    };
    let column = params.column.unwrap_or(CategoricalColumn::Region);
    chart(
        "histogram",
        charts::histogram(state.dataset.incidents(), &spec, column),
    )
}

/// `GET /api/demographics`
pub async fn demographics(
    state: web::Data<AppState>,
    params: web::Query<RegionQueryParams>,
) -> HttpResponse {
    chart(
        "demographics",
        charts::demographics(state.dataset.incidents(), &params.filter()),
    )
}

/// `GET /api/causes`
pub async fn causes(
    state: web::Data<AppState>,
    params: web::Query<CausesQueryParams>,
) -> HttpResponse {
    let spec = RegionQueryParams {
        regions: params.regions.clone(),
    }
    .filter();
    chart(
        "causes",
        charts::causes(
            state.dataset.incidents(),
            &spec,
            params.sort_cause.as_deref(),
        ),
    )
}

/// `GET /api/sources`
pub async fn sources(
    state: web::Data<AppState>,
    params: web::Query<SourcesQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(DEFAULT_SOURCE_LIMIT);
    chart(
        "sources",
        charts::sources(state.dataset.incidents(), &FilterSpec::all(), limit),
    )
}

/// `GET /api/map`
pub async fn map(state: web::Data<AppState>, params: web::Query<MapQueryParams>) -> HttpResponse {
    let spec = match params.filter() {
        Ok(spec) => spec,
        Err(e) => return bad_request(&e),
    };
    let color_by = params.color_by.unwrap_or(CategoricalColumn::CauseOfDeath);
    chart(
        "map",
        charts::region_map(state.dataset.incidents(), &spec, color_by),
    )
}

/// `GET /api/heatmap`
pub async fn heatmap(
    state: web::Data<AppState>,
    params: web::Query<RegionQueryParams>,
) -> HttpResponse {
    chart(
        "heatmap",
        charts::heatmap(state.dataset.incidents(), &params.filter()),
    )
}

/// `GET /api/clusters`
///
/// Cluster hulls as a `GeoJSON` `FeatureCollection`.
pub async fn clusters(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(to_feature_collection(&state.clusters))
}

/// `GET /api/clusters/summary`
pub async fn clusters_summary(state: web::Data<AppState>) -> HttpResponse {
    let summaries: Vec<ClusterSummary> = state.clusters.iter().map(|c| c.summary()).collect();
    HttpResponse::Ok().json(summaries)
}

/// `GET /api/countries`
///
/// Lists the country lookup, optionally restricted to one region or one
/// country.
pub async fn countries(
    state: web::Data<AppState>,
    params: web::Query<CountriesQueryParams>,
) -> HttpResponse {
    let Some(lookup) = state.countries.as_deref() else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "Country lookup is not loaded"
        }));
    };

    let countries = if let Some(country) = params.country.as_deref().map(str::trim) {
        if lookup.contains(country) {
            vec![ApiCountry {
                country: country.to_string(),
                region: lookup.region_for(country).map(str::to_string),
            }]
        } else {
            vec![]
        }
    } else if let Some(region) = params
        .region
        .as_deref()
        .and_then(|r| parse_regions(r).into_iter().next())
    {
        lookup
            .countries_in(&region)
            .into_iter()
            .map(|country| ApiCountry {
                country: country.to_string(),
                region: Some(region.clone()),
            })
            .collect()
    } else {
        lookup
            .iter()
            .map(|(country, region)| ApiCountry {
                country: country.to_string(),
                region: region.map(str::to_string),
            })
            .collect()
    };

    HttpResponse::Ok().json(ApiCountries {
        countries,
        unassigned: lookup.unassigned().into_iter().map(str::to_string).collect(),
    })
}
