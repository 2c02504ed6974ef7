#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the missing migrants server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics row types so the HTTP contract can evolve on its own.

use chrono::NaiveDate;
use missing_migrants_analytics_models::{
    CategoryPick, ChartResult, DateRange, FilterSpec, ParsePickError,
};
use missing_migrants_incident_models::{CategoricalColumn, Column};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of incidents loaded.
    pub incidents: usize,
}

/// Chart rows plus the reason there are none, if so.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiChart<T> {
    /// Rows to draw; empty when `advisory` is set.
    pub data: Vec<T>,
    /// User-facing "no data" message.
    pub advisory: Option<String>,
}

impl<T> From<ChartResult<Vec<T>>> for ApiChart<T> {
    fn from(result: ChartResult<Vec<T>>) -> Self {
        let (data, advisory) = result.into_parts();
        Self {
            data,
            advisory: advisory.map(|a| a.to_string()),
        }
    }
}

/// One entry of the data dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiColumn {
    /// CSV header text.
    pub header: String,
    /// What the column means.
    pub description: String,
    /// Whether loading fails without it.
    pub required: bool,
    /// Identifier to pass as `column`/`colorBy`, for categorical columns.
    pub categorical: Option<CategoricalColumn>,
}

impl From<Column> for ApiColumn {
    fn from(column: Column) -> Self {
        Self {
            header: column.header().to_string(),
            description: column.description().to_string(),
            required: column.is_required(),
            categorical: CategoricalColumn::all()
                .iter()
                .copied()
                .find(|c| c.column() == column),
        }
    }
}

/// A country and its assigned region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountry {
    pub country: String,
    /// `None` while unassigned.
    pub region: Option<String>,
}

/// Country lookup listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountries {
    /// Countries matching the query.
    pub countries: Vec<ApiCountry>,
    /// Countries with no region yet.
    pub unassigned: Vec<String>,
}

/// Splits a comma-separated region list.
///
/// An empty string is an explicit empty selection.
#[must_use]
pub fn parse_regions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

fn region_filter(regions: Option<&str>) -> FilterSpec {
    FilterSpec {
        regions: regions.map(parse_regions),
        ..FilterSpec::default()
    }
}

/// Adds a `column:value` pick to `spec`, if one was given.
fn with_pick(spec: FilterSpec, pick: Option<&str>) -> Result<FilterSpec, ParsePickError> {
    Ok(match pick {
        Some(pick) => spec.with_pick(pick.parse::<CategoryPick>()?),
        None => spec,
    })
}

/// Query parameters shared by the region-filtered chart endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionQueryParams {
    /// Comma-separated regions; absent means all.
    pub regions: Option<String>,
}

impl RegionQueryParams {
    #[must_use]
    pub fn filter(&self) -> FilterSpec {
        region_filter(self.regions.as_deref())
    }
}

/// Query parameters for `/timeseries`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQueryParams {
    /// Comma-separated regions (at most four).
    pub regions: Option<String>,
    /// First included day (`YYYY-MM-DD`).
    pub from: Option<NaiveDate>,
    /// Last included day (`YYYY-MM-DD`).
    pub to: Option<NaiveDate>,
}

impl TimeSeriesQueryParams {
    /// Builds the filter; a half-open range is closed with `NaiveDate::MIN`
    /// or `NaiveDate::MAX`.
    #[must_use]
    pub fn filter(&self) -> FilterSpec {
        let mut spec = region_filter(self.regions.as_deref());
        if self.from.is_some() || self.to.is_some() {
            spec.date_range = Some(DateRange::new(
                self.from.unwrap_or(NaiveDate::MIN),
                self.to.unwrap_or(NaiveDate::MAX),
            ));
        }
        spec
    }
}

/// Query parameters for `/histogram`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramQueryParams {
    /// Column to count; defaults to region.
    pub column: Option<CategoricalColumn>,
    /// Comma-separated regions.
    pub regions: Option<String>,
    /// Selected pill as `column:value`.
    pub pick: Option<String>,
}

impl HistogramQueryParams {
    /// Builds the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePickError`] if `pick` is malformed.
    pub fn filter(&self) -> Result<FilterSpec, ParsePickError> {
        with_pick(region_filter(self.regions.as_deref()), self.pick.as_deref())
    }
}

/// Query parameters for `/causes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausesQueryParams {
    /// Comma-separated regions (at most fourteen).
    pub regions: Option<String>,
    /// Cause to order regions by.
    pub sort_cause: Option<String>,
}

/// Query parameters for `/sources`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesQueryParams {
    /// Number of sources (default 10).
    pub limit: Option<usize>,
}

/// Query parameters for `/map`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Single region to show; absent shows every region.
    pub region: Option<String>,
    /// Column the point colors follow; defaults to cause of death.
    pub color_by: Option<CategoricalColumn>,
    /// Selected pill as `column:value`.
    pub pick: Option<String>,
}

impl MapQueryParams {
    /// Builds the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePickError`] if `pick` is malformed.
    pub fn filter(&self) -> Result<FilterSpec, ParsePickError> {
        with_pick(region_filter(self.region.as_deref()), self.pick.as_deref())
    }
}

/// Query parameters for `/countries`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountriesQueryParams {
    /// Only list countries of this region.
    pub region: Option<String>,
    /// Only list this country; takes precedence over `region`.
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use missing_migrants_analytics_models::Advisory;

    use super::*;

    #[test]
    fn empty_regions_param_is_explicit_empty_selection() {
        let params = RegionQueryParams {
            regions: Some(String::new()),
        };
        assert_eq!(params.filter().regions, Some(vec![]));
        assert_eq!(RegionQueryParams::default().filter().regions, None);
    }

    #[test]
    fn regions_are_trimmed() {
        assert_eq!(
            parse_regions("Mediterranean, North Africa ,"),
            vec!["Mediterranean", "North Africa"]
        );
    }

    #[test]
    fn half_open_range_is_closed() {
        let params = TimeSeriesQueryParams {
            regions: None,
            from: NaiveDate::from_ymd_opt(2015, 1, 1),
            to: None,
        };
        let range = params.filter().date_range.unwrap();
        assert_eq!(range.to, NaiveDate::MAX);
    }

    #[test]
    fn pick_param_sets_filter_pick() {
        let params = HistogramQueryParams {
            column: None,
            regions: None,
            pick: Some("cause_of_death:Drowning".to_string()),
        };
        let spec = params.filter().unwrap();
        assert_eq!(
            spec.pick,
            Some(CategoryPick::new(CategoricalColumn::CauseOfDeath, "Drowning"))
        );

        let params = MapQueryParams {
            pick: Some("nope".to_string()),
            ..MapQueryParams::default()
        };
        assert!(params.filter().is_err());
    }

    #[test]
    fn chart_advisory_becomes_message() {
        let chart: ApiChart<u32> = ChartResult::Empty(Advisory::EmptySelection).into();
        assert!(chart.data.is_empty());
        assert_eq!(
            chart.advisory.as_deref(),
            Some("Select at least one region to see data")
        );
    }

    #[test]
    fn categorical_columns_are_tagged() {
        let column = ApiColumn::from(Column::CauseOfDeath);
        assert_eq!(column.categorical, Some(CategoricalColumn::CauseOfDeath));
        assert!(ApiColumn::from(Column::Year).categorical.is_none());
        assert!(!ApiColumn::from(Column::Url).required);
    }
}
