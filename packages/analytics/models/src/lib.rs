#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter specifications and chart-ready result rows.
//!
//! Every visualization takes a [`FilterSpec`], runs it through the filter
//! evaluator, and returns a [`ChartResult`]: either rows of one of the
//! types below, or an [`Advisory`] explaining why there is nothing to
//! draw. Advisories are outcomes, not errors.

use chrono::{Datelike as _, NaiveDate};
use missing_migrants_incident_models::{CategoricalColumn, DemographicCategory};
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First included day.
    pub from: NaiveDate,
    /// Last included day.
    pub to: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Whether `from` is after `to`.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.from > self.to
    }

    /// Whether `date` lies within the range, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A selected categorical "pill": keep rows whose `column` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPick {
    /// Column the pill belongs to.
    pub column: CategoricalColumn,
    /// Selected value.
    pub value: String,
}

impl CategoryPick {
    #[must_use]
    pub fn new(column: CategoricalColumn, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Errors that can occur while parsing a `column:value` pick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePickError {
    /// No `:` separates the column from the value.
    #[error("Expected 'column:value', got '{0}'")]
    MissingSeparator(String),

    /// The column is not a categorical column.
    #[error("Unknown categorical column '{0}'")]
    UnknownColumn(String),

    /// Nothing follows the `:`.
    #[error("Missing value for column '{0}'")]
    EmptyValue(String),
}

impl std::str::FromStr for CategoryPick {
    type Err = ParsePickError;

    /// Parses `"<column>:<value>"`, e.g. `"cause_of_death:Drowning"`.
    ///
    /// Only the first `:` separates; the value may contain more.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once(':')
            .ok_or_else(|| ParsePickError::MissingSeparator(s.to_string()))?;
        let column = column.trim();
        let parsed = column
            .parse::<CategoricalColumn>()
            .map_err(|_| ParsePickError::UnknownColumn(column.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(ParsePickError::EmptyValue(column.to_string()));
        }
        Ok(Self::new(parsed, value))
    }
}

/// The user's current selection.
///
/// `regions: None` means "no region filter"; `Some(vec![])` is an explicit
/// empty selection and short-circuits to [`Advisory::EmptySelection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Selected regions, if the view filters by region.
    pub regions: Option<Vec<String>>,
    /// Inclusive incident-date range.
    pub date_range: Option<DateRange>,
    /// Selected categorical pill.
    pub pick: Option<CategoryPick>,
}

impl FilterSpec {
    /// A spec that keeps every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    #[must_use]
    pub fn with_pick(mut self, pick: CategoryPick) -> Self {
        self.pick = Some(pick);
        self
    }

    /// Number of distinct selected regions, `None` when unfiltered.
    #[must_use]
    pub fn selected_region_count(&self) -> Option<usize> {
        self.regions.as_ref().map(|regions| {
            let mut distinct: Vec<&str> = regions.iter().map(String::as_str).collect();
            distinct.sort_unstable();
            distinct.dedup();
            distinct.len()
        })
    }
}

/// Which visualization a filter feeds. Fixes the region-selection limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Monthly time series of dead and missing.
    TimeSeries,
    /// Categorical frequency histogram.
    Histogram,
    /// Demographic stacked bars.
    Demographics,
    /// Cause-of-death percentage bars.
    CauseOfDeath,
    /// Top reporting sources.
    Sources,
    /// Single-region point map.
    RegionMap,
    /// Year × region heatmap.
    Heatmap,
}

impl ChartKind {
    /// Maximum number of regions the chart accepts, if limited.
    #[must_use]
    pub const fn max_regions(self) -> Option<usize> {
        match self {
            Self::TimeSeries => Some(4),
            Self::CauseOfDeath => Some(14),
            Self::RegionMap => Some(1),
            Self::Histogram | Self::Demographics | Self::Sources | Self::Heatmap => None,
        }
    }
}

/// Why a chart has nothing to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Advisory {
    /// The user deselected every region.
    EmptySelection,
    /// The filters matched no rows.
    NoMatchingRows,
    /// More regions were selected than the chart supports.
    TooManyRegions {
        /// Chart limit.
        max: usize,
        /// Regions selected.
        selected: usize,
    },
    /// The date range starts after it ends.
    InvalidDateRange {
        /// Requested start.
        from: NaiveDate,
        /// Requested end.
        to: NaiveDate,
    },
    /// A cluster matched too few located rows to form a polygon.
    InsufficientPoints {
        /// Cluster id.
        cluster: String,
        /// Distinct located points found.
        found: usize,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "Select at least one region to see data"),
            Self::NoMatchingRows => write!(f, "No incidents match the current selection"),
            Self::TooManyRegions { max, selected } => write!(
                f,
                "Select at most {max} region{} (currently {selected})",
                if *max == 1 { "" } else { "s" }
            ),
            Self::InvalidDateRange { from, to } => {
                write!(f, "Start date {from} is after end date {to}")
            }
            Self::InsufficientPoints { cluster, found } => write!(
                f,
                "Cluster '{cluster}' has {found} distinct location(s); at least 3 non-collinear are needed"
            ),
        }
    }
}

/// Outcome of one visualization request.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartResult<T> {
    /// Rows to draw.
    Data(T),
    /// Nothing to draw, and why.
    Empty(Advisory),
}

impl<T> ChartResult<T> {
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Empty(_) => None,
        }
    }

    #[must_use]
    pub const fn advisory(&self) -> Option<&Advisory> {
        match self {
            Self::Data(_) => None,
            Self::Empty(advisory) => Some(advisory),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    /// Transforms the rows, keeping any advisory.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ChartResult<U> {
        match self {
            Self::Data(data) => ChartResult::Data(f(data)),
            Self::Empty(advisory) => ChartResult::Empty(advisory),
        }
    }

    /// Splits into rows (default when empty) and the advisory, if any.
    pub fn into_parts(self) -> (T, Option<Advisory>)
    where
        T: Default,
    {
        match self {
            Self::Data(data) => (data, None),
            Self::Empty(advisory) => (T::default(), Some(advisory)),
        }
    }
}

/// Dead and missing in one region during one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRegionTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub region: String,
    /// Summed `Total Number of Dead and Missing`.
    pub total: u64,
    /// Incidents contributing to `total`.
    pub incidents: usize,
}

impl MonthlyRegionTotal {
    /// Mean dead and missing per incident.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        if self.incidents == 0 {
            0.0
        } else {
            self.total as f64 / self.incidents as f64
        }
    }

    /// Label like `"2014-01"`.
    #[must_use]
    pub fn month_label(&self) -> String {
        format!("{:04}-{:02}", self.month.year(), self.month.month())
    }
}

/// One demographic slice of a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicRow {
    pub region: String,
    pub category: DemographicCategory,
    /// Summed count; negative only for [`DemographicCategory::Unknown`].
    pub count: i64,
    /// Region's total dead and missing.
    pub total: i64,
}

/// Share of a region's incidents attributed to one cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseShare {
    pub region: String,
    pub cause: String,
    /// Incidents with this cause.
    pub count: usize,
    /// `count` over the region's incidents with a known cause, × 100.
    pub percentage: f64,
}

/// How often a source URL is cited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCount {
    pub url: String,
    pub count: usize,
}

/// Frequency of one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Color assigned to a categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryColor {
    pub value: String,
    /// Hex color (`#rrggbb`).
    pub color: String,
}

/// One located incident on a point map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub lon: f64,
    pub lat: f64,
    /// Relative point size.
    pub radius: f64,
    pub region: String,
    pub total: u32,
    /// Value of the color-by column, if the row has one.
    pub category: Option<String>,
    /// Hex color of `category`.
    pub color: Option<String>,
}

/// Dead and missing in one region during one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub year: i32,
    pub region: String,
    pub total: u64,
}

/// Headline figures for the introduction page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Number of incident rows.
    pub incidents: usize,
    /// Grand total dead and missing.
    pub total_dead_and_missing: u64,
    /// Distinct regions, sorted.
    pub regions: Vec<String>,
    /// Earliest parsed incident date.
    pub first_date: Option<NaiveDate>,
    /// Latest parsed incident date.
    pub last_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pick_parses_column_and_value() {
        let pick: CategoryPick = "cause_of_death: Drowning".parse().unwrap();
        assert_eq!(pick, CategoryPick::new(CategoricalColumn::CauseOfDeath, "Drowning"));

        let pick: CategoryPick = "migration_route:Route: A".parse().unwrap();
        assert_eq!(pick.value, "Route: A");
    }

    #[test]
    fn malformed_picks_are_rejected() {
        assert_eq!(
            "Drowning".parse::<CategoryPick>(),
            Err(ParsePickError::MissingSeparator("Drowning".to_string()))
        );
        assert_eq!(
            "year:2014".parse::<CategoryPick>(),
            Err(ParsePickError::UnknownColumn("year".to_string()))
        );
        assert_eq!(
            "region:".parse::<CategoryPick>(),
            Err(ParsePickError::EmptyValue("region".to_string()))
        );
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(date(2014, 1, 1), date(2014, 1, 31));
        assert!(range.contains(date(2014, 1, 1)));
        assert!(range.contains(date(2014, 1, 31)));
        assert!(!range.contains(date(2014, 2, 1)));
        assert!(!range.is_reversed());
        assert!(DateRange::new(date(2015, 1, 1), date(2014, 1, 1)).is_reversed());
    }

    #[test]
    fn chart_limits() {
        assert_eq!(ChartKind::TimeSeries.max_regions(), Some(4));
        assert_eq!(ChartKind::CauseOfDeath.max_regions(), Some(14));
        assert_eq!(ChartKind::RegionMap.max_regions(), Some(1));
        assert_eq!(ChartKind::Heatmap.max_regions(), None);
    }

    #[test]
    fn selected_region_count_ignores_duplicates() {
        let spec = FilterSpec::all().with_regions(["Europe", "Europe", "Caribbean"]);
        assert_eq!(spec.selected_region_count(), Some(2));
        assert_eq!(FilterSpec::all().selected_region_count(), None);
    }

    #[test]
    fn advisory_messages() {
        assert_eq!(
            Advisory::TooManyRegions { max: 4, selected: 6 }.to_string(),
            "Select at most 4 regions (currently 6)"
        );
        assert_eq!(
            Advisory::TooManyRegions { max: 1, selected: 2 }.to_string(),
            "Select at most 1 region (currently 2)"
        );
    }

    #[test]
    fn empty_result_splits_into_default_rows() {
        let result: ChartResult<Vec<u32>> = ChartResult::Empty(Advisory::EmptySelection);
        let (rows, advisory) = result.into_parts();
        assert!(rows.is_empty());
        assert_eq!(advisory, Some(Advisory::EmptySelection));
    }

    #[test]
    fn monthly_mean_divides_by_incidents() {
        let row = MonthlyRegionTotal {
            month: date(2014, 1, 1),
            region: "Mediterranean".to_string(),
            total: 25,
            incidents: 2,
        };
        assert!((row.mean() - 12.5).abs() < f64::EPSILON);
        assert_eq!(row.month_label(), "2014-01");
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = DatasetSummary {
            incidents: 1,
            total_dead_and_missing: 3,
            regions: vec!["Europe".to_string()],
            first_date: None,
            last_date: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalDeadAndMissing"], 3);
        assert!(json["firstDate"].is_null());
    }
}
