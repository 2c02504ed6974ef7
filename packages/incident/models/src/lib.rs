#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record and column taxonomy for the missing migrants dataset.
//!
//! This crate defines the canonical [`Incident`] row shared across the
//! whole workspace, the closed set of CSV [`Column`]s the loader projects,
//! and the [`CategoricalColumn`] enumeration callers use to pick a column
//! for histograms, colors, and selection pills.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A geographic point in `(longitude, latitude)` order.
///
/// The source file stores coordinates as `"<lat>, <lon>"`; every consumer
/// of this type expects the inverted order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LonLat {
    /// Creates a point from longitude and latitude.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// One recorded migration-related fatality or disappearance event.
///
/// Raw fields mirror the CSV columns; `incident_date`, `coordinates` and
/// `radius` are derived once at load time and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Coarse geographic grouping (never empty).
    pub region: String,
    /// Incident date text, reduced to its `"<weekday>, MM/DD/YYYY"` token
    /// when that token is present.
    pub incident_date_raw: Option<String>,
    /// Parsed incident date, `None` when the raw text does not parse.
    pub incident_date: Option<NaiveDate>,
    /// Year of the incident.
    pub year: i32,
    /// Month name as reported (e.g. `"Jan"`).
    pub reported_month: String,
    /// Number of confirmed dead.
    pub number_dead: Option<u32>,
    /// Minimum estimated number of missing.
    pub minimum_estimated_missing: Option<u32>,
    /// Dead plus missing; authoritative when the parts are absent.
    pub total_dead_and_missing: u32,
    /// Number of survivors.
    pub number_survivors: Option<u32>,
    /// Number of females dead or missing.
    pub number_females: Option<u32>,
    /// Number of males dead or missing.
    pub number_males: Option<u32>,
    /// Number of children dead or missing.
    pub number_children: Option<u32>,
    /// Circumstances that led to the death.
    pub cause_of_death: Option<String>,
    /// Named migration route, if known.
    pub migration_route: Option<String>,
    /// UNSD geoscheme region.
    pub unsd_grouping: Option<String>,
    /// Source article URL.
    pub source_url: Option<String>,
    /// Coordinates exactly as stored (`"<lat>, <lon>"`).
    pub coordinates_raw: Option<String>,
    /// Parsed coordinates in `(lon, lat)` order.
    pub coordinates: Option<LonLat>,
    /// `sqrt(total_dead_and_missing)`, a relative point-size weight.
    pub radius: f64,
}

impl Incident {
    /// Returns the value of a categorical column for this row.
    #[must_use]
    pub fn categorical(&self, column: CategoricalColumn) -> Option<&str> {
        match column {
            CategoricalColumn::Region => Some(self.region.as_str()),
            CategoricalColumn::CauseOfDeath => self.cause_of_death.as_deref(),
            CategoricalColumn::MigrationRoute => self.migration_route.as_deref(),
            CategoricalColumn::UnsdGrouping => self.unsd_grouping.as_deref(),
        }
    }
}

/// Every CSV column the loader projects from the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// `Region`
    Region,
    /// `Incident Date`
    IncidentDate,
    /// `Year`
    Year,
    /// `Reported Month`
    ReportedMonth,
    /// `Number Dead`
    NumberDead,
    /// `Minimum Estimated Number of Missing`
    MinimumEstimatedMissing,
    /// `Total Number of Dead and Missing`
    TotalDeadAndMissing,
    /// `Number of Survivors`
    NumberSurvivors,
    /// `Number of Females`
    NumberFemales,
    /// `Number of Males`
    NumberMales,
    /// `Number of Children`
    NumberChildren,
    /// `Cause of Death`
    CauseOfDeath,
    /// `Coordinates`
    Coordinates,
    /// `Migration route`
    MigrationRoute,
    /// `UNSD Geographical Grouping`
    UnsdGrouping,
    /// `URL`
    Url,
}

impl Column {
    /// Canonical header text in the source CSV.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::IncidentDate => "Incident Date",
            Self::Year => "Year",
            Self::ReportedMonth => "Reported Month",
            Self::NumberDead => "Number Dead",
            Self::MinimumEstimatedMissing => "Minimum Estimated Number of Missing",
            Self::TotalDeadAndMissing => "Total Number of Dead and Missing",
            Self::NumberSurvivors => "Number of Survivors",
            Self::NumberFemales => "Number of Females",
            Self::NumberMales => "Number of Males",
            Self::NumberChildren => "Number of Children",
            Self::CauseOfDeath => "Cause of Death",
            Self::Coordinates => "Coordinates",
            Self::MigrationRoute => "Migration route",
            Self::UnsdGrouping => "UNSD Geographical Grouping",
            Self::Url => "URL",
        }
    }

    /// Alternative spellings found in published exports of the dataset.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MigrationRoute => &["Migrantion route"],
            _ => &[],
        }
    }

    /// Whether loading must fail when this column is absent.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Url)
    }

    /// Returns `true` if `header` names this column (canonical or alias).
    #[must_use]
    pub fn matches_header(self, header: &str) -> bool {
        let header = header.trim();
        header == self.header() || self.aliases().contains(&header)
    }

    /// One-line description of the column's meaning.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Region => "Region in which the incident took place.",
            Self::IncidentDate => {
                "Estimated date of death: when the bodies were found or the date reported by witnesses."
            }
            Self::Year => "Year in which the incident occurred.",
            Self::ReportedMonth => "Month in which the incident occurred.",
            Self::NumberDead => {
                "Number of people confirmed dead in the incident, i.e. bodies recovered. Empty when migrants are missing and presumed dead."
            }
            Self::MinimumEstimatedMissing => {
                "Number of people missing and presumed dead, usually recorded for shipwrecks."
            }
            Self::TotalDeadAndMissing => "Sum of the number dead and the number missing.",
            Self::NumberSurvivors => "Number of migrants who survived the incident, if known.",
            Self::NumberFemales => "Number of females found dead or missing, if known.",
            Self::NumberMales => "Number of males found dead or missing, if known.",
            Self::NumberChildren => {
                "Number of individuals under 18 found dead or missing, if known."
            }
            Self::CauseOfDeath => {
                "Circumstances of the event that produced the fatal injury, if known."
            }
            Self::Coordinates => {
                "Place where the death occurred or where the bodies were found. Often estimated, especially in the Mediterranean."
            }
            Self::MigrationRoute => "Name of the migrant route on which the incident occurred, if known.",
            Self::UnsdGrouping => {
                "Geographical region of the incident as designated by the UNSD geoscheme."
            }
            Self::Url => "Link to the source reporting the incident.",
        }
    }

    /// Returns all variants of this enum, in CSV projection order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Region,
            Self::IncidentDate,
            Self::Year,
            Self::ReportedMonth,
            Self::NumberDead,
            Self::MinimumEstimatedMissing,
            Self::TotalDeadAndMissing,
            Self::NumberSurvivors,
            Self::NumberFemales,
            Self::NumberMales,
            Self::NumberChildren,
            Self::CauseOfDeath,
            Self::Coordinates,
            Self::MigrationRoute,
            Self::UnsdGrouping,
            Self::Url,
        ]
    }
}

/// Columns a user can pick for categorical views (histograms, map colors,
/// selection pills).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoricalColumn {
    /// Coarse region.
    Region,
    /// Cause of death.
    CauseOfDeath,
    /// Migration route.
    MigrationRoute,
    /// UNSD geoscheme grouping.
    UnsdGrouping,
}

impl CategoricalColumn {
    /// The underlying CSV column.
    #[must_use]
    pub const fn column(self) -> Column {
        match self {
            Self::Region => Column::Region,
            Self::CauseOfDeath => Column::CauseOfDeath,
            Self::MigrationRoute => Column::MigrationRoute,
            Self::UnsdGrouping => Column::UnsdGrouping,
        }
    }

    /// Human-readable label (the CSV header).
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.column().header()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Region,
            Self::CauseOfDeath,
            Self::MigrationRoute,
            Self::UnsdGrouping,
        ]
    }
}

/// Demographic slices of a region's dead and missing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DemographicCategory {
    /// Summed `Number of Males`.
    Male,
    /// Summed `Number of Females`.
    Female,
    /// Summed `Number of Children`.
    Children,
    /// Total minus the three known slices. May be negative.
    Unknown,
}

impl DemographicCategory {
    /// Returns all variants in emission order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Male, Self::Female, Self::Children, Self::Unknown]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_column_header_is_unique() {
        let mut headers: Vec<&str> = Column::all().iter().map(|c| c.header()).collect();
        headers.sort_unstable();
        headers.dedup();
        assert_eq!(headers.len(), Column::all().len());
    }

    #[test]
    fn only_url_is_optional() {
        let optional: Vec<Column> = Column::all()
            .iter()
            .copied()
            .filter(|c| !c.is_required())
            .collect();
        assert_eq!(optional, vec![Column::Url]);
    }

    #[test]
    fn route_column_accepts_misspelt_header() {
        assert!(Column::MigrationRoute.matches_header("Migrantion route"));
        assert!(Column::MigrationRoute.matches_header(" Migration route "));
        assert!(!Column::MigrationRoute.matches_header("Route"));
    }

    #[test]
    fn categorical_column_parses_from_snake_case() {
        let column: CategoricalColumn = "cause_of_death".parse().unwrap();
        assert_eq!(column, CategoricalColumn::CauseOfDeath);
        assert_eq!(CategoricalColumn::MigrationRoute.to_string(), "migration_route");
        assert!("Cause of Death".parse::<CategoricalColumn>().is_err());
    }

    #[test]
    fn categorical_value_reads_matching_field() {
        let incident = Incident {
            region: "Mediterranean".to_string(),
            cause_of_death: Some("Drowning".to_string()),
            ..Incident::default()
        };
        assert_eq!(
            incident.categorical(CategoricalColumn::Region),
            Some("Mediterranean")
        );
        assert_eq!(
            incident.categorical(CategoricalColumn::CauseOfDeath),
            Some("Drowning")
        );
        assert_eq!(incident.categorical(CategoricalColumn::MigrationRoute), None);
    }

    #[test]
    fn demographic_categories_in_emission_order() {
        let names: Vec<String> = DemographicCategory::all()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["Male", "Female", "Children", "Unknown"]);
    }
}
