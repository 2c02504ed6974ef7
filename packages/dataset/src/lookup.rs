//! Country → region lookup table.
//!
//! Reads the `country,region` CSV produced by the one-shot preparation
//! step. That step seeds every region with the placeholder `"Null"`, so
//! both the placeholder and the usual null markers mean "unassigned".

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::parsing::normalize_null;

/// Region value the preparation step writes for unassigned countries.
pub const UNASSIGNED_PLACEHOLDER: &str = "Null";

/// Errors that can occur while reading the lookup table.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a required column.
    #[error("Lookup table is missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// Immutable country → region mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionLookup {
    regions: BTreeMap<String, Option<String>>,
}

impl RegionLookup {
    /// Loads the lookup table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the file cannot be read or lacks the
    /// `country`/`region` columns.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        log::info!("Loading country lookup from {}", path.display());
        Self::from_reader(File::open(path)?)
    }

    /// Loads the lookup table from any CSV reader.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the CSV is malformed or lacks the
    /// `country`/`region` columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LookupError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?;
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(LookupError::MissingColumn(name))
        };
        let country_idx = position("country")?;
        let region_idx = position("region")?;

        let mut regions = BTreeMap::new();
        for result in reader.records() {
            let record = result?;
            let Some(country) = record.get(country_idx).and_then(normalize_null) else {
                continue;
            };
            let region = record
                .get(region_idx)
                .and_then(normalize_null)
                .filter(|r| *r != UNASSIGNED_PLACEHOLDER)
                .map(str::to_string);
            regions.insert(country.to_string(), region);
        }

        log::info!("Loaded {} countries", regions.len());
        Ok(Self { regions })
    }

    /// Region assigned to `country`, if any.
    #[must_use]
    pub fn region_for(&self, country: &str) -> Option<&str> {
        self.regions.get(country)?.as_deref()
    }

    /// Whether `country` appears in the table, assigned or not.
    #[must_use]
    pub fn contains(&self, country: &str) -> bool {
        self.regions.contains_key(country)
    }

    /// Countries assigned to `region`, sorted by name.
    #[must_use]
    pub fn countries_in(&self, region: &str) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|(_, r)| r.as_deref() == Some(region))
            .map(|(country, _)| country.as_str())
            .collect()
    }

    /// Countries with no region yet, sorted by name.
    #[must_use]
    pub fn unassigned(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|(_, r)| r.is_none())
            .map(|(country, _)| country.as_str())
            .collect()
    }

    /// Iterates `(country, region)` pairs sorted by country.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.regions
            .iter()
            .map(|(country, region)| (country.as_str(), region.as_deref()))
    }

    /// Number of countries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../fixtures/countries_sample.csv");

    #[test]
    fn maps_countries_to_regions() {
        let lookup = RegionLookup::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(lookup.len(), 7);
        assert_eq!(lookup.region_for("Libya"), Some("North Africa"));
        assert_eq!(lookup.region_for("Atlantis"), None);
    }

    #[test]
    fn placeholder_and_blank_regions_are_unassigned() {
        let lookup = RegionLookup::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(lookup.region_for("Antarctica"), None);
        assert!(lookup.contains("Antarctica"));
        assert!(!lookup.contains("Atlantis"));
        assert_eq!(lookup.unassigned(), vec!["Antarctica", "Greenland"]);
    }

    #[test]
    fn lists_countries_of_a_region() {
        let lookup = RegionLookup::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(lookup.countries_in("North Africa"), vec!["Libya", "Niger"]);
        assert!(lookup.countries_in("Oceania").is_empty());
    }

    #[test]
    fn missing_region_column_is_reported() {
        let err = RegionLookup::from_reader("country\nItaly\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LookupError::MissingColumn("region")));
    }
}
