#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident table loading and derivation.
//!
//! Reads the Missing Migrants incident CSV once, normalizes null markers,
//! and derives the parsed date, `(lon, lat)` point, and map radius for
//! every row. The resulting [`Dataset`] is immutable and shared by every
//! downstream consumer.

pub mod handle;
pub mod loader;
pub mod lookup;
pub mod parsing;
pub mod paths;
pub mod progress;

use std::collections::BTreeSet;

use missing_migrants_incident_models::{CategoricalColumn, Incident};

pub use handle::DatasetHandle;
pub use loader::{load_incidents, load_incidents_from_reader};
pub use lookup::{LookupError, RegionLookup};
pub use progress::{NullProgress, ProgressCallback, null_progress};

/// Errors that can occur while loading the incident table.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks one or more required columns.
    #[error("Missing required columns: {}", missing.join(", "))]
    Schema {
        /// Canonical names of the absent columns.
        missing: Vec<String>,
    },

    /// A row violates a non-null invariant.
    #[error("Row {row}, column '{column}': {message}")]
    Row {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Canonical column name.
        column: &'static str,
        /// What was wrong with the cell.
        message: String,
    },
}

/// The loaded incident table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    incidents: Vec<Incident>,
}

impl Dataset {
    /// Wraps already-derived incidents, preserving their order.
    #[must_use]
    pub const fn new(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }

    /// All incidents in source order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Distinct regions, sorted.
    #[must_use]
    pub fn regions(&self) -> Vec<String> {
        self.incidents
            .iter()
            .map(|i| i.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct non-null values of a categorical column, sorted.
    #[must_use]
    pub fn distinct_values(&self, column: CategoricalColumn) -> Vec<String> {
        self.incidents
            .iter()
            .filter_map(|i| i.categorical(column))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
