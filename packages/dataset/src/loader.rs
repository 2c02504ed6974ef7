//! Reads the incident CSV into [`Incident`] rows.
//!
//! The header row is resolved against the closed [`Column`] set first, so a
//! file missing any required column fails before a single row is read.
//! Rows are never dropped: unparseable optional cells become `None` and
//! each consumer decides what to do with them.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;
use missing_migrants_incident_models::{Column, Incident};

use crate::parsing::{
    extract_date_token, normalize_null, parse_coordinates, parse_count, parse_incident_date,
    parse_year, radius,
};
use crate::progress::ProgressCallback;
use crate::{Dataset, DatasetError};

/// Maps each projected [`Column`] to its index in the CSV header.
struct Projection {
    indices: BTreeMap<Column, usize>,
}

impl Projection {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let mut indices = BTreeMap::new();
        let mut missing = Vec::new();

        for column in Column::all() {
            match headers.iter().position(|h| column.matches_header(h)) {
                Some(index) => {
                    indices.insert(*column, index);
                }
                None if column.is_required() => missing.push(column.header().to_string()),
                None => log::debug!("Optional column '{}' not present", column.header()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(DatasetError::Schema { missing })
        }
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: Column) -> Option<&'r str> {
        let index = *self.indices.get(&column)?;
        record.get(index).and_then(normalize_null)
    }

    fn text(&self, record: &StringRecord, column: Column) -> Option<String> {
        self.cell(record, column).map(str::to_string)
    }

    /// An optional count; unparseable values become `None`.
    fn count(&self, record: &StringRecord, column: Column, row: usize) -> Option<u32> {
        let cell = self.cell(record, column)?;
        let value = parse_count(cell);
        if value.is_none() {
            log::debug!("Row {row}: ignoring unparseable {} '{cell}'", column.header());
        }
        value
    }

    fn read(&self, record: &StringRecord, row: usize) -> Result<Incident, DatasetError> {
        let region = self
            .text(record, Column::Region)
            .ok_or_else(|| row_error(row, Column::Region, "missing value"))?;

        let year_cell = self
            .cell(record, Column::Year)
            .ok_or_else(|| row_error(row, Column::Year, "missing value"))?;
        let year = parse_year(year_cell)
            .ok_or_else(|| row_error(row, Column::Year, &format!("not a year: '{year_cell}'")))?;

        let total_cell = self
            .cell(record, Column::TotalDeadAndMissing)
            .ok_or_else(|| row_error(row, Column::TotalDeadAndMissing, "missing value"))?;
        let total_dead_and_missing = parse_count(total_cell).ok_or_else(|| {
            row_error(
                row,
                Column::TotalDeadAndMissing,
                &format!("not a non-negative count: '{total_cell}'"),
            )
        })?;

        let incident_date_raw = self
            .cell(record, Column::IncidentDate)
            .map(|raw| extract_date_token(raw).to_string());
        let incident_date = incident_date_raw.as_deref().and_then(parse_incident_date);
        if incident_date.is_none() {
            log::debug!("Row {row}: unparseable incident date {incident_date_raw:?}");
        }

        let coordinates_raw = self.text(record, Column::Coordinates);
        let coordinates = coordinates_raw.as_deref().and_then(parse_coordinates);
        if coordinates_raw.is_some() && coordinates.is_none() {
            log::debug!("Row {row}: unparseable coordinates {coordinates_raw:?}");
        }

        Ok(Incident {
            region,
            incident_date_raw,
            incident_date,
            year,
            reported_month: self.text(record, Column::ReportedMonth).unwrap_or_default(),
            number_dead: self.count(record, Column::NumberDead, row),
            minimum_estimated_missing: self.count(record, Column::MinimumEstimatedMissing, row),
            total_dead_and_missing,
            number_survivors: self.count(record, Column::NumberSurvivors, row),
            number_females: self.count(record, Column::NumberFemales, row),
            number_males: self.count(record, Column::NumberMales, row),
            number_children: self.count(record, Column::NumberChildren, row),
            cause_of_death: self.text(record, Column::CauseOfDeath),
            migration_route: self.text(record, Column::MigrationRoute),
            unsd_grouping: self.text(record, Column::UnsdGrouping),
            source_url: self.text(record, Column::Url),
            coordinates_raw,
            coordinates,
            radius: radius(total_dead_and_missing),
        })
    }
}

fn row_error(row: usize, column: Column, message: &str) -> DatasetError {
    DatasetError::Row {
        row,
        column: column.header(),
        message: message.to_string(),
    }
}

/// Loads the incident table from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read, a required column
/// is missing, or a row violates the region/year/total invariants.
pub fn load_incidents(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, DatasetError> {
    log::info!("Loading incidents from {}", path.display());
    let file = File::open(path)?;
    load_incidents_from_reader(file, progress)
}

/// Loads the incident table from any CSV reader.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed, a required column is
/// missing, or a row violates the region/year/total invariants.
pub fn load_incidents_from_reader<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let projection = Projection::resolve(reader.headers()?)?;

    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
    progress.set_total(records.len() as u64);

    let mut incidents = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        incidents.push(projection.read(record, i + 1)?);
        progress.inc(1);
    }

    let undated = incidents
        .iter()
        .filter(|i| i.incident_date.is_none())
        .count();
    let unplaced = incidents.iter().filter(|i| i.coordinates.is_none()).count();
    log::info!(
        "Loaded {} incidents ({undated} without a parseable date, {unplaced} without coordinates)",
        incidents.len()
    );
    progress.finish(format!("Loaded {} incidents", incidents.len()));

    Ok(Dataset::new(incidents))
}
