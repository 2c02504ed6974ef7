//! Group-by summaries over a filtered subset.
//!
//! Every function is deterministic, allocates a fresh result, and leaves
//! its input untouched. Ordering rules are part of each contract.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike as _, NaiveDate};
use missing_migrants_analytics_models::{
    CategoryCount, CauseShare, DatasetSummary, DemographicRow, HeatmapCell, MapPoint,
    MonthlyRegionTotal, SourceCount,
};
use missing_migrants_incident_models::{CategoricalColumn, DemographicCategory, Incident};

use crate::color::ColorAssignment;

/// Sums dead and missing per (month, region), sorted by month then region.
///
/// Rows without a parsed date are skipped.
#[must_use]
pub fn monthly_region_totals(rows: &[&Incident]) -> Vec<MonthlyRegionTotal> {
    let mut groups: BTreeMap<(NaiveDate, &str), (u64, usize)> = BTreeMap::new();

    for row in rows {
        let Some(date) = row.incident_date else {
            continue;
        };
        let Some(month) = date.with_day(1) else {
            continue;
        };
        let entry = groups.entry((month, row.region.as_str())).or_default();
        entry.0 += u64::from(row.total_dead_and_missing);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((month, region), (total, incidents))| MonthlyRegionTotal {
            month,
            region: region.to_string(),
            total,
            incidents,
        })
        .collect()
}

#[derive(Default)]
struct Demographics {
    total: i64,
    male: i64,
    female: i64,
    children: i64,
}

impl Demographics {
    const fn count(&self, category: DemographicCategory) -> i64 {
        match category {
            DemographicCategory::Male => self.male,
            DemographicCategory::Female => self.female,
            DemographicCategory::Children => self.children,
            DemographicCategory::Unknown => self.total - self.male - self.female - self.children,
        }
    }
}

/// Male/Female/Children/Unknown rows per region.
///
/// Null counts add zero. `Unknown` is the remainder of the total and is
/// passed through even when negative. Regions are ordered by total
/// descending, ties by name.
#[must_use]
pub fn demographics_by_region(rows: &[&Incident]) -> Vec<DemographicRow> {
    let mut groups: BTreeMap<&str, Demographics> = BTreeMap::new();

    for row in rows {
        let entry = groups.entry(row.region.as_str()).or_default();
        entry.total += i64::from(row.total_dead_and_missing);
        entry.male += i64::from(row.number_males.unwrap_or(0));
        entry.female += i64::from(row.number_females.unwrap_or(0));
        entry.children += i64::from(row.number_children.unwrap_or(0));
    }

    let mut regions: Vec<(&str, Demographics)> = groups.into_iter().collect();
    regions.sort_by(|(a_name, a), (b_name, b)| b.total.cmp(&a.total).then(a_name.cmp(b_name)));

    regions
        .into_iter()
        .flat_map(|(region, demographics)| {
            DemographicCategory::all()
                .iter()
                .map(move |&category| DemographicRow {
                    region: region.to_string(),
                    category,
                    count: demographics.count(category),
                    total: demographics.total,
                })
        })
        .collect()
}

/// Percentage of each region's incidents per cause of death.
///
/// Rows without a cause are left out of both the count and the region
/// denominator, so each region's percentages sum to 100. Sorted by
/// region, then cause.
#[must_use]
pub fn cause_shares(rows: &[&Incident]) -> Vec<CauseShare> {
    let mut groups: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();

    for row in rows {
        let Some(cause) = row.cause_of_death.as_deref() else {
            continue;
        };
        *groups
            .entry(row.region.as_str())
            .or_default()
            .entry(cause)
            .or_default() += 1;
    }

    let mut shares = Vec::new();
    for (region, causes) in groups {
        let known: usize = causes.values().sum();
        for (cause, count) in causes {
            shares.push(CauseShare {
                region: region.to_string(),
                cause: cause.to_string(),
                count,
                percentage: percentage(count, known),
            });
        }
    }
    shares
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, of: usize) -> f64 {
    if of == 0 {
        0.0
    } else {
        count as f64 / of as f64 * 100.0
    }
}

/// Reorders cause shares by one designated cause.
///
/// Every region in `shares` or `regions` that lacks `cause` gets a
/// synthesized zero row for it first. Regions are then ordered by that
/// cause's percentage descending, ties by region name; within a region the
/// designated cause comes first, the rest by name.
#[must_use]
pub fn sort_by_cause(
    mut shares: Vec<CauseShare>,
    cause: &str,
    regions: &[String],
) -> Vec<CauseShare> {
    let all_regions: BTreeSet<String> = shares
        .iter()
        .map(|s| s.region.clone())
        .chain(regions.iter().cloned())
        .collect();

    for region in all_regions {
        if !shares.iter().any(|s| s.region == region && s.cause == cause) {
            shares.push(CauseShare {
                region,
                cause: cause.to_string(),
                count: 0,
                percentage: 0.0,
            });
        }
    }

    let designated: HashMap<String, f64> = shares
        .iter()
        .filter(|s| s.cause == cause)
        .map(|s| (s.region.clone(), s.percentage))
        .collect();
    let key = |share: &CauseShare| designated.get(&share.region).copied().unwrap_or(0.0);

    shares.sort_by(|a, b| {
        key(b)
            .total_cmp(&key(a))
            .then_with(|| a.region.cmp(&b.region))
            .then_with(|| match (a.cause == cause, b.cause == cause) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => a.cause.cmp(&b.cause),
            })
    });
    shares
}

/// Counts values in first-encounter order, then stable-sorts by count
/// descending so ties keep that order.
fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        if let Some(&i) = index.get(value) {
            counts[i].1 += 1;
        } else {
            index.insert(value, counts.len());
            counts.push((value.to_string(), 1));
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `limit` most cited source URLs.
#[must_use]
pub fn top_sources(rows: &[&Incident], limit: usize) -> Vec<SourceCount> {
    ranked_counts(rows.iter().filter_map(|r| r.source_url.as_deref()))
        .into_iter()
        .take(limit)
        .map(|(url, count)| SourceCount { url, count })
        .collect()
}

/// Row count per non-null value of `column`, most frequent first.
#[must_use]
pub fn histogram(rows: &[&Incident], column: CategoricalColumn) -> Vec<CategoryCount> {
    ranked_counts(rows.iter().filter_map(|r| r.categorical(column)))
        .into_iter()
        .map(|(value, count)| CategoryCount { value, count })
        .collect()
}

/// One point per located row, colored by `color_by`.
#[must_use]
pub fn map_points(rows: &[&Incident], color_by: CategoricalColumn) -> Vec<MapPoint> {
    let located: Vec<&Incident> = rows
        .iter()
        .copied()
        .filter(|r| r.coordinates.is_some())
        .collect();
    let colors = ColorAssignment::for_column(&located, color_by);

    located
        .into_iter()
        .filter_map(|row| {
            let point = row.coordinates?;
            let category = row.categorical(color_by);
            Some(MapPoint {
                lon: point.lon,
                lat: point.lat,
                radius: row.radius,
                region: row.region.clone(),
                total: row.total_dead_and_missing,
                category: category.map(str::to_string),
                color: category
                    .and_then(|c| colors.color_of(c))
                    .map(str::to_string),
            })
        })
        .collect()
}

/// Dead and missing per (year, region), sorted by year then region.
#[must_use]
pub fn heatmap(rows: &[&Incident]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for row in rows {
        *cells.entry((row.year, row.region.as_str())).or_default() +=
            u64::from(row.total_dead_and_missing);
    }
    cells
        .into_iter()
        .map(|((year, region), total)| HeatmapCell {
            year,
            region: region.to_string(),
            total,
        })
        .collect()
}

/// Headline figures over the whole table.
#[must_use]
pub fn summary(incidents: &[Incident]) -> DatasetSummary {
    let regions: BTreeSet<&str> = incidents.iter().map(|i| i.region.as_str()).collect();
    let dates = incidents.iter().filter_map(|i| i.incident_date);

    DatasetSummary {
        incidents: incidents.len(),
        total_dead_and_missing: incidents
            .iter()
            .map(|i| u64::from(i.total_dead_and_missing))
            .sum(),
        regions: regions.into_iter().map(str::to_string).collect(),
        first_date: dates.clone().min(),
        last_date: dates.max(),
    }
}
