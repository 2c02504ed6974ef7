//! One entry point per visualization.
//!
//! Each function validates the selection for its chart, filters the base
//! table, aggregates, and reports an empty aggregate as
//! [`Advisory::NoMatchingRows`].

use missing_migrants_analytics_models::{
    Advisory, CategoryCount, CauseShare, ChartKind, ChartResult, DemographicRow, FilterSpec,
    HeatmapCell, MapPoint, MonthlyRegionTotal, SourceCount,
};
use missing_migrants_incident_models::{CategoricalColumn, Incident};

use crate::{aggregate, filter};

fn run<T>(
    incidents: &[Incident],
    spec: &FilterSpec,
    kind: ChartKind,
    f: impl FnOnce(&[&Incident]) -> Vec<T>,
) -> ChartResult<Vec<T>> {
    let rows = match filter::evaluate(incidents, spec, kind) {
        ChartResult::Data(rows) => rows,
        ChartResult::Empty(advisory) => return ChartResult::Empty(advisory),
    };

    let result = f(rows.as_slice());
    if result.is_empty() {
        ChartResult::Empty(Advisory::NoMatchingRows)
    } else {
        ChartResult::Data(result)
    }
}

/// Monthly dead and missing per selected region (at most four).
#[must_use]
pub fn time_series(incidents: &[Incident], spec: &FilterSpec) -> ChartResult<Vec<MonthlyRegionTotal>> {
    run(
        incidents,
        spec,
        ChartKind::TimeSeries,
        aggregate::monthly_region_totals,
    )
}

/// Value frequencies of one categorical column.
#[must_use]
pub fn histogram(
    incidents: &[Incident],
    spec: &FilterSpec,
    column: CategoricalColumn,
) -> ChartResult<Vec<CategoryCount>> {
    run(incidents, spec, ChartKind::Histogram, |rows| {
        aggregate::histogram(rows, column)
    })
}

/// Demographic breakdown per region.
#[must_use]
pub fn demographics(incidents: &[Incident], spec: &FilterSpec) -> ChartResult<Vec<DemographicRow>> {
    run(
        incidents,
        spec,
        ChartKind::Demographics,
        aggregate::demographics_by_region,
    )
}

/// Cause-of-death percentages per region (at most fourteen), optionally
/// ordered by one cause.
#[must_use]
pub fn causes(
    incidents: &[Incident],
    spec: &FilterSpec,
    sort_cause: Option<&str>,
) -> ChartResult<Vec<CauseShare>> {
    run(incidents, spec, ChartKind::CauseOfDeath, |rows| {
        let shares = aggregate::cause_shares(rows);
        match sort_cause {
            Some(cause) if !shares.is_empty() => {
                aggregate::sort_by_cause(shares, cause, spec.regions.as_deref().unwrap_or_default())
            }
            _ => shares,
        }
    })
}

/// The `limit` most cited sources.
#[must_use]
pub fn sources(
    incidents: &[Incident],
    spec: &FilterSpec,
    limit: usize,
) -> ChartResult<Vec<SourceCount>> {
    run(incidents, spec, ChartKind::Sources, |rows| {
        aggregate::top_sources(rows, limit)
    })
}

/// Point map of a single region.
#[must_use]
pub fn region_map(
    incidents: &[Incident],
    spec: &FilterSpec,
    color_by: CategoricalColumn,
) -> ChartResult<Vec<MapPoint>> {
    run(incidents, spec, ChartKind::RegionMap, |rows| {
        aggregate::map_points(rows, color_by)
    })
}

/// Year × region heatmap.
#[must_use]
pub fn heatmap(incidents: &[Incident], spec: &FilterSpec) -> ChartResult<Vec<HeatmapCell>> {
    run(incidents, spec, ChartKind::Heatmap, aggregate::heatmap)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use missing_migrants_analytics_models::DateRange;

    use super::*;
    use crate::tests::sample;

    #[test]
    fn time_series_rejects_five_regions() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions([
            "Mediterranean",
            "Europe",
            "Caribbean",
            "North Africa",
            "North America",
        ]);
        assert_eq!(
            time_series(dataset.incidents(), &spec).advisory(),
            Some(&Advisory::TooManyRegions {
                max: 4,
                selected: 5
            })
        );
    }

    #[test]
    fn time_series_of_one_region() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions(["Mediterranean"]);
        let rows = time_series(dataset.incidents(), &spec);
        let rows = rows.data().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].total, 25);
    }

    #[test]
    fn undated_only_selection_has_no_time_series() {
        let dataset = sample();
        let spec = FilterSpec::all()
            .with_regions(["North Africa"])
            .with_date_range(DateRange::new(
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            ));
        assert_eq!(
            time_series(dataset.incidents(), &spec).advisory(),
            Some(&Advisory::NoMatchingRows)
        );
    }

    #[test]
    fn causes_sorted_by_designated_cause() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions(["Mediterranean", "North Africa"]);
        let shares = causes(dataset.incidents(), &spec, Some("Violence"));
        let shares = shares.data().unwrap();
        assert_eq!(shares[0].region, "North Africa");
        assert_eq!(shares[0].cause, "Violence");
        assert!((shares[0].percentage - 50.0).abs() < 1e-9);
        assert!(
            shares
                .iter()
                .any(|s| s.region == "Mediterranean" && s.cause == "Violence" && s.count == 0)
        );
    }

    #[test]
    fn region_map_allows_one_region() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions(["North Africa"]);
        let points = region_map(dataset.incidents(), &spec, CategoricalColumn::CauseOfDeath);
        assert_eq!(points.data().unwrap().len(), 3);
    }

    #[test]
    fn sources_honor_limit() {
        let dataset = sample();
        let result = sources(dataset.incidents(), &FilterSpec::all(), 2);
        assert_eq!(result.data().unwrap().len(), 2);
    }
}
