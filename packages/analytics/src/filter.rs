//! Filter/selection evaluation.
//!
//! Turns the base table plus a [`FilterSpec`] into the matching subset, or
//! into an [`Advisory`] when the selection cannot produce a chart.

use missing_migrants_analytics_models::{Advisory, ChartKind, ChartResult, FilterSpec};
use missing_migrants_incident_models::Incident;

/// Returns the rows matching every predicate of `spec`, in source order.
///
/// A date range excludes rows without a parsed date. Performs no limit
/// checks; see [`evaluate`].
#[must_use]
pub fn apply<'a>(incidents: &'a [Incident], spec: &FilterSpec) -> Vec<&'a Incident> {
    incidents.iter().filter(|i| matches(i, spec)).collect()
}

/// Whether a single row passes `spec`.
#[must_use]
pub fn matches(incident: &Incident, spec: &FilterSpec) -> bool {
    if let Some(regions) = &spec.regions
        && !regions.iter().any(|r| *r == incident.region)
    {
        return false;
    }

    if let Some(range) = &spec.date_range {
        match incident.incident_date {
            Some(date) if range.contains(date) => {}
            _ => return false,
        }
    }

    if let Some(pick) = &spec.pick
        && incident.categorical(pick.column) != Some(pick.value.as_str())
    {
        return false;
    }

    true
}

/// Validates `spec` for a chart and applies it.
///
/// Checks run in order: empty region selection, the chart's region limit,
/// reversed date range, then an empty match.
#[must_use]
pub fn evaluate<'a>(
    incidents: &'a [Incident],
    spec: &FilterSpec,
    kind: ChartKind,
) -> ChartResult<Vec<&'a Incident>> {
    if let Some(advisory) = check(spec, kind) {
        log::debug!("{kind:?}: {advisory}");
        return ChartResult::Empty(advisory);
    }

    let rows = apply(incidents, spec);
    if rows.is_empty() {
        log::debug!("{kind:?}: {}", Advisory::NoMatchingRows);
        return ChartResult::Empty(Advisory::NoMatchingRows);
    }

    ChartResult::Data(rows)
}

fn check(spec: &FilterSpec, kind: ChartKind) -> Option<Advisory> {
    if let Some(selected) = spec.selected_region_count() {
        if selected == 0 {
            return Some(Advisory::EmptySelection);
        }
        if let Some(max) = kind.max_regions()
            && selected > max
        {
            return Some(Advisory::TooManyRegions { max, selected });
        }
    }

    if let Some(range) = &spec.date_range
        && range.is_reversed()
    {
        return Some(Advisory::InvalidDateRange {
            from: range.from,
            to: range.to,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use missing_migrants_analytics_models::{CategoryPick, DateRange};
    use missing_migrants_incident_models::CategoricalColumn;

    use super::*;
    use crate::tests::sample;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unfiltered_spec_keeps_every_row() {
        let dataset = sample();
        assert_eq!(apply(dataset.incidents(), &FilterSpec::all()).len(), 15);
    }

    #[test]
    fn empty_selection_short_circuits() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions(Vec::<String>::new());
        let result = evaluate(dataset.incidents(), &spec, ChartKind::Histogram);
        assert_eq!(result.advisory(), Some(&Advisory::EmptySelection));
        assert!(result.data().is_none());
    }

    #[test]
    fn region_limit_depends_on_chart() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions(["Europe", "Caribbean"]);
        let result = evaluate(dataset.incidents(), &spec, ChartKind::RegionMap);
        assert_eq!(
            result.advisory(),
            Some(&Advisory::TooManyRegions {
                max: 1,
                selected: 2
            })
        );
        assert!(!evaluate(dataset.incidents(), &spec, ChartKind::TimeSeries).is_empty());
    }

    #[test]
    fn date_range_is_inclusive_and_drops_undated_rows() {
        let dataset = sample();
        let spec = FilterSpec::all()
            .with_regions(["Mediterranean", "North Africa"])
            .with_date_range(DateRange::new(date(2014, 1, 4), date(2014, 6, 10)));
        let rows = apply(dataset.incidents(), &spec);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.incident_date.is_some()));
    }

    #[test]
    fn reversed_range_is_advisory() {
        let dataset = sample();
        let spec = FilterSpec::all()
            .with_date_range(DateRange::new(date(2015, 1, 1), date(2014, 1, 1)));
        let result = evaluate(dataset.incidents(), &spec, ChartKind::TimeSeries);
        assert!(matches!(
            result.advisory(),
            Some(Advisory::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn pick_keeps_matching_value() {
        let dataset = sample();
        let spec = FilterSpec::all()
            .with_pick(CategoryPick::new(CategoricalColumn::CauseOfDeath, "Violence"));
        let rows = apply(dataset.incidents(), &spec);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn unmatched_selection_is_advisory() {
        let dataset = sample();
        let spec = FilterSpec::all().with_regions(["Oceania"]);
        let result = evaluate(dataset.incidents(), &spec, ChartKind::Demographics);
        assert_eq!(result.advisory(), Some(&Advisory::NoMatchingRows));
    }
}
