//! Plain-text tables for the terminal.

use missing_migrants_analytics_models::{
    CategoryCount, CauseShare, ChartResult, DatasetSummary, DemographicRow, HeatmapCell, MapPoint,
    MonthlyRegionTotal, SourceCount,
};
use missing_migrants_incident_models::Column;
use missing_migrants_spatial::ClusterSummary;

/// Prints the rows with `print`, or the advisory when there are none.
pub fn chart<T>(result: &ChartResult<Vec<T>>, print: impl FnOnce(&[T])) {
    match result {
        ChartResult::Data(rows) => print(rows.as_slice()),
        ChartResult::Empty(advisory) => println!("\n  {advisory}\n"),
    }
}

pub fn summary(summary: &DatasetSummary) {
    println!();
    println!("  Incidents:               {}", summary.incidents);
    println!("  Total dead and missing:  {}", summary.total_dead_and_missing);
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => println!("  Dates:                   {first} to {last}"),
        _ => println!("  Dates:                   (none parsed)"),
    }
    println!("  Regions ({}):", summary.regions.len());
    for region in &summary.regions {
        println!("    {region}");
    }
    println!();
}

pub fn data_dictionary() {
    println!();
    for column in Column::all() {
        println!("  {:<38} {}", column.header(), column.description());
    }
    println!();
}

pub fn time_series(rows: &[MonthlyRegionTotal]) {
    println!("\n  {:<8} {:<28} {:>8} {:>9} {:>8}", "MONTH", "REGION", "TOTAL", "INCIDENTS", "MEAN");
    println!("  {}", "-".repeat(65));
    for row in rows {
        println!(
            "  {:<8} {:<28} {:>8} {:>9} {:>8.2}",
            row.month_label(),
            row.region,
            row.total,
            row.incidents,
            row.mean()
        );
    }
    println!();
}

pub fn histogram(rows: &[CategoryCount]) {
    let width = rows.iter().map(|r| r.value.len()).max().unwrap_or(5).min(60);
    println!();
    for row in rows {
        println!("  {:<width$} {:>6}", row.value, row.count);
    }
    println!();
}

pub fn demographics(rows: &[DemographicRow]) {
    println!("\n  {:<28} {:<10} {:>8} {:>8}", "REGION", "CATEGORY", "COUNT", "TOTAL");
    println!("  {}", "-".repeat(57));
    for row in rows {
        println!(
            "  {:<28} {:<10} {:>8} {:>8}",
            row.region,
            row.category.to_string(),
            row.count,
            row.total
        );
    }
    println!();
}

pub fn causes(rows: &[CauseShare]) {
    println!("\n  {:<28} {:>7} {:>6}  CAUSE", "REGION", "PCT", "COUNT");
    println!("  {}", "-".repeat(90));
    for row in rows {
        println!(
            "  {:<28} {:>6.1}% {:>6}  {}",
            row.region, row.percentage, row.count, row.cause
        );
    }
    println!();
}

pub fn sources(rows: &[SourceCount]) {
    println!();
    for (rank, row) in rows.iter().enumerate() {
        println!("  {:>3}. {:>5}  {}", rank + 1, row.count, row.url);
    }
    println!();
}

/// One legend line of a point map.
#[derive(Debug, PartialEq, Eq)]
struct LegendEntry<'a> {
    value: &'a str,
    color: &'a str,
    count: usize,
}

/// Legend built from the colors the points already carry, in
/// first-encounter order.
fn map_legend(rows: &[MapPoint]) -> Vec<LegendEntry<'_>> {
    let mut legend: Vec<LegendEntry<'_>> = Vec::new();
    for point in rows {
        let (Some(value), Some(color)) = (point.category.as_deref(), point.color.as_deref()) else {
            continue;
        };
        match legend.iter_mut().find(|entry| entry.value == value) {
            Some(entry) => entry.count += 1,
            None => legend.push(LegendEntry {
                value,
                color,
                count: 1,
            }),
        }
    }
    legend
}

pub fn map_points(rows: &[MapPoint]) {
    println!("\n  {} located incidents", rows.len());
    println!("  Legend:");
    for entry in map_legend(rows) {
        println!("    {} {:>5}  {}", entry.color, entry.count, entry.value);
    }
    println!();
}

pub fn heatmap(rows: &[HeatmapCell]) {
    println!("\n  {:<6} {:<28} {:>8}", "YEAR", "REGION", "TOTAL");
    println!("  {}", "-".repeat(44));
    for cell in rows {
        println!("  {:<6} {:<28} {:>8}", cell.year, cell.region, cell.total);
    }
    println!();
}

pub fn clusters(rows: &[ClusterSummary]) {
    println!(
        "\n  {:<26} {:>9} {:>8} {:>9}  NOTE",
        "CLUSTER", "INCIDENTS", "TOTAL", "VERTICES"
    );
    println!("  {}", "-".repeat(70));
    for row in rows {
        println!(
            "  {:<26} {:>9} {:>8} {:>9}  {}",
            row.name,
            row.incident_count,
            row.total_dead_and_missing,
            row.vertex_count,
            row.advisory.as_deref().unwrap_or("")
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(category: Option<&str>, color: Option<&str>) -> MapPoint {
        MapPoint {
            lon: 0.0,
            lat: 0.0,
            radius: 1.0,
            region: "Mediterranean".to_string(),
            total: 1,
            category: category.map(str::to_string),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn legend_uses_point_colors_in_encounter_order() {
        let rows = [
            point(Some("Violence"), Some("#ff7f0e")),
            point(Some("Drowning"), Some("#1f77b4")),
            point(None, None),
            point(Some("Violence"), Some("#ff7f0e")),
        ];
        assert_eq!(
            map_legend(&rows),
            vec![
                LegendEntry {
                    value: "Violence",
                    color: "#ff7f0e",
                    count: 2
                },
                LegendEntry {
                    value: "Drowning",
                    color: "#1f77b4",
                    count: 1
                },
            ]
        );
    }
}
