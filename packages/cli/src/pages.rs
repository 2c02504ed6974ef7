//! Interactive page navigator.
//!
//! Walks the four dashboard pages (Introduction, Descriptive analysis,
//! Geospatial analysis, Group analysis) with `dialoguer` prompts and
//! prints each view's table.

use chrono::NaiveDate;
use dialoguer::{Confirm, Input};
use missing_migrants_analytics::{charts, summary};
use missing_migrants_analytics_models::{ChartKind, DateRange, FilterSpec};
use missing_migrants_cli_utils::{select_many, select_one};
use missing_migrants_dataset::{Dataset, RegionLookup};
use missing_migrants_incident_models::CategoricalColumn;
use missing_migrants_server::{ServerConfig, interactive};
use missing_migrants_spatial::ClusterGeometry;

use crate::render;

/// Top-level pages.
enum Page {
    Introduction,
    Descriptive,
    Geospatial,
    Group,
    Serve,
    Quit,
}

impl Page {
    const ALL: &[Self] = &[
        Self::Introduction,
        Self::Descriptive,
        Self::Geospatial,
        Self::Group,
        Self::Serve,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::Descriptive => "Descriptive analysis",
            Self::Geospatial => "Geospatial analysis",
            Self::Group => "Group analysis",
            Self::Serve => "Start API server",
            Self::Quit => "Quit",
        }
    }
}

/// Everything the pages read.
pub struct Explorer<'a> {
    pub dataset: &'a Dataset,
    pub countries: Option<&'a RegionLookup>,
    pub clusters: &'a [ClusterGeometry],
    pub server: ServerConfig,
}

impl Explorer<'_> {
    /// Runs the navigator until the user quits.
    ///
    /// Returns the server configuration if the user chose to start it.
    #[must_use]
    pub fn run(&self) -> Option<ServerConfig> {
        println!("Missing Migrants Explorer");
        println!();

        let labels: Vec<&str> = Page::ALL.iter().map(Page::label).collect();
        loop {
            let idx = select_one("Page", &labels, 0)?;
            match Page::ALL[idx] {
                Page::Introduction => self.introduction(),
                Page::Descriptive => self.descriptive(),
                Page::Geospatial => self.geospatial(),
                Page::Group => self.group(),
                Page::Serve => {
                    if let Some(config) = interactive::prompt(self.server.clone()) {
                        return Some(config);
                    }
                }
                Page::Quit => return None,
            }
        }
    }

    fn regions(&self, kind: ChartKind) -> Vec<String> {
        let regions = self.dataset.regions();
        let checked: Vec<bool> = (0..regions.len()).map(|i| i == 0).collect();
        let prompt = kind.max_regions().map_or_else(
            || "Regions (space=toggle, enter=confirm)".to_string(),
            |max| format!("Regions, at most {max} (space=toggle, enter=confirm)"),
        );
        select_many(&prompt, &regions, &checked)
    }

    fn introduction(&self) {
        render::summary(&summary(self.dataset.incidents()));
        render::data_dictionary();

        if let Some(countries) = self.countries {
            let unassigned = countries.unassigned();
            println!(
                "  Country lookup: {} countries, {} without a region",
                countries.len(),
                unassigned.len()
            );
            println!();
        }
    }

    fn descriptive(&self) {
        const VIEWS: &[&str] = &["Monthly time series", "Histogram", "Top sources"];
        let Some(view) = select_one("View", VIEWS, 0) else {
            return;
        };
        let incidents = self.dataset.incidents();

        match view {
            0 => {
                let mut spec = FilterSpec::all().with_regions(self.regions(ChartKind::TimeSeries));
                if let Some(range) = prompt_date_range() {
                    spec = spec.with_date_range(range);
                }
                render::chart(&charts::time_series(incidents, &spec), render::time_series);
            }
            1 => {
                let Some(column) = prompt_column("Column", 0) else {
                    return;
                };
                render::chart(
                    &charts::histogram(incidents, &FilterSpec::all(), column),
                    render::histogram,
                );
            }
            _ => {
                let limit: usize = Input::new()
                    .with_prompt("How many sources")
                    .default(10)
                    .interact_text()
                    .unwrap_or(10);
                render::chart(
                    &charts::sources(incidents, &FilterSpec::all(), limit),
                    render::sources,
                );
            }
        }
    }

    fn geospatial(&self) {
        const VIEWS: &[&str] = &["Region map", "Year x region heatmap", "Cluster overlays"];
        let Some(view) = select_one("View", VIEWS, 0) else {
            return;
        };
        let incidents = self.dataset.incidents();

        match view {
            0 => {
                let regions = self.dataset.regions();
                let Some(region) = select_one("Region", &regions, 0) else {
                    return;
                };
                let Some(color_by) = prompt_column("Color by", 1) else {
                    return;
                };
                let spec = FilterSpec::all().with_regions([regions[region].clone()]);
                render::chart(
                    &charts::region_map(incidents, &spec, color_by),
                    render::map_points,
                );
            }
            1 => {
                let spec = FilterSpec::all().with_regions(self.regions(ChartKind::Heatmap));
                render::chart(&charts::heatmap(incidents, &spec), render::heatmap);
            }
            _ => {
                let summaries: Vec<_> = self.clusters.iter().map(ClusterGeometry::summary).collect();
                render::clusters(&summaries);
            }
        }
    }

    fn group(&self) {
        const VIEWS: &[&str] = &["Demographics", "Causes of death"];
        let Some(view) = select_one("View", VIEWS, 0) else {
            return;
        };
        let incidents = self.dataset.incidents();

        if view == 0 {
            let spec = FilterSpec::all().with_regions(self.regions(ChartKind::Demographics));
            render::chart(&charts::demographics(incidents, &spec), render::demographics);
            return;
        }

        let spec = FilterSpec::all().with_regions(self.regions(ChartKind::CauseOfDeath));
        let mut causes = vec!["(no ordering)".to_string()];
        causes.extend(self.dataset.distinct_values(CategoricalColumn::CauseOfDeath));
        let sort_cause = select_one("Order regions by", &causes, 0)
            .filter(|&i| i > 0)
            .map(|i| causes[i].as_str());
        render::chart(
            &charts::causes(incidents, &spec, sort_cause),
            render::causes,
        );
    }
}

fn prompt_column(prompt: &str, default: usize) -> Option<CategoricalColumn> {
    let labels: Vec<&str> = CategoricalColumn::all()
        .iter()
        .map(|c| c.label())
        .collect();
    select_one(prompt, &labels, default).map(|i| CategoricalColumn::all()[i])
}

fn prompt_date_range() -> Option<DateRange> {
    let restrict = Confirm::new()
        .with_prompt("Restrict to a date range?")
        .default(false)
        .interact()
        .unwrap_or(false);
    if !restrict {
        return None;
    }

    let from: NaiveDate = Input::new()
        .with_prompt("From (YYYY-MM-DD)")
        .interact_text()
        .ok()?;
    let to: NaiveDate = Input::new()
        .with_prompt("To (YYYY-MM-DD)")
        .interact_text()
        .ok()?;
    Some(DateRange::new(from, to))
}
