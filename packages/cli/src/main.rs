#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal explorer for the Missing Migrants incident dataset.
//!
//! ```text
//! missing_migrants [--data PATH] [--countries PATH] summary
//! missing_migrants timeseries --regions Mediterranean,"North Africa" [--from 2014-01-01] [--to 2014-12-31]
//! missing_migrants histogram --column region [--pick cause_of_death:Drowning]
//! missing_migrants demographics [--regions ...]
//! missing_migrants causes [--regions ...] [--sort-cause Drowning]
//! missing_migrants sources [--limit 10]
//! missing_migrants clusters [--geojson]
//! missing_migrants serve [--bind 0.0.0.0] [--port 8080]
//! ```
//!
//! Running with no subcommand enters the interactive page navigator.
//!
//! Uses `indicatif-log-bridge` (via [`missing_migrants_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load progress bar never fight for the terminal.

mod pages;
mod render;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use missing_migrants_analytics::{charts, summary};
use missing_migrants_analytics_models::{CategoryPick, DateRange, FilterSpec};
use missing_migrants_cli_utils::IndicatifProgress;
use missing_migrants_dataset::{DatasetHandle, RegionLookup};
use missing_migrants_incident_models::{CategoricalColumn, Incident};
use missing_migrants_server::{ServerConfig, run_server};
use missing_migrants_spatial::{ClusterGeometry, build_clusters, to_feature_collection};

#[derive(Parser)]
#[command(
    name = "missing_migrants",
    about = "Explore the Missing Migrants Project incident dataset"
)]
struct Cli {
    /// Incident CSV (default: `MM_DATA_PATH` or data/MM_14_21.csv)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Country lookup CSV (default: `MM_COUNTRIES_PATH` or data/countries.csv)
    #[arg(long, global = true)]
    countries: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Report(Report),
    /// Start the JSON API server
    Serve {
        /// Bind address (default: `BIND_ADDR` or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port (default: `PORT` or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Subcommands that print one view of the loaded table.
#[derive(Subcommand)]
enum Report {
    /// Row count, grand total, regions, and date bounds
    Summary,
    /// Monthly dead and missing per region (at most 4 regions)
    Timeseries {
        /// Comma-separated regions
        #[arg(long, value_delimiter = ',')]
        regions: Option<Vec<String>>,
        /// First included day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last included day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Value frequencies of a categorical column
    Histogram {
        /// region, cause_of_death, migration_route, or unsd_grouping
        #[arg(long, default_value = "region")]
        column: CategoricalColumn,
        /// Only count rows matching `column:value`, e.g. `cause_of_death:Drowning`
        #[arg(long)]
        pick: Option<CategoryPick>,
    },
    /// Male/Female/Children/Unknown per region
    Demographics {
        /// Comma-separated regions
        #[arg(long, value_delimiter = ',')]
        regions: Option<Vec<String>>,
    },
    /// Cause-of-death percentages per region (at most 14 regions)
    Causes {
        /// Comma-separated regions
        #[arg(long, value_delimiter = ',')]
        regions: Option<Vec<String>>,
        /// Order regions by this cause's percentage
        #[arg(long)]
        sort_cause: Option<String>,
    },
    /// Most cited sources
    Sources {
        /// Number of sources to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Cluster hulls
    Clusters {
        /// Print the GeoJSON FeatureCollection instead of a table
        #[arg(long)]
        geojson: bool,
    },
}

fn region_spec(regions: Option<Vec<String>>) -> FilterSpec {
    FilterSpec {
        regions,
        ..FilterSpec::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = missing_migrants_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut server = ServerConfig::from_env();
    if let Some(data) = cli.data {
        server.data_path = data;
    }
    if let Some(countries) = cli.countries {
        server.countries_path = countries;
    }

    let report = match cli.command {
        Some(Commands::Serve { bind, port }) => {
            if let Some(bind) = bind {
                server.bind_addr = bind;
            }
            if let Some(port) = port {
                server.port = port;
            }
            return serve(server);
        }
        Some(Commands::Report(report)) => Some(report),
        None => None,
    };

    let handle = DatasetHandle::new(
        server.data_path.clone(),
        IndicatifProgress::rows_bar(&multi, "Loading incidents"),
    );
    let dataset = handle.get()?;

    if let Some(report) = report {
        return print_report(report, dataset.incidents());
    }

    let countries = RegionLookup::load(&server.countries_path)
        .inspect_err(|e| log::warn!("Country lookup unavailable: {e}"))
        .ok();
    let clusters: Vec<ClusterGeometry> = build_clusters(dataset.incidents())?;
    let explorer = pages::Explorer {
        dataset: &dataset,
        countries: countries.as_ref(),
        clusters: &clusters,
        server,
    };
    match explorer.run() {
        Some(config) => serve(config),
        None => Ok(()),
    }
}

fn print_report(report: Report, incidents: &[Incident]) -> Result<(), Box<dyn std::error::Error>> {
    match report {
        Report::Summary => render::summary(&summary(incidents)),
        Report::Timeseries { regions, from, to } => {
            let mut spec = region_spec(regions);
            if from.is_some() || to.is_some() {
                spec = spec.with_date_range(DateRange::new(
                    from.unwrap_or(NaiveDate::MIN),
                    to.unwrap_or(NaiveDate::MAX),
                ));
            }
            render::chart(&charts::time_series(incidents, &spec), render::time_series);
        }
        Report::Histogram { column, pick } => {
            let spec = pick.map_or_else(FilterSpec::all, |pick| FilterSpec::all().with_pick(pick));
            render::chart(
                &charts::histogram(incidents, &spec, column),
                render::histogram,
            );
        }
        Report::Demographics { regions } => render::chart(
            &charts::demographics(incidents, &region_spec(regions)),
            render::demographics,
        ),
        Report::Causes {
            regions,
            sort_cause,
        } => render::chart(
            &charts::causes(incidents, &region_spec(regions), sort_cause.as_deref()),
            render::causes,
        ),
        Report::Sources { limit } => render::chart(
            &charts::sources(incidents, &FilterSpec::all(), limit),
            render::sources,
        ),
        Report::Clusters { geojson } => {
            let clusters = build_clusters(incidents)?;
            if geojson {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&to_feature_collection(&clusters))?
                );
            } else {
                let summaries: Vec<_> = clusters.iter().map(ClusterGeometry::summary).collect();
                render::clusters(&summaries);
            }
        }
    }

    Ok(())
}

/// Runs the API server on actix-web's own runtime.
fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    actix_web::rt::System::new().block_on(run_server(config))?;
    Ok(())
}
