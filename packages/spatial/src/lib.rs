#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Region-cluster geometry.
//!
//! Selects the rows of each fixed geographic cluster (Mediterranean,
//! Mexico-US border, Sahara Desert crossing), wraps their points in a
//! convex hull, and exports the hulls as a `GeoJSON` `FeatureCollection`
//! for the overlay map.

pub mod definition;
pub mod hull;
pub mod registry;

use geo::Polygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};
use missing_migrants_analytics_models::Advisory;
use missing_migrants_incident_models::{Incident, LonLat};
use serde::{Deserialize, Serialize};

pub use definition::{BoundingBox, ClusterDefinition, NamedZone, Selector};
pub use hull::{GeometryError, convex_hull, empty_polygon};
pub use registry::{all_clusters, find_cluster};

/// Errors that can occur while loading the cluster registry.
#[derive(Debug, thiserror::Error)]
pub enum ClusterConfigError {
    /// An embedded TOML file failed to parse.
    #[error("Failed to parse cluster '{name}': {message}")]
    Parse {
        /// Registry entry name.
        name: String,
        /// Parser message.
        message: String,
    },

    /// A bounding box has min greater than max.
    #[error("Cluster '{cluster}' has inverted bounds in '{zone}'")]
    InvalidBounds {
        /// Cluster id.
        cluster: String,
        /// `"bounds"` or the exclusion zone name.
        zone: String,
    },
}

/// Hull and totals of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGeometry {
    pub id: String,
    pub name: String,
    /// Located rows selected by the cluster.
    pub incident_count: usize,
    /// Summed dead and missing over those rows.
    pub total_dead_and_missing: u64,
    /// Convex hull, or an empty polygon with `advisory` set.
    pub polygon: Polygon<f64>,
    pub advisory: Option<Advisory>,
}

impl ClusterGeometry {
    /// Whether the hull has vertices.
    #[must_use]
    pub fn has_polygon(&self) -> bool {
        !self.polygon.exterior().0.is_empty()
    }

    /// Serializable overview without the polygon.
    #[must_use]
    pub fn summary(&self) -> ClusterSummary {
        ClusterSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            incident_count: self.incident_count,
            total_dead_and_missing: self.total_dead_and_missing,
            vertex_count: self.polygon.exterior().0.len(),
            advisory: self.advisory.as_ref().map(ToString::to_string),
        }
    }
}

/// Per-cluster overview for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub id: String,
    pub name: String,
    pub incident_count: usize,
    pub total_dead_and_missing: u64,
    /// Exterior ring length, closing vertex included.
    pub vertex_count: usize,
    pub advisory: Option<String>,
}

/// Selects the rows of `cluster` and builds its hull.
///
/// Too few points yield an empty polygon plus
/// [`Advisory::InsufficientPoints`] instead of an error.
#[must_use]
pub fn build_cluster(cluster: &ClusterDefinition, incidents: &[Incident]) -> ClusterGeometry {
    let mut points: Vec<LonLat> = Vec::new();
    let mut total_dead_and_missing = 0u64;

    for incident in incidents {
        if let Some(point) = cluster.select(incident) {
            points.push(point);
            total_dead_and_missing += u64::from(incident.total_dead_and_missing);
        }
    }

    let (polygon, advisory) = match convex_hull(&points) {
        Ok(polygon) => (polygon, None),
        Err(GeometryError::InsufficientPoints { found }) => {
            log::warn!(
                "Cluster '{}' has only {found} distinct location(s) out of {} incident(s); no polygon",
                cluster.id,
                points.len()
            );
            (
                empty_polygon(),
                Some(Advisory::InsufficientPoints {
                    cluster: cluster.id.clone(),
                    found,
                }),
            )
        }
    };

    log::debug!(
        "Cluster '{}': {} points, {} hull vertices",
        cluster.id,
        points.len(),
        polygon.exterior().0.len()
    );

    ClusterGeometry {
        id: cluster.id.clone(),
        name: cluster.name.clone(),
        incident_count: points.len(),
        total_dead_and_missing,
        polygon,
        advisory,
    }
}

/// Builds every registered cluster over the full table.
///
/// # Errors
///
/// Returns [`ClusterConfigError`] if the registry fails to load.
pub fn build_clusters(incidents: &[Incident]) -> Result<Vec<ClusterGeometry>, ClusterConfigError> {
    Ok(all_clusters()?
        .iter()
        .map(|cluster| build_cluster(cluster, incidents))
        .collect())
}

/// One `Polygon` feature per cluster with a hull.
///
/// Properties: `id`, `name`, `incidentCount`, `totalDeadAndMissing`.
#[must_use]
pub fn to_feature_collection(clusters: &[ClusterGeometry]) -> FeatureCollection {
    let features = clusters
        .iter()
        .filter(|c| c.has_polygon())
        .map(|cluster| {
            let mut properties = JsonObject::new();
            properties.insert("id".to_string(), cluster.id.clone().into());
            properties.insert("name".to_string(), cluster.name.clone().into());
            properties.insert("incidentCount".to_string(), cluster.incident_count.into());
            properties.insert(
                "totalDeadAndMissing".to_string(),
                cluster.total_dead_and_missing.into(),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&cluster.polygon))),
                id: Some(Id::String(cluster.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use geo::{Intersects as _, Point};
    use missing_migrants_dataset::{Dataset, load_incidents_from_reader, null_progress};

    use super::*;

    const SAMPLE: &str = include_str!("../../dataset/fixtures/incidents_sample.csv");

    fn sample() -> Dataset {
        load_incidents_from_reader(SAMPLE.as_bytes(), &null_progress()).unwrap()
    }

    fn cluster(id: &str) -> ClusterDefinition {
        find_cluster(id).unwrap().unwrap()
    }

    #[test]
    fn mediterranean_hull_covers_its_points() {
        let dataset = sample();
        let med = cluster("mediterranean");
        let geometry = build_cluster(&med, dataset.incidents());
        assert_eq!(geometry.incident_count, 4);
        assert!(geometry.advisory.is_none());

        let ring = &geometry.polygon.exterior().0;
        assert_eq!(ring.first(), ring.last());
        for incident in dataset.incidents() {
            if let Some(point) = med.select(incident) {
                assert!(geometry.polygon.intersects(&Point::new(point.lon, point.lat)));
            }
        }
    }

    #[test]
    fn border_cluster_drops_excluded_interior() {
        let dataset = sample();
        let geometry = build_cluster(&cluster("mexico_us_border"), dataset.incidents());
        assert_eq!(geometry.incident_count, 3);
        assert_eq!(geometry.total_dead_and_missing, 6);
    }

    #[test]
    fn sahara_cluster_drops_points_outside_box() {
        let dataset = sample();
        let geometry = build_cluster(&cluster("sahara_desert"), dataset.incidents());
        assert_eq!(geometry.incident_count, 3);
        assert!(geometry.has_polygon());
    }

    #[test]
    fn too_few_points_give_empty_polygon_and_advisory() {
        let dataset = sample();
        let incidents = &dataset.incidents()[..2];
        let geometry = build_cluster(&cluster("mediterranean"), incidents);
        assert!(!geometry.has_polygon());
        assert_eq!(
            geometry.advisory,
            Some(Advisory::InsufficientPoints {
                cluster: "mediterranean".to_string(),
                found: 2
            })
        );
        assert!(geometry.summary().advisory.is_some());
    }

    #[test]
    fn shared_coordinates_give_empty_polygon_and_advisory() {
        let dataset = sample();
        let template = dataset
            .incidents()
            .iter()
            .find(|i| i.region == "Mediterranean" && i.coordinates.is_some())
            .unwrap();
        let incidents = vec![template.clone(); 3];

        let geometry = build_cluster(&cluster("mediterranean"), &incidents);
        assert_eq!(geometry.incident_count, 3);
        assert!(!geometry.has_polygon());
        assert_eq!(
            geometry.advisory,
            Some(Advisory::InsufficientPoints {
                cluster: "mediterranean".to_string(),
                found: 1
            })
        );
        assert!(to_feature_collection(&[geometry]).features.is_empty());
    }

    #[test]
    fn feature_collection_skips_empty_hulls() {
        let dataset = sample();
        let mut clusters = build_clusters(dataset.incidents()).unwrap();
        assert_eq!(to_feature_collection(&clusters).features.len(), 3);

        clusters[0] = build_cluster(&cluster("mediterranean"), &[]);
        let collection = to_feature_collection(&clusters);
        assert_eq!(collection.features.len(), 2);

        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["id"], "mexico_us_border");
        assert_eq!(properties["incidentCount"], 3);
        assert_eq!(properties["totalDeadAndMissing"], 6);
    }
}
