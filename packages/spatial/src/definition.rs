//! Cluster definition types, deserialized from the embedded TOML files.

use missing_migrants_incident_models::{Incident, LonLat};
use serde::{Deserialize, Serialize};

/// Axis-aligned lat/lon rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, point: LonLat) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }

    /// Whether the bounds are well-formed (min ≤ max on both axes).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lon <= self.max_lon
    }
}

/// Which rows a cluster starts from, before any bounding box applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selector {
    /// Region equals one of the listed names.
    Regions {
        /// Region names.
        regions: Vec<String>,
    },
    /// Migration route equals the label.
    Route {
        /// Route label.
        route: String,
    },
}

impl Selector {
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        match self {
            Self::Regions { regions } => regions.iter().any(|r| *r == incident.region),
            Self::Route { route } => incident.migration_route.as_deref() == Some(route.as_str()),
        }
    }
}

/// A named rectangle removed from a cluster's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedZone {
    pub name: String,
    pub bounds: BoundingBox,
}

/// A fixed geographic cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDefinition {
    /// Unique identifier (e.g. `"sahara_desert"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base row selection.
    pub selector: Selector,
    /// Optional box the point must fall in.
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    /// Boxes the point must not fall in.
    #[serde(default)]
    pub exclusions: Vec<NamedZone>,
}

impl ClusterDefinition {
    /// Located point of `incident` if it belongs to this cluster.
    ///
    /// Rows without coordinates never match.
    #[must_use]
    pub fn select(&self, incident: &Incident) -> Option<LonLat> {
        let point = incident.coordinates?;
        if !self.selector.matches(incident) {
            return None;
        }
        if let Some(bounds) = &self.bounds
            && !bounds.contains(point)
        {
            return None;
        }
        if self.exclusions.iter().any(|zone| zone.bounds.contains(point)) {
            return None;
        }
        Some(point)
    }
}
