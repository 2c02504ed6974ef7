//! Compile-time registry of cluster definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a cluster requires creating a TOML file in `clusters/` and adding
//! a corresponding entry here.

use crate::ClusterConfigError;
use crate::definition::ClusterDefinition;

/// Number of registered clusters. Enforced by a test.
#[cfg(test)]
const EXPECTED_CLUSTER_COUNT: usize = 3;

/// Embedded TOML cluster definitions, in display order.
const CLUSTER_TOMLS: &[(&str, &str)] = &[
    ("mediterranean", include_str!("../clusters/mediterranean.toml")),
    (
        "mexico_us_border",
        include_str!("../clusters/mexico_us_border.toml"),
    ),
    ("sahara_desert", include_str!("../clusters/sahara_desert.toml")),
];

/// Returns all registered clusters.
///
/// # Errors
///
/// Returns [`ClusterConfigError`] if an embedded file fails to parse or
/// declares an inverted bounding box.
pub fn all_clusters() -> Result<Vec<ClusterDefinition>, ClusterConfigError> {
    CLUSTER_TOMLS
        .iter()
        .map(|(name, toml_str)| parse_cluster(name, toml_str))
        .collect()
}

/// Returns the cluster with the given id, if registered.
///
/// # Errors
///
/// Returns [`ClusterConfigError`] if the registry fails to load.
pub fn find_cluster(id: &str) -> Result<Option<ClusterDefinition>, ClusterConfigError> {
    Ok(all_clusters()?.into_iter().find(|c| c.id == id))
}

fn parse_cluster(name: &str, toml_str: &str) -> Result<ClusterDefinition, ClusterConfigError> {
    let cluster: ClusterDefinition =
        toml::de::from_str(toml_str).map_err(|e| ClusterConfigError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    let boxes = cluster
        .bounds
        .iter()
        .map(|b| ("bounds", b))
        .chain(cluster.exclusions.iter().map(|z| (z.name.as_str(), &z.bounds)));
    for (label, bounds) in boxes {
        if !bounds.is_valid() {
            return Err(ClusterConfigError::InvalidBounds {
                cluster: cluster.id.clone(),
                zone: label.to_string(),
            });
        }
    }

    Ok(cluster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Selector;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_clusters() {
        let clusters = all_clusters().unwrap();
        assert_eq!(
            clusters.len(),
            EXPECTED_CLUSTER_COUNT,
            "Expected {EXPECTED_CLUSTER_COUNT} clusters, found {}. \
             Update EXPECTED_CLUSTER_COUNT after adding/removing clusters.",
            clusters.len()
        );
    }

    #[test]
    fn cluster_ids_are_unique() {
        let clusters = all_clusters().unwrap();
        let mut seen = BTreeSet::new();
        for cluster in &clusters {
            assert!(seen.insert(&cluster.id), "Duplicate cluster ID: {}", cluster.id);
        }
    }

    #[test]
    fn registry_names_match_ids() {
        let clusters = all_clusters().unwrap();
        for ((name, _), cluster) in CLUSTER_TOMLS.iter().zip(&clusters) {
            assert_eq!(*name, cluster.id);
            assert!(!cluster.name.is_empty(), "Cluster {} has empty name", cluster.id);
        }
    }

    #[test]
    fn border_cluster_has_three_exclusions() {
        let border = find_cluster("mexico_us_border").unwrap().unwrap();
        assert_eq!(border.exclusions.len(), 3);
        assert!(matches!(border.selector, Selector::Regions { ref regions } if regions.len() == 2));
    }

    #[test]
    fn sahara_cluster_selects_by_route() {
        let sahara = find_cluster("sahara_desert").unwrap().unwrap();
        assert_eq!(
            sahara.selector,
            Selector::Route {
                route: "Sahara Desert crossing".to_string()
            }
        );
        assert!(sahara.bounds.is_some());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let text = r#"
id = "broken"
name = "Broken"

[selector]
type = "regions"
regions = ["Europe"]

[bounds]
min_lat = 10.0
max_lat = 5.0
min_lon = 0.0
max_lon = 1.0
"#;
        let err = parse_cluster("broken", text).unwrap_err();
        assert!(matches!(err, ClusterConfigError::InvalidBounds { .. }));
    }
}
