//! Categorical color assignment.
//!
//! Distinct values get palette colors in first-encounter order, cycling
//! once the palette runs out. The assignment is recomputed for every
//! filtered subset, so the same value may get a different color under a
//! different selection.

use std::collections::HashMap;

use missing_migrants_analytics_models::CategoryColor;
use missing_migrants_incident_models::{CategoricalColumn, Incident};

/// The ten-color `category10` palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Palette color for the `index`-th distinct value.
#[must_use]
pub const fn palette_color(index: usize) -> &'static str {
    CATEGORY10[index % CATEGORY10.len()]
}

/// Value → color mapping for one pass over a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    entries: Vec<CategoryColor>,
    index: HashMap<String, usize>,
}

impl ColorAssignment {
    /// Assigns colors to the non-null values of `column` across `rows`.
    #[must_use]
    pub fn for_column(rows: &[&Incident], column: CategoricalColumn) -> Self {
        Self::from_values(rows.iter().filter_map(|row| row.categorical(column)))
    }

    /// Assigns colors to `values` in first-encounter order.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut assignment = Self::default();
        for value in values {
            if assignment.index.contains_key(value) {
                continue;
            }
            let position = assignment.entries.len();
            assignment.entries.push(CategoryColor {
                value: value.to_string(),
                color: palette_color(position).to_string(),
            });
            assignment.index.insert(value.to_string(), position);
        }
        assignment
    }

    /// Color of `value`, if it occurred.
    #[must_use]
    pub fn color_of(&self, value: &str) -> Option<&str> {
        self.index
            .get(value)
            .map(|&i| self.entries[i].color.as_str())
    }

    /// Legend entries in first-encounter order.
    #[must_use]
    pub fn entries(&self) -> &[CategoryColor] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
