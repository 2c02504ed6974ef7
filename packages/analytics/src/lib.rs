#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering, aggregation, and color assignment over the incident table.
//!
//! [`filter`] turns a user selection into a subset, [`aggregate`] turns a
//! subset into chart rows, and [`charts`] wires the two together per
//! visualization. Nothing here mutates the table or keeps state between
//! calls.

pub mod aggregate;
pub mod charts;
pub mod color;
pub mod filter;

pub use aggregate::summary;
pub use color::{CATEGORY10, ColorAssignment};
