//! Aggregate engine.
//!
//! Pure reducers over the filtered set: summary totals, yield per bus line,
//! revenue per age group and the per-time-slot trend. Each reducer is a single
//! pass over its input with an insertion-ordered grouping map.

pub mod aggregate;
pub mod group;
pub mod types;
pub mod utility;
