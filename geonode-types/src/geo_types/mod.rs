//! Interoperability with the [`geo_types`] crate.

mod coord;
mod geometry;
