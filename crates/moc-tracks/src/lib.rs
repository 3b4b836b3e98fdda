#![warn(missing_docs)]

//! Track and segment store for method of characteristics sweeps.
//!
//! A track is a directed ray through the problem geometry, cut into
//! segments that each lie inside one homogeneous region. This crate holds
//! a finished set of tracks in contiguous arenas and exposes the two
//! orderings a sweep needs: by azimuthal half-angle, and by parallel group.
//!
//! # Architecture
//!
//! - [`Segment`] - Length, material, region and boundary surfaces
//! - [`Track`] - Ordered segment range plus angle, group and weight
//! - [`TrackStore`] - Immutable arena of tracks and segments
//! - [`TrackStoreBuilder`] - Validating constructor
//! - [`groups`] - Conflict-free parallel group assignment
//!
//! Laying tracks and clipping segments against the geometry happens
//! upstream; the store only receives the result.

pub mod error;
pub mod groups;
mod segment;
mod store;
mod track;

pub use error::{Result, TrackError};
pub use groups::{assign_parallel_groups, validate_parallel_groups};
pub use segment::{Segment, SegmentFormation};
pub use store::{TrackStore, TrackStoreBuilder};
pub use track::{Track, TrackId, TrackSpec};

/// Material identifier.
pub type MaterialId = u32;

/// Flat source region identifier.
pub type RegionId = u32;

/// Boundary surface identifier.
pub type SurfaceId = u32;

/// A point in the 2D track plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the 2D track plane.
pub type Vec2 = nalgebra::Vector2<f64>;
