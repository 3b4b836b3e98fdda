//! Segments and segment formation modes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MaterialId, RegionId, SurfaceId};

/// A piece of a track lying inside one homogeneous region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Length of the segment along the track.
    pub length: f64,
    /// Material filling the region.
    pub material: MaterialId,
    /// Flat source region the segment crosses.
    pub region: RegionId,
    /// Boundary surface at the forward end, if any.
    pub surface_fwd: Option<SurfaceId>,
    /// Boundary surface at the backward end, if any.
    pub surface_bwd: Option<SurfaceId>,
}

impl Segment {
    /// Create a segment that touches no boundary surface.
    pub fn new(length: f64, material: MaterialId, region: RegionId) -> Self {
        Self {
            length,
            material,
            region,
            surface_fwd: None,
            surface_bwd: None,
        }
    }

    /// Set the forward and backward boundary surfaces.
    pub fn with_surfaces(mut self, fwd: Option<SurfaceId>, bwd: Option<SurfaceId>) -> Self {
        self.surface_fwd = fwd;
        self.surface_bwd = bwd;
        self
    }

    /// Boundary surfaces touched by this segment, forward first.
    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> {
        self.surface_fwd.into_iter().chain(self.surface_bwd)
    }
}

/// How the segments of a track set were produced and stored.
///
/// New formations may be added; consumers must reject the ones they
/// cannot traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SegmentFormation {
    /// Segments of 2D tracks are generated up front and stored.
    Explicit2D,
    /// Segments of 3D (stacked) tracks are generated up front and stored.
    Explicit3D,
}

impl fmt::Display for SegmentFormation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentFormation::Explicit2D => write!(f, "explicit 2D"),
            SegmentFormation::Explicit3D => write!(f, "explicit 3D"),
        }
    }
}
