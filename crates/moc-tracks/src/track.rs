//! Tracks: directed rays made of ordered segments.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::segment::Segment;
use crate::{Point2, Vec2};

/// Identifies a track by azimuthal half-angle and position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId {
    /// Azimuthal half-angle index.
    pub azim: usize,
    /// Index of the track within its half-angle.
    pub index: usize,
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.azim, self.index)
    }
}

/// A track stored in a [`TrackStore`](crate::TrackStore).
///
/// The track does not own its segments: they live in the store's segment
/// arena and are reached through [`TrackStore::segments`](crate::TrackStore::segments).
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub(crate) id: TrackId,
    pub(crate) uid: usize,
    pub(crate) group: usize,
    pub(crate) weight: f64,
    pub(crate) start: Point2,
    pub(crate) end: Point2,
    pub(crate) segments: Range<usize>,
}

impl Track {
    /// Angle and in-angle index of this track.
    #[inline]
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Position of this track in the store's track arena.
    #[inline]
    pub fn uid(&self) -> usize {
        self.uid
    }

    /// Azimuthal half-angle index.
    #[inline]
    pub fn azim(&self) -> usize {
        self.id.azim
    }

    /// Parallel group this track belongs to.
    #[inline]
    pub fn parallel_group(&self) -> usize {
        self.group
    }

    /// Quadrature weight (azimuthal weight times track spacing).
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Entry point of the track into the domain.
    pub fn start(&self) -> Point2 {
        self.start
    }

    /// Exit point of the track from the domain.
    pub fn end(&self) -> Point2 {
        self.end
    }

    /// Unit direction from start to end.
    ///
    /// Degenerate tracks report the +x axis.
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start)
            .try_normalize(0.0)
            .unwrap_or_else(Vec2::x)
    }

    /// Azimuthal angle of the track direction in radians.
    pub fn phi(&self) -> f64 {
        let d = self.direction();
        d.y.atan2(d.x)
    }

    /// Number of segments along this track.
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Range of this track's segments in the store's segment arena.
    #[inline]
    pub fn segment_range(&self) -> Range<usize> {
        self.segments.clone()
    }
}

/// Input description of one track, consumed by
/// [`TrackStoreBuilder::add_azim`](crate::TrackStoreBuilder::add_azim).
#[derive(Debug, Clone)]
pub struct TrackSpec {
    /// Segments in traversal order.
    pub segments: Vec<Segment>,
    /// Quadrature weight.
    pub weight: f64,
    /// Entry point.
    pub start: Point2,
    /// Exit point. When `None` the track runs along +x for its total length.
    pub end: Option<Point2>,
}

impl TrackSpec {
    /// Create a track at the origin with unit weight.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            weight: 1.0,
            start: Point2::origin(),
            end: None,
        }
    }

    /// Set the quadrature weight.
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the entry and exit points.
    pub fn endpoints(mut self, start: Point2, end: Point2) -> Self {
        self.start = start;
        self.end = Some(end);
        self
    }

    /// Sum of the segment lengths.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }
}
