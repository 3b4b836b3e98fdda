//! Error types for track store construction.

use thiserror::Error;

use crate::track::TrackId;
use crate::SurfaceId;

/// Errors that can occur while building a [`TrackStore`](crate::TrackStore).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// A track was added to a half-angle that was never declared.
    #[error("azimuthal angle {azim} has not been declared")]
    UnknownAngle {
        /// Requested half-angle index.
        azim: usize,
    },

    /// An azimuthal half-angle holds the wrong number of tracks.
    #[error("azimuthal angle {azim} expects {expected} tracks, found {found}")]
    TrackCount {
        /// Half-angle index.
        azim: usize,
        /// `num_x + num_y` declared for the angle.
        expected: usize,
        /// Tracks actually supplied.
        found: usize,
    },

    /// A segment length is zero, negative, or not finite.
    #[error("segment {position} of track {track} has invalid length {length}")]
    InvalidSegment {
        /// Owning track.
        track: TrackId,
        /// Position of the segment within the track.
        position: usize,
        /// Offending length.
        length: f64,
    },

    /// A parallel group names a track uid that does not exist.
    #[error("parallel group {group} references unknown track {uid}")]
    UnknownTrack {
        /// Group index.
        group: usize,
        /// Track uid.
        uid: usize,
    },

    /// A track appears in more than one parallel group.
    #[error("track {uid} appears in parallel groups {first} and {second}")]
    DuplicateTrack {
        /// Track uid.
        uid: usize,
        /// First group the track was seen in.
        first: usize,
        /// Second group the track was seen in.
        second: usize,
    },

    /// A track belongs to no parallel group.
    #[error("track {0} is not assigned to any parallel group")]
    UngroupedTrack(usize),

    /// A parallel group has no members.
    #[error("parallel group {0} is empty")]
    EmptyGroup(usize),

    /// Two tracks of one parallel group share a boundary surface.
    #[error("tracks {first} and {second} in parallel group {group} share surface {surface}")]
    SurfaceConflict {
        /// Group index.
        group: usize,
        /// Shared surface id.
        surface: SurfaceId,
        /// Track uid that claimed the surface first.
        first: usize,
        /// Track uid that collided with it.
        second: usize,
    },
}

/// Result type for track store operations.
pub type Result<T> = std::result::Result<T, TrackError>;
