//! Arena storage for tracks and segments.

use std::ops::Range;

use tracing::debug;

use crate::error::{Result, TrackError};
use crate::groups::{assign_parallel_groups, validate_parallel_groups};
use crate::segment::{Segment, SegmentFormation};
use crate::track::{Track, TrackId, TrackSpec};
use crate::Vec2;

/// Track counts of one azimuthal half-angle.
#[derive(Debug, Clone, Copy)]
struct AzimSpan {
    num_x: usize,
    num_y: usize,
    first: usize,
}

/// Immutable set of tracks and their segments.
///
/// Tracks sit contiguously ordered by azimuthal half-angle; segments live
/// in one arena with each track owning a contiguous range. A second
/// ordering lists track uids by parallel group.
#[derive(Debug, Clone)]
pub struct TrackStore {
    formation: SegmentFormation,
    tracks: Vec<Track>,
    segments: Vec<Segment>,
    azims: Vec<AzimSpan>,
    group_order: Vec<usize>,
    group_offsets: Vec<usize>,
    num_surfaces: usize,
}

impl TrackStore {
    /// How the segments were formed.
    pub fn segment_formation(&self) -> SegmentFormation {
        self.formation
    }

    /// Number of azimuthal angles in the full quadrature.
    ///
    /// Only half of them are stored; the rest follow by symmetry.
    pub fn num_azim(&self) -> usize {
        2 * self.azims.len()
    }

    /// Number of stored azimuthal half-angles.
    pub fn num_half_azim(&self) -> usize {
        self.azims.len()
    }

    /// Tracks of half-angle `azim` entering through the x boundary.
    ///
    /// # Panics
    ///
    /// Panics if `azim >= num_half_azim()`.
    pub fn num_x(&self, azim: usize) -> usize {
        self.azims[azim].num_x
    }

    /// Tracks of half-angle `azim` entering through the y boundary.
    ///
    /// # Panics
    ///
    /// Panics if `azim >= num_half_azim()`.
    pub fn num_y(&self, azim: usize) -> usize {
        self.azims[azim].num_y
    }

    /// All tracks of half-angle `azim`, in index order.
    ///
    /// # Panics
    ///
    /// Panics if `azim >= num_half_azim()`.
    pub fn tracks_in_azim(&self, azim: usize) -> &[Track] {
        let span = self.azims[azim];
        &self.tracks[span.first..span.first + span.num_x + span.num_y]
    }

    /// All tracks in uid order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track with the given uid.
    pub fn track(&self, uid: usize) -> Option<&Track> {
        self.tracks.get(uid)
    }

    /// Total number of tracks.
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of segments over all tracks.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Segments of `track` in traversal order.
    ///
    /// # Panics
    ///
    /// Panics if `track` does not come from this store.
    pub fn segments(&self, track: &Track) -> &[Segment] {
        &self.segments[track.segment_range()]
    }

    /// One past the largest boundary surface id referenced by any segment.
    pub fn num_surfaces(&self) -> usize {
        self.num_surfaces
    }

    /// Number of parallel groups.
    pub fn num_parallel_groups(&self) -> usize {
        self.group_offsets.len() - 1
    }

    /// Number of tracks in parallel group `group`.
    ///
    /// # Panics
    ///
    /// Panics if `group >= num_parallel_groups()`.
    pub fn num_tracks_by_parallel_group(&self, group: usize) -> usize {
        self.parallel_group_range(group).len()
    }

    /// Positions of group `group` in the group-ordered track list.
    ///
    /// # Panics
    ///
    /// Panics if `group >= num_parallel_groups()`.
    pub fn parallel_group_range(&self, group: usize) -> Range<usize> {
        self.group_offsets[group]..self.group_offsets[group + 1]
    }

    /// Track at `position` in the group-ordered track list.
    ///
    /// # Panics
    ///
    /// Panics if `position >= num_tracks()`.
    #[inline]
    pub fn track_by_parallel_group(&self, position: usize) -> &Track {
        &self.tracks[self.group_order[position]]
    }

    /// Tracks ordered by parallel group.
    pub fn tracks_by_parallel_group(&self) -> impl ExactSizeIterator<Item = &Track> + '_ {
        self.group_order.iter().map(|&uid| &self.tracks[uid])
    }
}

/// A half-angle waiting to be built.
#[derive(Debug, Clone)]
struct PendingAzim {
    num_x: usize,
    num_y: usize,
    tracks: Vec<TrackSpec>,
}

/// Builder for [`TrackStore`].
///
/// # Example
///
/// ```
/// use moc_tracks::{Segment, SegmentFormation, TrackSpec, TrackStoreBuilder};
///
/// let seg = Segment::new(1.0, 0, 0);
/// let mut builder = TrackStoreBuilder::new(SegmentFormation::Explicit2D);
/// builder.add_azim(1, 1, vec![
///     TrackSpec::new(vec![seg, seg]),
///     TrackSpec::new(vec![seg]),
/// ]);
/// let azim = builder.add_azim(1, 0, Vec::new());
/// assert_eq!(builder.add_track(azim, TrackSpec::new(vec![seg])).unwrap(), 2);
///
/// let store = builder.build().unwrap();
/// assert_eq!(store.num_tracks(), 3);
/// assert_eq!(store.num_segments(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TrackStoreBuilder {
    formation: SegmentFormation,
    azims: Vec<PendingAzim>,
    groups: Option<Vec<Vec<usize>>>,
}

impl TrackStoreBuilder {
    /// Start an empty store.
    pub fn new(formation: SegmentFormation) -> Self {
        Self {
            formation,
            azims: Vec::new(),
            groups: None,
        }
    }

    /// Declare a half-angle expecting `num_x + num_y` tracks and return its
    /// index.
    ///
    /// `tracks` may hold all of them, some, or none; the rest follow through
    /// [`add_track`](Self::add_track). Track uids continue from the previous
    /// half-angle, so the tracks of the `n`th angle get uids following those
    /// of all earlier angles.
    pub fn add_azim(&mut self, num_x: usize, num_y: usize, tracks: Vec<TrackSpec>) -> usize {
        self.azims.push(PendingAzim {
            num_x,
            num_y,
            tracks,
        });
        self.azims.len() - 1
    }

    /// Append a track to the declared half-angle `azim` and return its uid.
    ///
    /// The uid counts the declared tracks of every earlier angle, so it
    /// holds once [`build`](Self::build) confirms those counts.
    pub fn add_track(&mut self, azim: usize, spec: TrackSpec) -> Result<usize> {
        let first: usize = self
            .azims
            .iter()
            .take(azim)
            .map(|pending| pending.num_x + pending.num_y)
            .sum();
        let pending = self
            .azims
            .get_mut(azim)
            .ok_or(TrackError::UnknownAngle { azim })?;
        let uid = first + pending.tracks.len();
        pending.tracks.push(spec);
        Ok(uid)
    }

    /// Use an explicit parallel-group partition, given as lists of track
    /// uids in processing order.
    ///
    /// Without one, [`assign_parallel_groups`] picks the groups.
    pub fn parallel_groups(&mut self, groups: Vec<Vec<usize>>) -> &mut Self {
        self.groups = Some(groups);
        self
    }

    /// Validate the input and freeze it into a store.
    pub fn build(self) -> Result<TrackStore> {
        let mut tracks: Vec<Track> = Vec::new();
        let mut segments: Vec<Segment> = Vec::new();
        let mut azims = Vec::with_capacity(self.azims.len());

        for (azim, pending) in self.azims.into_iter().enumerate() {
            let expected = pending.num_x + pending.num_y;
            if pending.tracks.len() != expected {
                return Err(TrackError::TrackCount {
                    azim,
                    expected,
                    found: pending.tracks.len(),
                });
            }

            let first = tracks.len();
            for (index, spec) in pending.tracks.into_iter().enumerate() {
                let id = TrackId { azim, index };
                if let Some((position, seg)) = spec
                    .segments
                    .iter()
                    .enumerate()
                    .find(|(_, s)| !(s.length.is_finite() && s.length > 0.0))
                {
                    return Err(TrackError::InvalidSegment {
                        track: id,
                        position,
                        length: seg.length,
                    });
                }

                let length = spec.length();
                let end = spec
                    .end
                    .unwrap_or_else(|| spec.start + Vec2::new(length, 0.0));
                let begin = segments.len();
                segments.extend_from_slice(&spec.segments);

                tracks.push(Track {
                    id,
                    uid: tracks.len(),
                    group: 0,
                    weight: spec.weight,
                    start: spec.start,
                    end,
                    segments: begin..segments.len(),
                });
            }

            azims.push(AzimSpan {
                num_x: pending.num_x,
                num_y: pending.num_y,
                first,
            });
        }

        let groups = match self.groups {
            Some(groups) => {
                validate_parallel_groups(&tracks, &segments, &groups)?;
                groups
            }
            None => assign_parallel_groups(&tracks, &segments),
        };

        let mut group_order = Vec::with_capacity(tracks.len());
        let mut group_offsets = Vec::with_capacity(groups.len() + 1);
        group_offsets.push(0);
        for (group, members) in groups.iter().enumerate() {
            for &uid in members {
                tracks[uid].group = group;
                group_order.push(uid);
            }
            group_offsets.push(group_order.len());
        }

        let num_surfaces = segments
            .iter()
            .flat_map(Segment::surfaces)
            .max()
            .map_or(0, |s| s as usize + 1);

        debug!(
            formation = %self.formation,
            half_angles = azims.len(),
            tracks = tracks.len(),
            segments = segments.len(),
            groups = groups.len(),
            "built track store"
        );

        Ok(TrackStore {
            formation: self.formation,
            tracks,
            segments,
            azims,
            group_order,
            group_offsets,
            num_surfaces,
        })
    }
}
