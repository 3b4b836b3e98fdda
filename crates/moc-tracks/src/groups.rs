//! Parallel track groups.
//!
//! A parallel group is a batch of tracks that may be processed
//! concurrently: no two tracks in one group touch the same boundary
//! surface, so per-surface accumulation inside a group never collides.
//! Groups are processed in index order.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TrackError};
use crate::segment::Segment;
use crate::track::Track;
use crate::SurfaceId;

/// Distinct boundary surfaces touched by a track, in first-touch order.
fn track_surfaces(track: &Track, segments: &[Segment]) -> Vec<SurfaceId> {
    let mut seen = HashSet::new();
    segments[track.segment_range()]
        .iter()
        .flat_map(Segment::surfaces)
        .filter(|s| seen.insert(*s))
        .collect()
}

/// Partition tracks into conflict-free parallel groups.
///
/// Tracks are visited in uid order; each one joins the lowest-indexed group
/// that uses none of its boundary surfaces, or opens a new group.
/// Tracks touching no surface always land in group 0.
pub fn assign_parallel_groups(tracks: &[Track], segments: &[Segment]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut used: Vec<HashSet<SurfaceId>> = Vec::new();

    for track in tracks {
        let surfaces = track_surfaces(track, segments);
        let slot = used
            .iter()
            .position(|taken| surfaces.iter().all(|s| !taken.contains(s)));

        let g = match slot {
            Some(g) => g,
            None => {
                groups.push(Vec::new());
                used.push(HashSet::new());
                groups.len() - 1
            }
        };
        groups[g].push(track.uid());
        used[g].extend(surfaces);
    }

    groups
}

/// Check that `groups` is a conflict-free disjoint cover of `tracks`.
pub fn validate_parallel_groups(
    tracks: &[Track],
    segments: &[Segment],
    groups: &[Vec<usize>],
) -> Result<()> {
    let mut owner: Vec<Option<usize>> = vec![None; tracks.len()];

    for (group, members) in groups.iter().enumerate() {
        if members.is_empty() {
            return Err(TrackError::EmptyGroup(group));
        }

        let mut claimed: HashMap<SurfaceId, usize> = HashMap::new();
        for &uid in members {
            let track = tracks
                .get(uid)
                .ok_or(TrackError::UnknownTrack { group, uid })?;

            if let Some(first) = owner[uid] {
                return Err(TrackError::DuplicateTrack {
                    uid,
                    first,
                    second: group,
                });
            }
            owner[uid] = Some(group);

            for surface in track_surfaces(track, segments) {
                let first = *claimed.entry(surface).or_insert(uid);
                if first != uid {
                    return Err(TrackError::SurfaceConflict {
                        group,
                        surface,
                        first,
                        second: uid,
                    });
                }
            }
        }
    }

    match owner.iter().position(Option::is_none) {
        Some(uid) => Err(TrackError::UngroupedTrack(uid)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackId;
    use crate::Point2;

    /// Build tracks whose single segment touches the given surfaces.
    fn fixture(surfaces: &[(Option<SurfaceId>, Option<SurfaceId>)]) -> (Vec<Track>, Vec<Segment>) {
        let mut tracks = Vec::new();
        let mut segments = Vec::new();
        for (uid, &(fwd, bwd)) in surfaces.iter().enumerate() {
            segments.push(Segment::new(1.0, 0, 0).with_surfaces(fwd, bwd));
            tracks.push(Track {
                id: TrackId { azim: 0, index: uid },
                uid,
                group: 0,
                weight: 1.0,
                start: Point2::origin(),
                end: Point2::new(1.0, 0.0),
                segments: uid..uid + 1,
            });
        }
        (tracks, segments)
    }

    #[test]
    fn test_greedy_groups_are_valid() {
        let (tracks, segments) = fixture(&[
            (Some(0), Some(1)),
            (Some(1), Some(2)),
            (Some(2), Some(3)),
            (Some(3), Some(0)),
            (None, None),
        ]);
        let groups = assign_parallel_groups(&tracks, &segments);

        assert_eq!(groups, vec![vec![0, 2, 4], vec![1, 3]]);
        assert!(validate_parallel_groups(&tracks, &segments, &groups).is_ok());
    }

    #[test]
    fn test_self_shared_surface_is_not_a_conflict() {
        let (tracks, segments) = fixture(&[(Some(5), Some(5)), (Some(6), None)]);
        let groups = assign_parallel_groups(&tracks, &segments);
        assert_eq!(groups, vec![vec![0, 1]]);
    }

    #[test]
    fn test_surface_conflict_rejected() {
        let (tracks, segments) = fixture(&[(Some(0), None), (None, Some(0))]);
        let err = validate_parallel_groups(&tracks, &segments, &[vec![0, 1]]).unwrap_err();
        assert_eq!(
            err,
            TrackError::SurfaceConflict {
                group: 0,
                surface: 0,
                first: 0,
                second: 1,
            }
        );
    }

    #[test]
    fn test_partition_errors() {
        let (tracks, segments) = fixture(&[(None, None), (None, None), (None, None)]);

        assert_eq!(
            validate_parallel_groups(&tracks, &segments, &[vec![0, 1], vec![]]),
            Err(TrackError::EmptyGroup(1))
        );
        assert_eq!(
            validate_parallel_groups(&tracks, &segments, &[vec![0, 7]]),
            Err(TrackError::UnknownTrack { group: 0, uid: 7 })
        );
        assert_eq!(
            validate_parallel_groups(&tracks, &segments, &[vec![0, 1], vec![1, 2]]),
            Err(TrackError::DuplicateTrack {
                uid: 1,
                first: 0,
                second: 1,
            })
        );
        assert_eq!(
            validate_parallel_groups(&tracks, &segments, &[vec![0], vec![2]]),
            Err(TrackError::UngroupedTrack(1))
        );
    }
}
