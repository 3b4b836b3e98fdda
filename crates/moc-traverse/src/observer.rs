//! Per-track observer hooks.

use std::sync::OnceLock;

use moc_tracks::{Point2, RegionId, Segment, Track, TrackStore};

use crate::atomic::AtomicF64;
use crate::kernel::KernelError;

/// A callback run once per track after its segments have been processed.
///
/// Runs even when the sweep has no kernel. The default does nothing.
pub trait TrackObserver: Sync {
    /// Observe a finished track and its segments.
    fn on_track(&self, track: &Track, segments: &[Segment]) -> Result<(), KernelError> {
        let _ = (track, segments);
        Ok(())
    }
}

impl<O: TrackObserver + ?Sized> TrackObserver for &O {
    fn on_track(&self, track: &Track, segments: &[Segment]) -> Result<(), KernelError> {
        (**self).on_track(track, segments)
    }
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TrackObserver for NoopObserver {}

/// Records the total segment length of every track, indexed by uid.
#[derive(Debug)]
pub struct TrackLengthObserver {
    lengths: Vec<AtomicF64>,
}

impl TrackLengthObserver {
    /// Create an observer with one slot per track of `store`.
    pub fn for_store(store: &TrackStore) -> Self {
        Self {
            lengths: (0..store.num_tracks()).map(|_| AtomicF64::default()).collect(),
        }
    }

    /// Recorded lengths by track uid. Unvisited tracks read 0.
    pub fn lengths(&self) -> Vec<f64> {
        self.lengths.iter().map(AtomicF64::load).collect()
    }
}

impl TrackObserver for TrackLengthObserver {
    fn on_track(&self, track: &Track, segments: &[Segment]) -> Result<(), KernelError> {
        let slot = self.lengths.get(track.uid()).ok_or_else(|| {
            format!(
                "track uid {} outside {} length slots",
                track.uid(),
                self.lengths.len()
            )
        })?;
        slot.store(segments.iter().map(|s| s.length).sum());
        Ok(())
    }
}

/// End points of one segment in the track plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCoords {
    /// Where the segment begins.
    pub start: Point2,
    /// Where the segment ends.
    pub end: Point2,
    /// Region the segment crosses.
    pub region: RegionId,
}

/// Writes the coordinates of every segment into a flat buffer.
///
/// The buffer has one slot per segment of the store, in store order, so
/// tracks write disjoint ranges. Writing a slot twice is an error.
#[derive(Debug)]
pub struct SegmentCoordsObserver {
    slots: Vec<OnceLock<SegmentCoords>>,
}

impl SegmentCoordsObserver {
    /// Create a buffer sized for every segment of `store`.
    pub fn for_store(store: &TrackStore) -> Self {
        Self {
            slots: (0..store.num_segments()).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Coordinates written so far, `None` for untouched slots.
    pub fn into_coords(self) -> Vec<Option<SegmentCoords>> {
        self.slots.into_iter().map(OnceLock::into_inner).collect()
    }
}

impl TrackObserver for SegmentCoordsObserver {
    fn on_track(&self, track: &Track, segments: &[Segment]) -> Result<(), KernelError> {
        let range = track.segment_range();
        let slots = self
            .slots
            .get(range.clone())
            .filter(|slots| slots.len() == segments.len())
            .ok_or_else(|| format!("segments {range:?} do not fit the coordinate buffer"))?;

        let direction = track.direction();
        let mut point = track.start();
        for (offset, (segment, slot)) in segments.iter().zip(slots).enumerate() {
            let end = point + direction * segment.length;
            slot.set(SegmentCoords {
                start: point,
                end,
                region: segment.region,
            })
            .map_err(|_| format!("segment slot {} written twice", range.start + offset))?;
            point = end;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{pool, ring_store, scenario_store};
    use crate::{CounterKernel, TraverseError, TraverseTracks};
    use approx::assert_relative_eq;
    use moc_tracks::{SegmentFormation, TrackSpec, TrackStoreBuilder};

    #[test]
    fn test_track_lengths() {
        let store = ring_store(20, 6);
        let engine = TraverseTracks::with_observer(&store, TrackLengthObserver::for_store(&store));
        pool(4).install(|| engine.observe_by_group()).unwrap();

        let lengths = engine.observer().lengths();
        for track in store.tracks() {
            let expected: f64 = store.segments(track).iter().map(|s| s.length).sum();
            assert_relative_eq!(lengths[track.uid()], expected);
        }
    }

    #[test]
    fn test_observer_runs_alongside_kernel() {
        let store = scenario_store();
        let counter = CounterKernel::new();
        let engine = TraverseTracks::with_observer(&store, TrackLengthObserver::for_store(&store));
        engine.sweep_all(Some(&counter)).unwrap();

        assert_eq!(counter.count(), 10);
        assert!(engine.into_observer().lengths().iter().all(|&l| l == 2.0));
    }

    #[test]
    fn test_segment_coords() {
        let mut builder = TrackStoreBuilder::new(SegmentFormation::Explicit2D);
        builder.add_azim(
            1,
            1,
            vec![
                TrackSpec::new(vec![Segment::new(1.0, 0, 4), Segment::new(2.0, 0, 5)])
                    .endpoints(Point2::new(0.0, 1.0), Point2::new(3.0, 1.0)),
                TrackSpec::new(vec![Segment::new(0.5, 0, 6), Segment::new(0.5, 0, 7)])
                    .endpoints(Point2::new(2.0, 0.0), Point2::new(2.0, 1.0)),
            ],
        );
        let store = builder.build().unwrap();

        let observer = SegmentCoordsObserver::for_store(&store);
        let engine = TraverseTracks::with_observer(&store, observer);
        pool(2).install(|| engine.observe_all()).unwrap();
        let coords: Vec<SegmentCoords> = engine
            .into_observer()
            .into_coords()
            .into_iter()
            .map(Option::unwrap)
            .collect();

        assert_eq!(coords.len(), 4);
        assert_relative_eq!(coords[0].start.x, 0.0);
        assert_relative_eq!(coords[0].end.x, 1.0);
        assert_relative_eq!(coords[1].start.x, 1.0);
        assert_relative_eq!(coords[1].end.x, 3.0);
        assert_relative_eq!(coords[1].end.y, 1.0);
        assert_eq!(coords[1].region, 5);
        assert_relative_eq!(coords[3].start.y, 0.5);
        assert_relative_eq!(coords[3].end.y, 1.0);
        assert_relative_eq!(coords[3].end.x, 2.0);
        assert_eq!(coords[3].region, 7);
    }

    #[test]
    fn test_segment_coords_written_once() {
        let store = scenario_store();
        let observer = SegmentCoordsObserver::for_store(&store);
        let engine = TraverseTracks::with_observer(&store, observer);
        engine.observe_all().unwrap();

        let err = engine.observe_all().unwrap_err();
        assert!(matches!(err, TraverseError::Observer { .. }));
        assert!(!err.to_string().contains("written twice"));
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().contains("written twice"));
    }

    #[test]
    fn test_buffer_from_other_store() {
        let small = scenario_store();
        let large = ring_store(30, 4);
        let engine = TraverseTracks::with_observer(&large, TrackLengthObserver::for_store(&small));
        assert!(matches!(
            engine.observe_all(),
            Err(TraverseError::Observer { .. })
        ));
    }

    #[test]
    fn test_noop_observer() {
        let store = scenario_store();
        let track = &store.tracks()[0];
        assert!(NoopObserver.on_track(track, store.segments(track)).is_ok());
    }
}
