//! Shared fixtures for unit tests.

use moc_tracks::{Segment, SegmentFormation, TrackSpec, TrackStore, TrackStoreBuilder};

/// A dedicated pool with `threads` workers.
pub(crate) fn pool(threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .unwrap()
}

/// One half-angle with 3 x-tracks and 2 y-tracks, each made of two
/// unit-length segments. Segment `s` of track `t` sits in region
/// `2 * t + s`.
pub(crate) fn scenario_builder(formation: SegmentFormation) -> TrackStoreBuilder {
    let tracks = (0..5u32)
        .map(|t| {
            TrackSpec::new(vec![
                Segment::new(1.0, t % 2, 2 * t).with_surfaces(Some(t), None),
                Segment::new(1.0, 1, 2 * t + 1).with_surfaces(None, Some(t + 10)),
            ])
        })
        .collect();

    let mut builder = TrackStoreBuilder::new(formation);
    builder.add_azim(3, 2, tracks);
    builder
}

/// [`scenario_builder`] for explicit 2D segments.
pub(crate) fn scenario_store() -> TrackStore {
    scenario_builder(SegmentFormation::Explicit2D).build().unwrap()
}

/// A ring of tracks over `num_surfaces` boundary surfaces.
///
/// Track `t` enters through surface `t % num_surfaces` and leaves through
/// `(t + 1) % num_surfaces`. Lengths are small integers so sums are exact.
pub(crate) fn ring_store(num_tracks: u32, num_surfaces: u32) -> TrackStore {
    let half = (num_tracks / 2) as usize;
    let tracks = (0..num_tracks)
        .map(|t| {
            let count = 1 + t % 4;
            let segments = (0..count)
                .map(|s| {
                    let fwd = (s == 0).then_some(t % num_surfaces);
                    let bwd = (s + 1 == count).then_some((t + 1) % num_surfaces);
                    Segment::new(f64::from(1 + (t + s) % 3), 0, t).with_surfaces(fwd, bwd)
                })
                .collect();
            TrackSpec::new(segments)
        })
        .collect();

    let mut builder = TrackStoreBuilder::new(SegmentFormation::Explicit2D);
    builder.add_azim(half, num_tracks as usize - half, tracks);
    builder.build().unwrap()
}
