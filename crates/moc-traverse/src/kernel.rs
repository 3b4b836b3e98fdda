//! The per-segment kernel interface.

use moc_tracks::{MaterialId, RegionId, SurfaceId, Track};

/// Error returned by kernels and observers.
pub type KernelError = Box<dyn std::error::Error + Send + Sync>;

/// A computation applied to every segment of every track in a sweep.
///
/// One kernel instance is shared by all workers of a sweep. Anything it
/// accumulates across tracks must either be thread-safe or be indexed so
/// that the parallel-group ordering keeps concurrent writers apart.
/// Per-track scratch lives in [`TrackState`](Self::TrackState), which is
/// owned by the worker processing that track.
pub trait SegmentKernel: Sync {
    /// Scratch state for the track being processed.
    type TrackState;

    /// Prepare for a new track. Called once before its first segment.
    fn new_track(&self, track: &Track) -> Result<Self::TrackState, KernelError>;

    /// Process one segment. Called once per segment in stored order.
    fn execute(
        &self,
        state: &mut Self::TrackState,
        length: f64,
        material: MaterialId,
        region: RegionId,
        surface_fwd: Option<SurfaceId>,
        surface_bwd: Option<SurfaceId>,
    ) -> Result<(), KernelError>;
}

/// A kernel that cannot exist.
///
/// Names the kernel type of an observer-only sweep: `None::<&NoKernel>`.
#[derive(Debug, Clone, Copy)]
pub enum NoKernel {}

impl SegmentKernel for NoKernel {
    type TrackState = ();

    fn new_track(&self, _track: &Track) -> Result<(), KernelError> {
        match *self {}
    }

    fn execute(
        &self,
        _state: &mut (),
        _length: f64,
        _material: MaterialId,
        _region: RegionId,
        _surface_fwd: Option<SurfaceId>,
        _surface_bwd: Option<SurfaceId>,
    ) -> Result<(), KernelError> {
        match *self {}
    }
}
