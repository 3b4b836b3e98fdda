//! Stock kernels.

use std::sync::atomic::{AtomicUsize, Ordering};

use moc_tracks::{MaterialId, RegionId, SurfaceId, Track};

use crate::atomic::AtomicF64;
use crate::kernel::{KernelError, SegmentKernel};

/// Counts segments, in total and per track.
#[derive(Debug, Default)]
pub struct CounterKernel {
    count: AtomicUsize,
    max_per_track: AtomicUsize,
}

impl CounterKernel {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments seen so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Most segments seen on a single track.
    pub fn max_per_track(&self) -> usize {
        self.max_per_track.load(Ordering::Relaxed)
    }
}

impl SegmentKernel for CounterKernel {
    /// Segments seen on the current track.
    type TrackState = usize;

    fn new_track(&self, _track: &Track) -> Result<usize, KernelError> {
        Ok(0)
    }

    fn execute(
        &self,
        seen: &mut usize,
        _length: f64,
        _material: MaterialId,
        _region: RegionId,
        _surface_fwd: Option<SurfaceId>,
        _surface_bwd: Option<SurfaceId>,
    ) -> Result<(), KernelError> {
        // The running count only grows, so folding it per segment leaves
        // the track total once the last segment is in.
        *seen += 1;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.max_per_track.fetch_max(*seen, Ordering::Relaxed);
        Ok(())
    }
}

/// Accumulates weighted segment length per region.
///
/// Each segment adds `length * track weight` to its region, which sums to
/// the region's area when the weights are the azimuthal weight times the
/// track spacing. Updates are atomic, so it is safe under either sweep.
#[derive(Debug)]
pub struct VolumeKernel {
    volumes: Vec<AtomicF64>,
}

impl VolumeKernel {
    /// Create a kernel with `num_regions` zeroed tallies.
    pub fn new(num_regions: usize) -> Self {
        Self {
            volumes: (0..num_regions).map(|_| AtomicF64::default()).collect(),
        }
    }

    /// Volumes accumulated so far, by region id.
    pub fn volumes(&self) -> Vec<f64> {
        self.volumes.iter().map(AtomicF64::load).collect()
    }
}

impl SegmentKernel for VolumeKernel {
    /// Weight of the current track.
    type TrackState = f64;

    fn new_track(&self, track: &Track) -> Result<f64, KernelError> {
        Ok(track.weight())
    }

    fn execute(
        &self,
        weight: &mut f64,
        length: f64,
        _material: MaterialId,
        region: RegionId,
        _surface_fwd: Option<SurfaceId>,
        _surface_bwd: Option<SurfaceId>,
    ) -> Result<(), KernelError> {
        let tally = self.volumes.get(region as usize).ok_or_else(|| {
            format!(
                "region {region} outside {} volume tallies",
                self.volumes.len()
            )
        })?;
        tally.fetch_add(length * *weight);
        Ok(())
    }
}
