//! The traversal engine.

use moc_tracks::{SegmentFormation, Track, TrackStore};
use tracing::{debug, trace, warn};

use crate::error::{Result, TraverseError};
use crate::kernel::{NoKernel, SegmentKernel};
use crate::observer::{NoopObserver, TrackObserver};
use crate::schedule::parallel_for;
use crate::settings::TraverseSettings;

/// Drives a kernel and an observer over every track of a store.
///
/// Two sweeps are offered:
///
/// - [`sweep_all`](Self::sweep_all) visits tracks half-angle by half-angle
///   with no ordering between tracks. Only safe when the kernel and the
///   observer never write state another track could touch at the same time.
/// - [`sweep_by_group`](Self::sweep_by_group) visits parallel groups in
///   order with a barrier between them. Tracks of one group share no
///   boundary surface, so surface-indexed writes never collide.
///
/// Both run on the current rayon pool.
#[derive(Debug)]
pub struct TraverseTracks<'a, O = NoopObserver> {
    store: &'a TrackStore,
    formation: SegmentFormation,
    observer: O,
    settings: TraverseSettings,
}

impl<'a> TraverseTracks<'a, NoopObserver> {
    /// Create an engine with the no-op observer.
    pub fn new(store: &'a TrackStore) -> Self {
        Self::with_observer(store, NoopObserver)
    }
}

impl<'a, O: TrackObserver> TraverseTracks<'a, O> {
    /// Create an engine that runs `observer` on every track.
    pub fn with_observer(store: &'a TrackStore, observer: O) -> Self {
        Self {
            store,
            formation: store.segment_formation(),
            observer,
            settings: TraverseSettings::default(),
        }
    }

    /// Replace the scheduling settings.
    pub fn with_settings(mut self, settings: TraverseSettings) -> Result<Self> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// The store being traversed.
    pub fn store(&self) -> &'a TrackStore {
        self.store
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Consume the engine and return the observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Scheduling settings in use.
    pub fn settings(&self) -> &TraverseSettings {
        &self.settings
    }

    /// Visit every track once, in no particular order.
    ///
    /// For each track the kernel (if any) is reset and fed the track's
    /// segments in order, then the observer runs.
    pub fn sweep_all<K: SegmentKernel>(&self, kernel: Option<&K>) -> Result<()> {
        match self.formation {
            SegmentFormation::Explicit2D => self.sweep_all_2d(kernel),
            other => Err(self.unsupported(other)),
        }
    }

    /// Visit every track once, parallel group by parallel group.
    ///
    /// Every track of group `i` is finished, kernel and observer, before
    /// any track of group `i + 1` starts.
    pub fn sweep_by_group<K: SegmentKernel>(&self, kernel: Option<&K>) -> Result<()> {
        match self.formation {
            SegmentFormation::Explicit2D => self.sweep_by_group_2d(kernel),
            other => Err(self.unsupported(other)),
        }
    }

    /// [`sweep_all`](Self::sweep_all) with the observer only.
    pub fn observe_all(&self) -> Result<()> {
        self.sweep_all::<NoKernel>(None)
    }

    /// [`sweep_by_group`](Self::sweep_by_group) with the observer only.
    pub fn observe_by_group(&self) -> Result<()> {
        self.sweep_by_group::<NoKernel>(None)
    }

    /// Feed the segments of `track` to `kernel` in stored order.
    pub fn traverse_segments<K: SegmentKernel>(
        &self,
        track: &Track,
        kernel: &K,
        state: &mut K::TrackState,
    ) -> Result<()> {
        for seg in self.store.segments(track) {
            kernel
                .execute(
                    state,
                    seg.length,
                    seg.material,
                    seg.region,
                    seg.surface_fwd,
                    seg.surface_bwd,
                )
                .map_err(|source| TraverseError::Kernel {
                    track: track.id(),
                    source,
                })?;
        }
        Ok(())
    }

    fn sweep_all_2d<K: SegmentKernel>(&self, kernel: Option<&K>) -> Result<()> {
        debug!(
            half_angles = self.store.num_half_azim(),
            tracks = self.store.num_tracks(),
            kernel = kernel.is_some(),
            "sweeping all tracks"
        );

        for azim in 0..self.store.num_half_azim() {
            let tracks = self.store.tracks_in_azim(azim);
            parallel_for(
                0..tracks.len(),
                self.settings.sweep_schedule,
                self.settings.min_tracks_per_task,
                |i| self.visit(&tracks[i], kernel),
            )?;
        }

        debug!("sweep complete");
        Ok(())
    }

    fn sweep_by_group_2d<K: SegmentKernel>(&self, kernel: Option<&K>) -> Result<()> {
        let num_groups = self.store.num_parallel_groups();
        debug!(
            groups = num_groups,
            tracks = self.store.num_tracks(),
            kernel = kernel.is_some(),
            "sweeping tracks by parallel group"
        );

        for group in 0..num_groups {
            let range = self.store.parallel_group_range(group);
            trace!(group, first = range.start, end = range.end, "parallel group");

            // Returning from parallel_for joins every task of this group.
            parallel_for(
                range,
                self.settings.group_schedule,
                self.settings.min_tracks_per_task,
                |position| self.visit(self.store.track_by_parallel_group(position), kernel),
            )?;
        }

        debug!("grouped sweep complete");
        Ok(())
    }

    fn visit<K: SegmentKernel>(&self, track: &Track, kernel: Option<&K>) -> Result<()> {
        if let Some(kernel) = kernel {
            let mut state = kernel
                .new_track(track)
                .map_err(|source| TraverseError::Kernel {
                    track: track.id(),
                    source,
                })?;
            self.traverse_segments(track, kernel, &mut state)?;
        }

        self.observer
            .on_track(track, self.store.segments(track))
            .map_err(|source| TraverseError::Observer {
                track: track.id(),
                source,
            })
    }

    fn unsupported(&self, formation: SegmentFormation) -> TraverseError {
        warn!(%formation, "segment formation has no traversal scheme");
        TraverseError::UnsupportedFormation(formation)
    }
}
