#![warn(missing_docs)]

//! Parallel track traversal for method of characteristics sweeps.
//!
//! The engine walks every track of a [`TrackStore`](moc_tracks::TrackStore),
//! feeding each track's segments in order to a caller-supplied
//! [`SegmentKernel`] and then handing the finished track to a
//! [`TrackObserver`]. Work is spread over the current rayon pool.
//!
//! # Sweeps
//!
//! - [`TraverseTracks::sweep_all`] - every track, no ordering between tracks
//! - [`TraverseTracks::sweep_by_group`] - parallel groups in order, with a
//!   barrier between groups so tracks sharing a boundary surface never run
//!   at the same time
//!
//! # Example
//!
//! ```
//! use moc_tracks::{Segment, SegmentFormation, TrackSpec, TrackStoreBuilder};
//! use moc_traverse::{CounterKernel, TraverseTracks};
//!
//! let seg = Segment::new(1.0, 0, 0);
//! let mut builder = TrackStoreBuilder::new(SegmentFormation::Explicit2D);
//! builder.add_azim(2, 1, vec![
//!     TrackSpec::new(vec![seg, seg]),
//!     TrackSpec::new(vec![seg]),
//!     TrackSpec::new(vec![seg, seg, seg]),
//! ]);
//! let store = builder.build()?;
//!
//! let counter = CounterKernel::new();
//! TraverseTracks::new(&store).sweep_by_group(Some(&counter))?;
//! assert_eq!(counter.count(), 6);
//! assert_eq!(counter.max_per_track(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod atomic;
pub mod error;
mod kernel;
mod kernels;
mod observer;
mod schedule;
mod settings;
#[cfg(test)]
mod test_util;
mod traverse;

pub use error::{Result, TraverseError};
pub use kernel::{KernelError, NoKernel, SegmentKernel};
pub use kernels::{CounterKernel, VolumeKernel};
pub use observer::{
    NoopObserver, SegmentCoords, SegmentCoordsObserver, TrackLengthObserver, TrackObserver,
};
pub use schedule::Schedule;
pub use settings::TraverseSettings;
pub use traverse::TraverseTracks;
