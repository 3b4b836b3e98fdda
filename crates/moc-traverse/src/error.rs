//! Error types for track traversal.

use moc_tracks::{SegmentFormation, TrackId};
use thiserror::Error;

use crate::kernel::KernelError;

/// Errors that can occur during a sweep.
#[derive(Error, Debug)]
pub enum TraverseError {
    /// The store's segments were formed in a way no sweep handles.
    #[error("no traversal scheme for {0} segment formation")]
    UnsupportedFormation(SegmentFormation),

    /// The kernel failed while processing a track.
    #[error("kernel failed on track {track}")]
    Kernel {
        /// Track being processed.
        track: TrackId,
        /// Error raised by the kernel.
        #[source]
        source: KernelError,
    },

    /// The observer failed on a track.
    #[error("observer failed on track {track}")]
    Observer {
        /// Track being observed.
        track: TrackId,
        /// Error raised by the observer.
        #[source]
        source: KernelError,
    },

    /// Invalid traversal settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Worker pool construction failed.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for traversal operations.
pub type Result<T> = std::result::Result<T, TraverseError>;
