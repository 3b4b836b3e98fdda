//! Parallel-for over track ranges.

use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a range of tracks is split across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    /// Even split: one contiguous chunk per worker.
    Static,
    /// Fixed-size chunks handed out by work stealing.
    Dynamic {
        /// Tracks per chunk.
        chunk: usize,
    },
    /// Adaptive splitting down to the minimum task size.
    ///
    /// Suits ranges whose tracks carry very different segment counts.
    Guided,
}

/// Run `body` for every index in `range` on the current rayon pool.
///
/// Stops handing out work at the first error and returns it. All calls
/// have returned when this function returns.
pub(crate) fn parallel_for<F>(
    range: Range<usize>,
    schedule: Schedule,
    min_len: usize,
    body: F,
) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Sync + Send,
{
    let len = range.len();
    if len == 0 {
        return Ok(());
    }

    let indices = range.into_par_iter();
    match schedule {
        Schedule::Static => {
            let chunk = len.div_ceil(rayon::current_num_threads()).max(min_len);
            indices
                .with_min_len(chunk)
                .with_max_len(chunk)
                .try_for_each(body)
        }
        Schedule::Dynamic { chunk } => indices
            .with_min_len(chunk)
            .with_max_len(chunk)
            .try_for_each(body),
        Schedule::Guided => indices.with_min_len(min_len).try_for_each(body),
    }
}
