use std::{fmt::Debug, sync::Arc};

use log::{debug, trace};
use parking_lot::RwLock;

use crate::{
    error::OutOfOrderPush,
    metrics::{EventsBufferMetrics, QualifiedMetrics},
    BufferOptions,
};

/// Result of [`EventsBuffer::slice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferSlice<O, T> {
    /// The query's lower bound lies at or past the oldest buffered
    /// offset, so the buffer is authoritative for the whole window.
    ///
    /// Note that `Inclusive` may carry an empty vector even though
    /// events exist in the window, namely when the filter rejects all
    /// of them. Callers that treat an empty slice as "no more events
    /// in range" rely on exactly this: a filtered-out window is still
    /// a fully answered one.
    Inclusive(Vec<(O, T)>),
    /// The query's lower bound precedes the oldest buffered offset, so
    /// the buffer cannot honour it and answers with its newest
    /// matching events instead.
    ///
    /// Everything at or below `buffered_start_exclusive` must be read
    /// from the durable store by the caller.
    LastBufferChunkSuffix {
        buffered_start_exclusive: O,
        slice: Vec<(O, T)>,
    },
}

impl<O, T> BufferSlice<O, T> {
    /// The returned events, regardless of variant.
    pub fn events(&self) -> &[(O, T)] {
        match self {
            Self::Inclusive(slice) => slice,
            Self::LastBufferChunkSuffix { slice, .. } => slice,
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

/// An in-memory buffer over the most recent committed events, indexed
/// by offset.
///
/// Streaming subscribers answer range queries from this buffer instead
/// of the backing database whenever their window overlaps the buffered
/// tail of the transaction log.
///
/// The buffer maintains two invariants: offsets are strictly
/// increasing, and at most [`BufferOptions::max_buffer_size`] events
/// are retained (pushing to a full buffer evicts the oldest event
/// first).
///
/// Mutators (`push`, `prune`, `flush`) are serialised by a write lock.
/// Readers capture a snapshot of the log and run entirely without the
/// lock, so a user-supplied filter can be arbitrarily slow without
/// blocking writers.
pub struct EventsBuffer<O, E> {
    log: RwLock<Arc<Vec<(O, E)>>>,
    opts: BufferOptions,
    metrics: QualifiedMetrics,
}

impl<O, E> EventsBuffer<O, E> {
    /// Create an empty buffer.
    ///
    /// `qualifier` names this instance in the emitted metrics, e.g.
    /// `"transactions"`.
    pub fn new(opts: BufferOptions, metrics: &EventsBufferMetrics, qualifier: &str) -> Self {
        Self {
            log: RwLock::new(Arc::new(Vec::new())),
            opts,
            metrics: metrics.for_buffer(qualifier),
        }
    }

    /// The number of buffered events.
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    /// Empty the buffer.
    pub fn flush(&self) {
        let mut log = self.log.write();
        debug!("flushing {} buffered events", log.len());
        *log = Arc::new(Vec::new());
    }
}

impl<O: Ord + Copy, E> EventsBuffer<O, E> {
    /// The oldest buffered offset, or `None` if the buffer is empty.
    pub fn min_offset(&self) -> Option<O> {
        self.log.read().first().map(|(offset, _)| *offset)
    }

    /// The newest buffered offset, or `None` if the buffer is empty.
    pub fn max_offset(&self) -> Option<O> {
        self.log.read().last().map(|(offset, _)| *offset)
    }

    /// Append the event committed at `offset`.
    ///
    /// If the buffer is full, the oldest event is evicted first, so the
    /// post-state length never exceeds
    /// [`BufferOptions::max_buffer_size`].
    ///
    /// # Errors
    ///
    /// Rejects `offset` if it is at or below the newest buffered
    /// offset. The buffer is unchanged in that case.
    pub fn push(&self, offset: O, entry: E) -> Result<(), OutOfOrderPush<O>>
    where
        O: Debug,
        E: Clone,
    {
        let _timer = self.metrics.push_seconds.start_timer();
        let mut log = self.log.write();
        if let Some(&(last, _)) = log.last() {
            if offset <= last {
                return Err(OutOfOrderPush { last, pushed: offset });
            }
        }
        let entries = Arc::make_mut(&mut *log);
        if entries.len() == self.opts.max_buffer_size.get() {
            let (evicted, _) = entries.remove(0);
            trace!("buffer full, evicting offset {evicted:?}");
        }
        entries.push((offset, entry));
        Ok(())
    }

    /// Answer the range query `(start_exclusive, end_inclusive]`,
    /// projecting each event through `filter`.
    ///
    /// If `start_exclusive` lies at or past the oldest buffered offset
    /// the result is [`BufferSlice::Inclusive`]: the filtered window,
    /// capped at [`BufferOptions::max_buffered_chunk_size`] events.
    /// Otherwise the buffer cannot honour the lower bound and returns
    /// [`BufferSlice::LastBufferChunkSuffix`] with its newest matching
    /// events and the offset the caller must read up to from the
    /// durable store.
    ///
    /// Runs on a snapshot of the log: concurrent mutators are neither
    /// blocked nor observed.
    pub fn slice<T>(&self, start_exclusive: O, end_inclusive: O, filter: impl Fn(&E) -> Option<T>) -> BufferSlice<O, T> {
        let _timer = self.metrics.slice_seconds.start_timer();
        let snapshot = Arc::clone(&self.log.read());
        let result = slice_log(
            &snapshot,
            start_exclusive,
            end_inclusive,
            self.opts.max_buffered_chunk_size.get(),
            filter,
        );
        self.metrics.slice_size.observe(result.len() as f64);
        result
    }

    /// Drop every event with offset at or below `end_inclusive`.
    ///
    /// Afterwards the oldest remaining offset, if any, is strictly
    /// greater than `end_inclusive`.
    pub fn prune(&self, end_inclusive: O)
    where
        O: Debug,
        E: Clone,
    {
        let _timer = self.metrics.prune_seconds.start_timer();
        let mut log = self.log.write();
        let idx = index_after(log.binary_search_by(|(offset, _)| offset.cmp(&end_inclusive)));
        if idx == 0 {
            return;
        }
        debug!("pruning {idx} events up to offset {end_inclusive:?}");
        Arc::make_mut(&mut *log).drain(..idx);
    }
}

/// Normalise a binary-search result into the first index whose offset
/// is strictly greater than the query.
fn index_after(search: Result<usize, usize>) -> usize {
    match search {
        Ok(i) => i + 1,
        Err(i) => i,
    }
}

fn slice_log<O: Ord + Copy, E, T>(
    log: &[(O, E)],
    start_exclusive: O,
    end_inclusive: O,
    max_chunk: usize,
    filter: impl Fn(&E) -> Option<T>,
) -> BufferSlice<O, T> {
    let start_search = log.binary_search_by(|(offset, _)| offset.cmp(&start_exclusive));
    let start_idx = index_after(start_search);
    let end_idx = index_after(log.binary_search_by(|(offset, _)| offset.cmp(&end_inclusive)));
    let window = &log[start_idx..end_idx];

    // `Err(0)` means the query starts strictly before everything we
    // have buffered, so the left endpoint cannot be honoured.
    if start_search == Err(0) {
        if window.is_empty() {
            return BufferSlice::LastBufferChunkSuffix {
                buffered_start_exclusive: end_inclusive,
                slice: Vec::new(),
            };
        }
        // Walk the window newest-first, keeping one match beyond the
        // chunk size: the extra one becomes the exclusive lower marker
        // below which the caller must consult the durable store.
        let mut matches = Vec::new();
        for (offset, entry) in window.iter().rev() {
            if let Some(projected) = filter(entry) {
                matches.push((*offset, projected));
                if matches.len() == max_chunk + 1 {
                    break;
                }
            }
        }
        matches.reverse();
        let mut matches = matches.into_iter();
        return match matches.next() {
            None => BufferSlice::LastBufferChunkSuffix {
                buffered_start_exclusive: window[0].0,
                slice: Vec::new(),
            },
            Some((marker, _)) => BufferSlice::LastBufferChunkSuffix {
                buffered_start_exclusive: marker,
                slice: matches.collect(),
            },
        };
    }

    let slice = window
        .iter()
        .filter_map(|(offset, entry)| filter(entry).map(|projected| (*offset, projected)))
        .take(max_chunk)
        .collect();
    BufferSlice::Inclusive(slice)
}
