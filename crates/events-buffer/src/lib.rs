use std::num::NonZeroUsize;

mod buffer;
pub mod error;
pub mod metrics;

pub use crate::buffer::{BufferSlice, EventsBuffer};

/// [`EventsBuffer`] options.
#[derive(Clone, Copy, Debug)]
pub struct BufferOptions {
    /// The maximum number of events the buffer retains.
    ///
    /// Pushing to a full buffer evicts the oldest event, so the buffer
    /// holds a sliding window over the tail of the transaction log.
    ///
    /// Default: 10,000
    pub max_buffer_size: NonZeroUsize,
    /// The maximum number of events returned by a single
    /// [`EventsBuffer::slice`] call.
    ///
    /// Subscribers are expected to issue follow-up queries for the
    /// remainder of their window, so this bounds the work done while a
    /// log snapshot is held.
    ///
    /// Default: 1,000
    pub max_buffered_chunk_size: NonZeroUsize,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            max_buffer_size: const { NonZeroUsize::new(10_000).unwrap() },
            max_buffered_chunk_size: const { NonZeroUsize::new(1_000).unwrap() },
        }
    }
}
