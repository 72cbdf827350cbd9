use std::fmt::Debug;

use thiserror::Error;

/// Error returned by [`crate::EventsBuffer::push`].
///
/// Offsets are assigned by the ledger in commit order, so a pushed
/// offset at or below the newest buffered one means the feeding stream
/// has diverged from the log. This is a programmer error: the caller
/// should treat it as fatal for its session rather than retry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("out-of-order push: last-offset={last:?} pushed-offset={pushed:?}")]
pub struct OutOfOrderPush<O: Debug> {
    /// The newest offset in the buffer at the time of the push.
    pub last: O,
    /// The offset that was rejected.
    pub pushed: O,
}
