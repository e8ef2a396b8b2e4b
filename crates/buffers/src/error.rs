use thiserror::Error;

/// Errors raised by [`crate::ScratchBuffer`] and [`crate::Reader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A read needed more bytes than remain in the input.
    #[error("unexpected end of buffer at offset {offset}: needed {needed} more byte(s)")]
    EndOfBuffer { offset: usize, needed: usize },
    /// A write would run past the end of the scratch region.
    #[error("scratch buffer overflow at offset {offset}: writing {requested} byte(s) exceeds capacity {capacity}")]
    Overflow {
        offset: usize,
        requested: usize,
        capacity: usize,
    },
}
