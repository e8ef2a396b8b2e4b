//! Byte-level plumbing for the dictpack codec.
//!
//! - [`ScratchBuffer`]: fixed-capacity, bounds-checked write target reused
//!   across encode calls.
//! - [`Reader`]: bounds-checked cursor over a borrowed byte slice.
//! - [`utf8`]: hand-written UTF-8 encode/decode helpers.

mod error;
mod reader;
mod scratch;
pub mod utf8;

pub use error::BufferError;
pub use reader::Reader;
pub use scratch::ScratchBuffer;
