//! Single-producer single-consumer circular byte buffer.
//!
//! The producer (an ISR or DMA completion) appends bytes or fills whole
//! blocks in place; the consumer (a host-side transfer) reads in sessions
//! that peek first and commit later. See [`CircBuffer`] for the semantics,
//! [`CircBuffer::split`] and [`SharedCircBuffer`] for running the two halves
//! in different contexts.

pub mod buffer;
pub mod builder;
pub mod error;
pub mod handle;
pub mod helpers;
mod ring;
pub mod shared;
pub mod slice;
pub mod types;

#[cfg(test)]
mod test_support;

pub use buffer::CircBuffer;
pub use builder::CircBufferBuilder;
pub use error::CircError;
pub use handle::{Consumer, Producer};
pub use shared::SharedCircBuffer;
pub use slice::{BlockSlice, Sample};
pub use types::{BAD_BYTE, BlockWrite};

pub mod prelude {
    pub use super::{
        BAD_BYTE, BlockSlice, BlockWrite, CircBuffer, CircBufferBuilder, CircError, Consumer,
        Producer, Sample, SharedCircBuffer,
    };
}
