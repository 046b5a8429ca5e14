//! `no_std`, no-alloc synchronization primitives for interrupt-driven
//! instrumentation firmware.
//!
//! This crate provides the two pieces a device needs to move data between
//! interrupt handlers and the host-facing side without blocking the
//! highest-priority context.
//!
//! # Features
//!
//! - **Zero heap allocation** - storage is caller-owned and fixed
//! - **Circular buffer** - byte or whole-block producer, peek/commit consumer
//! - **Status prefix** - device status replayed at the head of every read
//! - **Sticky notifications** - overflow and hysteresis backpressure warning
//! - **Sequential lock** - non-blocking reader, retrying writer, pluggable
//!   critical-section backends
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────────────┐
//! │ Producer (ISR)   │         │ Consumer (host transfer) │
//! │                  │         │                          │
//! │  put_byte()      │────────▶│  start_read()            │
//! │  reserve_block() │ produced│  get_byte() (peek)       │
//! │  commit_block()  │◀────────│  stop_read(n) (commit)   │
//! │                  │ consumed│                          │
//! └──────────────────┘         └──────────────────────────┘
//!
//! ┌──────────────────┐         ┌──────────────────────────┐
//! │ Reader (ISR)     │         │ Writer (main loop)       │
//! │                  │ counter │                          │
//! │  reader_enter()  │◀───────▶│  wait_quiescent()        │
//! │  reader_exit()   │ parity  │  commit if unchanged     │
//! └──────────────────┘         └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use embedded_irqsync::prelude::*;
//!
//! let mut storage = [0u8; 16];
//! let shared = SharedCircBuffer::new(CircBuffer::builder(&mut storage).block_size(4).build());
//! let mut producer = shared.producer().unwrap();
//! let mut consumer = shared.consumer().unwrap();
//!
//! // Producer (ISR): pack one conversion result per block
//! producer.with_block(|mut block| {
//!     block.push_le(0x0ABCu16);
//!     block.push_le(0x0001u16);
//!     BlockWrite::Commit(())
//! });
//!
//! // Consumer: peek a frame, then retire what was sent
//! let frame = consumer.peek_frame::<8>();
//! consumer.stop_read(frame.len());
//! assert_eq!(frame.as_slice(), [0xBC, 0x0A, 0x01, 0x00]);
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod log;

pub mod circ;
pub mod seqlock;

pub mod prelude {
    pub use crate::circ::prelude::*;
    pub use crate::seqlock::prelude::*;
}
