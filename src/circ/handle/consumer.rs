use heapless::Vec;

use crate::circ::ring::{ConsumerState, Ring};

/// Consumer half of a circular buffer.
///
/// Owns the commit cursor and the read session. Bytes become visible once the
/// [`Producer`](crate::circ::Producer) publishes them, and committed reads are
/// handed back with a release store of the consumed counter.
pub struct Consumer<'s, 'a> {
    ring: &'s Ring<'a>,
    state: &'s mut ConsumerState,
}

impl<'s, 'a> core::fmt::Debug for Consumer<'s, 'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Consumer")
            .field("total_len", &self.ring.total_len())
            .finish_non_exhaustive()
    }
}

impl<'s, 'a> Consumer<'s, 'a> {
    pub(crate) fn new(ring: &'s Ring<'a>, state: &'s mut ConsumerState) -> Self {
        Self { ring, state }
    }

    #[inline]
    pub fn start_read(&mut self) {
        self.ring.start_read(self.state)
    }

    /// See [`CircBuffer::get_byte`](crate::circ::CircBuffer::get_byte).
    #[inline]
    pub fn get_byte(&mut self) -> Option<u8> {
        self.ring.get_byte(self.state)
    }

    #[inline]
    pub fn get_byte_or_bad(&mut self) -> u8 {
        self.ring.get_byte_or_bad(self.state)
    }

    /// See [`CircBuffer::stop_read`](crate::circ::CircBuffer::stop_read).
    #[inline]
    pub fn stop_read(&mut self, n: usize) -> usize {
        self.ring.stop_read(self.state, n)
    }

    #[inline]
    pub fn peek_frame<const N: usize>(&mut self) -> Vec<u8, N> {
        self.ring.peek_frame(self.state)
    }

    #[inline]
    pub fn total_len(&self) -> usize {
        self.ring.total_len()
    }

    #[inline]
    pub fn occupied(&self) -> usize {
        self.ring.occupied()
    }

    #[inline]
    pub fn status_len(&self) -> usize {
        self.ring.status_len()
    }

    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.ring.is_overflow()
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        self.ring.is_warning()
    }

    /// Clears the sticky overflow flag. Always succeeds.
    #[inline]
    pub fn clear_overflow(&self) -> bool {
        self.ring.clear_overflow()
    }
}
