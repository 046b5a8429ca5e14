use crate::circ::{
    BlockWrite,
    ring::{ProducerState, Ring},
    slice::BlockSlice,
};

/// Producer half of a circular buffer.
///
/// Owns the put cursor and the block reservation. Every call is lock-free:
/// data is published to the [`Consumer`](crate::circ::Consumer) by a release
/// store of the produced counter, so the producer never waits on an open
/// read session.
pub struct Producer<'s, 'a> {
    ring: &'s Ring<'a>,
    state: &'s mut ProducerState,
}

impl<'s, 'a> core::fmt::Debug for Producer<'s, 'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Producer")
            .field("occupied", &self.ring.occupied())
            .field("reserved", &self.state.has_reservation())
            .finish_non_exhaustive()
    }
}

impl<'s, 'a> Producer<'s, 'a> {
    pub(crate) fn new(ring: &'s Ring<'a>, state: &'s mut ProducerState) -> Self {
        Self { ring, state }
    }

    /// See [`CircBuffer::put_byte`](crate::circ::CircBuffer::put_byte).
    #[inline]
    #[track_caller]
    pub fn put_byte(&mut self, value: u8) -> bool {
        self.ring.put_byte(self.state, value)
    }

    #[inline]
    #[track_caller]
    pub fn put_bytes(&mut self, data: &[u8]) -> usize {
        self.ring.put_bytes(self.state, data)
    }

    /// See [`CircBuffer::reserve_block`](crate::circ::CircBuffer::reserve_block).
    ///
    /// The window borrows the handle, so it must be dropped before the block
    /// is committed or cancelled.
    #[inline]
    #[track_caller]
    pub fn reserve_block(&mut self) -> Option<BlockSlice<'_>> {
        self.ring.reserve_block(self.state)
    }

    #[inline]
    pub fn reserved_block(&mut self) -> Option<BlockSlice<'_>> {
        self.ring.reserved_block(self.state)
    }

    #[inline]
    #[track_caller]
    pub fn commit_block(&mut self) {
        self.ring.commit_block(self.state)
    }

    #[inline]
    #[track_caller]
    pub fn cancel_block(&mut self) {
        self.ring.cancel_block(self.state)
    }

    #[inline]
    #[track_caller]
    pub fn with_block<R>(&mut self, f: impl FnOnce(BlockSlice<'_>) -> BlockWrite<R>) -> Option<R> {
        self.ring.with_block(self.state, f)
    }

    #[inline]
    pub fn has_reservation(&self) -> bool {
        self.state.has_reservation()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.ring.block_size()
    }

    #[inline]
    pub fn occupied(&self) -> usize {
        self.ring.occupied()
    }

    #[inline]
    pub fn free_space(&self) -> usize {
        self.ring.capacity() - self.ring.occupied()
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
