use core::sync::atomic::AtomicU8;

use heapless::Vec;

use crate::circ::{
    CircBufferBuilder, CircError, Consumer, Producer,
    error::{or_trap, trap},
    ring::{ConsumerState, ProducerState, Ring},
    slice::BlockSlice,
    types::BlockWrite,
};

/// Byte-oriented ring buffer shared by one producer and one consumer.
///
/// Storage is caller-owned and fixed; cursors are byte offsets into it. The
/// producer owns `put`, `produced` and the block reservation, the consumer
/// owns `commit`, `consumed` and the peek state. Overflow and warning are
/// sticky notifications polled by the owning device.
///
/// Reads are two-phase: a session started by [`start_read`](Self::start_read)
/// peeks bytes with [`get_byte`](Self::get_byte) and retires only what
/// [`stop_read`](Self::stop_read) commits. An optional status region is
/// replayed at the head of every session without using ring capacity.
///
/// Calling both roles on one `CircBuffer` suits a single context. To run the
/// producer and consumer in different contexts, [`split`](Self::split) it or
/// wrap it in a [`SharedCircBuffer`](crate::circ::SharedCircBuffer).
pub struct CircBuffer<'a> {
    pub(crate) ring: Ring<'a>,
    pub(crate) producer: ProducerState,
    pub(crate) consumer: ConsumerState,
}

impl<'a> core::fmt::Debug for CircBuffer<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CircBuffer")
            .field("capacity", &self.capacity())
            .field("block_size", &self.block_size())
            .field("status_len", &self.status_len())
            .field("occupied", &self.occupied())
            .field("overflow", &self.is_overflow())
            .field("warning", &self.is_warning())
            .finish_non_exhaustive()
    }
}

impl<'a> CircBuffer<'a> {
    /// Creates a byte-mode buffer over `storage`.
    ///
    /// Warning is disabled (`high = capacity`, `low = 0`) and no status
    /// region is attached.
    ///
    /// # Panics
    /// Panics if `storage` is empty.
    #[track_caller]
    pub fn new(storage: &'a mut [u8]) -> Self {
        or_trap(Self::try_new(storage))
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(storage: &'a mut [u8]) -> Result<Self, CircError> {
        Ok(Self {
            ring: Ring::new(storage)?,
            producer: ProducerState::default(),
            consumer: ConsumerState::default(),
        })
    }

    /// Starts a builder for a fully configured buffer over `storage`.
    pub fn builder(storage: &'a mut [u8]) -> CircBufferBuilder<'a> {
        CircBufferBuilder::new(storage)
    }

    /// Attaches the status region replayed at the head of every read session.
    ///
    /// The bytes stay owned by the device, which may update them at any time;
    /// each session sees their value at the moment they are read.
    ///
    /// # Panics
    /// Panics if a non-empty status region is already attached.
    #[track_caller]
    pub fn attach_status(&mut self, status: &'a [AtomicU8]) {
        or_trap(self.try_attach_status(status))
    }

    /// Fallible form of [`attach_status`](Self::attach_status).
    pub fn try_attach_status(&mut self, status: &'a [AtomicU8]) -> Result<(), CircError> {
        self.ring.attach_status(status)
    }

    /// Switches the buffer to block mode, discarding any buffered data.
    ///
    /// # Panics
    /// Panics if already in block mode, or if `block_size` is not greater
    /// than one, exceeds the capacity, or does not divide it.
    #[track_caller]
    pub fn enter_block_mode(&mut self, block_size: usize) {
        or_trap(self.try_enter_block_mode(block_size))
    }

    /// Fallible form of [`enter_block_mode`](Self::enter_block_mode).
    pub fn try_enter_block_mode(&mut self, block_size: usize) -> Result<(), CircError> {
        self.ring.set_block_size(block_size)?;
        self.ring.clear(&mut self.producer, &mut self.consumer);
        Ok(())
    }

    /// Sets the hysteresis thresholds of the backpressure warning.
    ///
    /// # Panics
    /// Panics unless `low <= high <= capacity`.
    #[track_caller]
    pub fn configure_warning(&mut self, low: usize, high: usize) {
        or_trap(self.try_configure_warning(low, high))
    }

    /// Fallible form of [`configure_warning`](Self::configure_warning).
    pub fn try_configure_warning(&mut self, low: usize, high: usize) -> Result<(), CircError> {
        self.ring.set_warning(low, high)
    }

    /// Discards all buffered data and the current read session.
    ///
    /// Clears overflow; block mode, status region and thresholds are kept.
    ///
    /// # Panics
    /// Panics if a block reservation is outstanding.
    #[track_caller]
    pub fn reset(&mut self) {
        if self.producer.has_reservation() {
            trap(CircError::ReservationOutstanding);
        }
        self.ring.clear(&mut self.producer, &mut self.consumer);
    }

    /// Splits the buffer into its producer and consumer halves.
    ///
    /// The halves share nothing but the ring and its atomic counters, so they
    /// can be moved to different threads or priority levels and used without
    /// a critical section.
    pub fn split(&mut self) -> (Producer<'_, 'a>, Consumer<'_, 'a>) {
        (
            Producer::new(&self.ring, &mut self.producer),
            Consumer::new(&self.ring, &mut self.consumer),
        )
    }
}

// Queries
impl<'a> CircBuffer<'a> {
    /// Size of the ring in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// 1 in byte mode, the block size in block mode.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.ring.block_size()
    }

    #[inline]
    pub fn is_block_mode(&self) -> bool {
        self.ring.is_block_mode()
    }

    /// Length of the attached status region.
    #[inline]
    pub fn status_len(&self) -> usize {
        self.ring.status_len()
    }

    /// Bytes buffered and not yet committed-read.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.ring.occupied()
    }

    /// Same as [`occupied`](Self::occupied).
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied() >= self.capacity()
    }

    /// Bytes a read session can deliver: status prefix plus buffered data.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.ring.total_len()
    }

    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.occupied()
    }

    /// Total bytes ever published by the producer (wrapping).
    #[inline]
    pub fn produced(&self) -> usize {
        self.ring.produced()
    }

    /// Total bytes ever committed by the consumer (wrapping).
    #[inline]
    pub fn consumed(&self) -> usize {
        self.ring.consumed()
    }

    /// Returns `(low, high)`.
    #[inline]
    pub fn warning_thresholds(&self) -> (usize, usize) {
        self.ring.warning_thresholds()
    }

    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.ring.is_overflow()
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        self.ring.is_warning()
    }

    #[inline]
    pub fn has_reservation(&self) -> bool {
        self.producer.has_reservation()
    }
}

// Producer side
impl<'a> CircBuffer<'a> {
    /// Appends one byte.
    ///
    /// Returns false and raises overflow if the ring is full; the byte is
    /// dropped.
    ///
    /// # Panics
    /// Panics in block mode.
    #[inline]
    #[track_caller]
    pub fn put_byte(&mut self, value: u8) -> bool {
        self.ring.put_byte(&mut self.producer, value)
    }

    /// Appends bytes until the ring fills; returns how many were accepted.
    ///
    /// # Panics
    /// Panics in block mode.
    #[inline]
    #[track_caller]
    pub fn put_bytes(&mut self, data: &[u8]) -> usize {
        self.ring.put_bytes(&mut self.producer, data)
    }

    /// Reserves the next block for in-place filling.
    ///
    /// Returns `None` and raises overflow when there is no room for a whole
    /// block. The block stays invisible to the consumer until
    /// [`commit_block`](Self::commit_block).
    ///
    /// # Panics
    /// Panics outside block mode or if a reservation is already outstanding.
    #[inline]
    #[track_caller]
    pub fn reserve_block(&mut self) -> Option<BlockSlice<'_>> {
        self.ring.reserve_block(&mut self.producer)
    }

    /// Write window of the outstanding reservation, if any.
    #[inline]
    pub fn reserved_block(&mut self) -> Option<BlockSlice<'_>> {
        self.ring.reserved_block(&self.producer)
    }

    /// Publishes the reserved block to the consumer.
    ///
    /// # Panics
    /// Panics outside block mode or without an outstanding reservation.
    #[inline]
    #[track_caller]
    pub fn commit_block(&mut self) {
        self.ring.commit_block(&mut self.producer)
    }

    /// Drops the outstanding reservation without publishing anything.
    ///
    /// # Panics
    /// Panics outside block mode or without an outstanding reservation.
    #[inline]
    #[track_caller]
    pub fn cancel_block(&mut self) {
        self.ring.cancel_block(&mut self.producer)
    }

    /// Reserves a block, lets `f` fill it, then commits or cancels it as
    /// `f` decides.
    ///
    /// Returns `None` (with overflow raised) if no block could be reserved.
    #[inline]
    #[track_caller]
    pub fn with_block<R>(&mut self, f: impl FnOnce(BlockSlice<'_>) -> BlockWrite<R>) -> Option<R> {
        self.ring.with_block(&mut self.producer, f)
    }
}

// Consumer side
impl<'a> CircBuffer<'a> {
    /// Starts a read session at the committed position.
    ///
    /// Progress of any previous uncommitted session is discarded.
    #[inline]
    pub fn start_read(&mut self) {
        self.ring.start_read(&mut self.consumer)
    }

    /// Peeks the next byte of the session: status bytes first, then data.
    ///
    /// Returns `None` and raises overflow once the session is exhausted.
    #[inline]
    pub fn get_byte(&mut self) -> Option<u8> {
        self.ring.get_byte(&mut self.consumer)
    }

    /// Like [`get_byte`](Self::get_byte) but yields
    /// [`BAD_BYTE`](crate::circ::BAD_BYTE) when the session is exhausted.
    #[inline]
    pub fn get_byte_or_bad(&mut self) -> u8 {
        self.ring.get_byte_or_bad(&mut self.consumer)
    }

    /// Commits up to `n` of the bytes peeked in this session.
    ///
    /// The status prefix counts towards `n` but never moves the ring. Commits
    /// never exceed what was peeked or what is buffered. Returns the bytes
    /// left in the ring.
    #[inline]
    pub fn stop_read(&mut self, n: usize) -> usize {
        self.ring.stop_read(&mut self.consumer, n)
    }

    /// Starts a session and peeks up to `N` bytes, status prefix included.
    ///
    /// Never peeks past [`total_len`](Self::total_len), so it does not raise
    /// overflow. Retire the bytes with [`stop_read`](Self::stop_read).
    #[inline]
    pub fn peek_frame<const N: usize>(&mut self) -> Vec<u8, N> {
        self.ring.peek_frame(&mut self.consumer)
    }
}

impl<'a> CircBuffer<'a> {
    /// Clears the sticky overflow flag and reports success, which is
    /// unconditional.
    ///
    /// The flag is a notification: if the condition persists the next
    /// failing operation raises it again.
    #[inline]
    pub fn clear_overflow(&mut self) -> bool {
        self.ring.clear_overflow()
    }
}
