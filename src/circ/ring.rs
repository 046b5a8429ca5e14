#![allow(unsafe_code)]

use core::{
    cell::Cell,
    sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering},
};

use heapless::Vec;

use crate::{
    circ::{
        BlockWrite, CircError,
        error::trap,
        helpers::{advance, occupancy, validate_block_size, validate_warning},
        slice::BlockSlice,
        types::BAD_BYTE,
    },
    log::trace_event,
};

/// Storage, counters and notifications seen by both roles.
///
/// `produced` is stored only by the producer and `consumed` only by the
/// consumer. Configuration fields change only through `&mut self`.
pub(crate) struct Ring<'a> {
    cells: &'a [Cell<u8>],
    status: &'a [AtomicU8],

    produced: AtomicUsize,
    consumed: AtomicUsize,
    overflow: AtomicBool,
    warning: AtomicBool,

    block_size: usize,
    free_threshold: usize,
    warn_low: usize,
    warn_high: usize,
}

// SAFETY: the byte cells are only reached through role methods that take the
// matching `&mut ProducerState` or `&mut ConsumerState`, and each ring has
// exactly one of each. The producer writes only the free region and publishes
// it with a Release store of `produced`; the consumer reads only the region it
// observed through an Acquire load of `produced`, and hands it back with a
// Release store of `consumed`. The two regions never overlap.
unsafe impl Send for Ring<'_> {}
unsafe impl Sync for Ring<'_> {}

/// Cursors owned by the producer.
#[derive(Debug, Default)]
pub(crate) struct ProducerState {
    put: usize,
    reservation: Option<usize>,
}

impl ProducerState {
    pub(crate) fn has_reservation(&self) -> bool {
        self.reservation.is_some()
    }
}

/// Cursors owned by the consumer.
#[derive(Debug, Default)]
pub(crate) struct ConsumerState {
    commit: usize,
    peek: usize,
    peek_count: usize,
}

impl<'a> Ring<'a> {
    pub(crate) fn new(storage: &'a mut [u8]) -> Result<Self, CircError> {
        let capacity = storage.len();
        if capacity == 0 {
            return Err(CircError::ZeroCapacity);
        }

        Ok(Self {
            cells: Cell::from_mut(storage).as_slice_of_cells(),
            status: &[],
            produced: AtomicUsize::new(0),
            consumed: AtomicUsize::new(0),
            overflow: AtomicBool::new(false),
            warning: AtomicBool::new(false),
            block_size: 1,
            free_threshold: capacity - 1,
            warn_low: 0,
            warn_high: capacity,
        })
    }

    pub(crate) fn attach_status(&mut self, status: &'a [AtomicU8]) -> Result<(), CircError> {
        if !self.status.is_empty() {
            return Err(CircError::StatusAttached);
        }
        self.status = status;
        Ok(())
    }

    /// Switches to block mode. The caller discards buffered data.
    pub(crate) fn set_block_size(&mut self, block_size: usize) -> Result<(), CircError> {
        if self.is_block_mode() {
            return Err(CircError::AlreadyBlockMode);
        }
        validate_block_size(self.capacity(), block_size)?;
        self.block_size = block_size;
        self.free_threshold = self.capacity() - block_size;
        Ok(())
    }

    pub(crate) fn set_warning(&mut self, low: usize, high: usize) -> Result<(), CircError> {
        validate_warning(self.capacity(), low, high)?;
        self.warn_low = low;
        self.warn_high = high;
        self.check_warning();
        Ok(())
    }

    /// Empties the ring and both role states; clears overflow.
    pub(crate) fn clear(&mut self, producer: &mut ProducerState, consumer: &mut ConsumerState) {
        *producer = ProducerState::default();
        *consumer = ConsumerState::default();
        *self.produced.get_mut() = 0;
        *self.consumed.get_mut() = 0;
        *self.overflow.get_mut() = false;
        self.check_warning();
    }
}

// Queries
impl<'a> Ring<'a> {
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub(crate) fn is_block_mode(&self) -> bool {
        self.block_size > 1
    }

    #[inline]
    pub(crate) fn status_len(&self) -> usize {
        self.status.len()
    }

    #[inline]
    pub(crate) fn produced(&self) -> usize {
        self.produced.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn consumed(&self) -> usize {
        self.consumed.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        occupancy(self.produced(), self.consumed())
    }

    #[inline]
    pub(crate) fn total_len(&self) -> usize {
        self.status.len() + self.occupied()
    }

    #[inline]
    pub(crate) fn warning_thresholds(&self) -> (usize, usize) {
        (self.warn_low, self.warn_high)
    }

    #[inline]
    pub(crate) fn is_overflow(&self) -> bool {
        self.overflow.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn is_warning(&self) -> bool {
        self.warning.load(Ordering::Relaxed)
    }
}

// Producer side
impl<'a> Ring<'a> {
    #[track_caller]
    pub(crate) fn put_byte(&self, p: &mut ProducerState, value: u8) -> bool {
        if self.is_block_mode() {
            trap(CircError::ByteOpInBlockMode);
        }

        if self.occupied() >= self.capacity() {
            self.raise_overflow();
            return false;
        }

        self.cells[p.put].set(value);
        p.put = advance(p.put, 1, self.capacity());
        self.publish(1);
        true
    }

    #[track_caller]
    pub(crate) fn put_bytes(&self, p: &mut ProducerState, data: &[u8]) -> usize {
        let mut accepted = 0;
        for &b in data {
            if !self.put_byte(p, b) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    #[track_caller]
    pub(crate) fn reserve_block(&self, p: &mut ProducerState) -> Option<BlockSlice<'_>> {
        if !self.is_block_mode() {
            trap(CircError::NotInBlockMode);
        }
        if p.reservation.is_some() {
            trap(CircError::ReservationOutstanding);
        }

        if self.occupied() > self.free_threshold {
            self.raise_overflow();
            return None;
        }

        p.reservation = Some(p.put);
        Some(self.block_at(p.put))
    }

    pub(crate) fn reserved_block(&self, p: &ProducerState) -> Option<BlockSlice<'_>> {
        p.reservation.map(|off| self.block_at(off))
    }

    #[track_caller]
    pub(crate) fn commit_block(&self, p: &mut ProducerState) {
        let off = self.take_reservation(p);
        p.put = advance(off, self.block_size, self.capacity());
        self.publish(self.block_size);
    }

    #[track_caller]
    pub(crate) fn cancel_block(&self, p: &mut ProducerState) {
        self.take_reservation(p);
    }

    #[track_caller]
    pub(crate) fn with_block<R>(
        &self,
        p: &mut ProducerState,
        f: impl FnOnce(BlockSlice<'_>) -> BlockWrite<R>,
    ) -> Option<R> {
        let block = self.reserve_block(p)?;
        let outcome = f(block);
        if outcome.is_commit() {
            self.commit_block(p);
        } else {
            self.cancel_block(p);
        }
        Some(outcome.into_inner())
    }

    // Blocks never wrap: `put` stays a multiple of the block size, which
    // divides the capacity.
    fn block_at(&self, off: usize) -> BlockSlice<'_> {
        BlockSlice::new(&self.cells[off..off + self.block_size])
    }

    #[track_caller]
    fn take_reservation(&self, p: &mut ProducerState) -> usize {
        if !self.is_block_mode() {
            trap(CircError::NotInBlockMode);
        }
        match p.reservation.take() {
            Some(off) => off,
            None => trap(CircError::NoReservation),
        }
    }

    fn publish(&self, n: usize) {
        let produced = self.produced.load(Ordering::Relaxed).wrapping_add(n);
        self.produced.store(produced, Ordering::Release);
        self.check_warning();
    }
}

// Consumer side
impl<'a> Ring<'a> {
    pub(crate) fn start_read(&self, c: &mut ConsumerState) {
        c.peek = c.commit;
        c.peek_count = 0;
    }

    pub(crate) fn get_byte(&self, c: &mut ConsumerState) -> Option<u8> {
        let status_len = self.status.len();

        if c.peek_count < status_len {
            let b = self.status[c.peek_count].load(Ordering::Relaxed);
            c.peek_count += 1;
            return Some(b);
        }

        if c.peek_count - status_len < self.occupied() {
            let b = self.cells[c.peek].get();
            c.peek = advance(c.peek, 1, self.capacity());
            c.peek_count += 1;
            return Some(b);
        }

        self.raise_overflow();
        None
    }

    pub(crate) fn get_byte_or_bad(&self, c: &mut ConsumerState) -> u8 {
        self.get_byte(c).unwrap_or(BAD_BYTE)
    }

    pub(crate) fn stop_read(&self, c: &mut ConsumerState, n: usize) -> usize {
        let n = n.min(c.peek_count);
        let data = n.saturating_sub(self.status.len()).min(self.occupied());

        c.commit = advance(c.commit, data, self.capacity());
        c.peek_count -= data;
        let consumed = self.consumed.load(Ordering::Relaxed).wrapping_add(data);
        self.consumed.store(consumed, Ordering::Release);
        self.check_warning();
        self.occupied()
    }

    pub(crate) fn peek_frame<const N: usize>(&self, c: &mut ConsumerState) -> Vec<u8, N> {
        self.start_read(c);
        let want = N.min(self.total_len());
        let mut frame = Vec::new();
        while frame.len() < want {
            let Some(b) = self.get_byte(c) else { break };
            if frame.push(b).is_err() {
                break;
            }
        }
        frame
    }
}

// Notifications
impl<'a> Ring<'a> {
    pub(crate) fn clear_overflow(&self) -> bool {
        if self.overflow.load(Ordering::Relaxed) {
            trace_event!("circbuf: overflow cleared");
        }
        self.overflow.store(false, Ordering::Relaxed);
        true
    }

    fn raise_overflow(&self) {
        if !self.overflow.load(Ordering::Relaxed) {
            trace_event!("circbuf: overflow, occupied={}", self.occupied());
        }
        self.overflow.store(true, Ordering::Relaxed);
    }

    // Either role may store the flag; a concurrent update from the other role
    // can leave it one transition stale.
    fn check_warning(&self) {
        let occupied = self.occupied();
        let warning = self.warning.load(Ordering::Relaxed);
        if occupied >= self.warn_high {
            if !warning {
                trace_event!("circbuf: warning set, occupied={}", occupied);
                self.warning.store(true, Ordering::Relaxed);
            }
        } else if occupied <= self.warn_low && warning {
            trace_event!("circbuf: warning cleared, occupied={}", occupied);
            self.warning.store(false, Ordering::Relaxed);
        }
    }
}
