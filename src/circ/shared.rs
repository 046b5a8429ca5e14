#![allow(unsafe_code)]

use core::cell::{Cell, UnsafeCell};

use critical_section::Mutex;

use crate::circ::{CircBuffer, Consumer, Producer, ring::Ring};

#[derive(Debug, Clone, Copy, Default)]
struct Claims {
    producer: bool,
    consumer: bool,
}

/// A [`CircBuffer`] split between a producer context and a consumer context.
///
/// Typically placed in a `static` and shared between an interrupt handler
/// and the main loop. Each context takes its handle once; the handles then
/// run without a critical section and never wait on each other. Only the
/// claim itself, and `&mut self` access, touch both halves.
///
/// ```
/// use embedded_irqsync::circ::{CircBuffer, SharedCircBuffer};
///
/// let mut storage = [0u8; 8];
/// let shared = SharedCircBuffer::new(CircBuffer::new(&mut storage));
///
/// let mut producer = shared.producer().unwrap();
/// let mut consumer = shared.consumer().unwrap();
/// assert!(shared.producer().is_none());
///
/// consumer.start_read();
/// producer.put_bytes(&[1, 2]);
/// assert_eq!(consumer.get_byte(), Some(1));
/// assert_eq!(consumer.stop_read(1), 1);
/// ```
pub struct SharedCircBuffer<'a> {
    buf: UnsafeCell<CircBuffer<'a>>,
    claims: Mutex<Cell<Claims>>,
}

// SAFETY: through `&self` the buffer is reached only by the two handles. Each
// is handed out once, and each takes `&mut` to its own role state plus `&` to
// the ring, which is itself `Sync`.
unsafe impl Sync for SharedCircBuffer<'_> {}

impl<'a> core::fmt::Debug for SharedCircBuffer<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let claims = critical_section::with(|cs| self.claims.borrow(cs).get());
        f.debug_struct("SharedCircBuffer")
            .field("occupied", &self.ring().occupied())
            .field("claims", &claims)
            .finish_non_exhaustive()
    }
}

impl<'a> SharedCircBuffer<'a> {
    pub fn new(buf: CircBuffer<'a>) -> Self {
        Self {
            buf: UnsafeCell::new(buf),
            claims: Mutex::new(Cell::new(Claims::default())),
        }
    }

    fn ring(&self) -> &Ring<'a> {
        // SAFETY: the ring is only ever borrowed shared while `&self` exists
        unsafe { &(*self.buf.get()).ring }
    }

    /// Handle for the producing context (ISR or DMA completion).
    ///
    /// Returns `None` if the producer handle was already taken.
    pub fn producer(&self) -> Option<Producer<'_, 'a>> {
        let first = critical_section::with(|cs| {
            let cell = self.claims.borrow(cs);
            let mut claims = cell.get();
            let first = !claims.producer;
            claims.producer = true;
            cell.set(claims);
            first
        });
        if !first {
            return None;
        }

        let buf = self.buf.get();
        // SAFETY: first and only claim of the producer state; the consumer
        // handle never touches it.
        let state = unsafe { &mut *(&raw mut (*buf).producer) };
        Some(Producer::new(self.ring(), state))
    }

    /// Handle for the consuming context (host transfer, main loop).
    ///
    /// Returns `None` if the consumer handle was already taken.
    pub fn consumer(&self) -> Option<Consumer<'_, 'a>> {
        let first = critical_section::with(|cs| {
            let cell = self.claims.borrow(cs);
            let mut claims = cell.get();
            let first = !claims.consumer;
            claims.consumer = true;
            cell.set(claims);
            first
        });
        if !first {
            return None;
        }

        let buf = self.buf.get();
        // SAFETY: first and only claim of the consumer state; the producer
        // handle never touches it.
        let state = unsafe { &mut *(&raw mut (*buf).consumer) };
        Some(Consumer::new(self.ring(), state))
    }

    #[inline]
    pub fn occupied(&self) -> usize {
        self.ring().occupied()
    }

    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.ring().is_overflow()
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        self.ring().is_warning()
    }

    /// Direct access while no handle is alive, e.g. for reconfiguration.
    ///
    /// Makes both handles available again.
    pub fn get_mut(&mut self) -> &mut CircBuffer<'a> {
        self.claims.get_mut().set(Claims::default());
        self.buf.get_mut()
    }

    /// Discards all data and makes both handles available again.
    ///
    /// # Panics
    /// Panics if a block reservation is outstanding.
    #[track_caller]
    pub fn reset(&mut self) {
        self.get_mut().reset();
    }

    pub fn into_inner(self) -> CircBuffer<'a> {
        self.buf.into_inner()
    }
}
