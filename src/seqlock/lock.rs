use core::sync::atomic::{AtomicU32, Ordering};

use crossbeam_utils::Backoff;

use crate::{log::trace_event, seqlock::CriticalSection};

/// Sequential lock protecting state shared by one reader and one writer.
///
/// The lock owns only the access counter and its backend; the protected
/// fields live wherever the application keeps them. The counter is even
/// while the lock is quiescent and odd while a reader access is open.
///
/// # Example
/// ```
/// use core::sync::atomic::{AtomicU16, Ordering};
/// use embedded_irqsync::seqlock::{GlobalIrq, SeqLock};
///
/// static GAIN: AtomicU16 = AtomicU16::new(1);
/// static OFFSET: AtomicU16 = AtomicU16::new(0);
/// static LOCK: SeqLock<GlobalIrq> = SeqLock::new(GlobalIrq);
///
/// // Writer (main loop): both fields change together
/// LOCK.write(|| {
///     GAIN.store(4, Ordering::Relaxed);
///     OFFSET.store(100, Ordering::Relaxed);
/// });
///
/// // Reader (ISR)
/// let (gain, offset) = LOCK.read(|| {
///     (GAIN.load(Ordering::Relaxed), OFFSET.load(Ordering::Relaxed))
/// });
/// assert_eq!((gain, offset), (4, 100));
/// ```
#[derive(Debug)]
pub struct SeqLock<CS> {
    counter: AtomicU32,
    section: CS,
}

impl<CS> SeqLock<CS> {
    /// Creates a quiescent lock using `section` as its backend.
    pub const fn new(section: CS) -> Self {
        Self {
            counter: AtomicU32::new(0),
            section,
        }
    }

    /// Current access counter.
    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter.load(Ordering::Acquire)
    }

    /// True when no reader access is open.
    #[inline]
    pub fn is_quiescent(&self) -> bool {
        self.counter() % 2 == 0
    }

    #[inline]
    pub fn section(&self) -> &CS {
        &self.section
    }
}

impl<CS: CriticalSection> SeqLock<CS> {
    // No read-modify-write: the hook serializes the update.
    fn bump(&self) {
        let c = self.counter.load(Ordering::Relaxed);
        self.counter.store(c.wrapping_add(1), Ordering::SeqCst);
    }

    /// Opens a reader access. Never blocks.
    #[inline]
    pub fn reader_enter(&self) {
        self.section.reader(|| self.bump());
    }

    /// Closes the reader access opened by [`reader_enter`](Self::reader_enter).
    #[inline]
    pub fn reader_exit(&self) {
        self.section.reader(|| self.bump());
    }

    /// Runs `f` as one reader access.
    #[inline]
    pub fn read<R>(&self, f: impl FnOnce() -> R) -> R {
        self.reader_enter();
        let r = f();
        self.reader_exit();
        r
    }

    /// Spins until no reader access is open and returns the even counter.
    pub fn wait_quiescent(&self) -> u32 {
        let backoff = Backoff::new();
        loop {
            let c = self.counter.load(Ordering::Acquire);
            if c % 2 == 0 {
                return c;
            }
            backoff.snooze();
        }
    }

    /// Makes one commit attempt against the counter value `expected`.
    ///
    /// Runs `f` inside the writer section if no reader access started since
    /// `expected` was observed; otherwise hands `f` back unrun.
    ///
    /// # Errors
    /// Returns `Err(f)` when the counter no longer equals `expected`.
    pub fn try_write<R, F>(&self, expected: u32, f: F) -> Result<R, F>
    where
        F: FnOnce() -> R,
    {
        self.section.writer(|| {
            if self.counter.load(Ordering::SeqCst) == expected {
                Ok(f())
            } else {
                Err(f)
            }
        })
    }

    /// Runs `f` as a writer update, retrying until it lands in a quiescent
    /// window. There is no retry bound.
    pub fn write<R>(&self, f: impl FnOnce() -> R) -> R {
        let mut f = f;
        loop {
            let expected = self.wait_quiescent();
            match self.try_write(expected, f) {
                Ok(r) => return r,
                Err(back) => {
                    trace_event!("seqlock: reader access during commit, retrying");
                    f = back;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicBool, AtomicUsize};
    use std::thread;

    use super::*;
    use crate::seqlock::{GlobalIrq, IrqLine, NestedIrq, test_support::MockIrq};

    #[test]
    fn reader_toggles_parity() {
        let lock = SeqLock::new(GlobalIrq);
        assert!(lock.is_quiescent());
        assert_eq!(lock.counter(), 0);

        lock.reader_enter();
        assert!(!lock.is_quiescent());
        lock.reader_exit();
        assert!(lock.is_quiescent());
        assert_eq!(lock.counter(), 2);

        let inside = lock.read(|| lock.counter());
        assert_eq!(inside, 3);
        assert_eq!(lock.wait_quiescent(), 4);
    }

    #[test]
    fn try_write_rejects_stale_expected() {
        let lock = SeqLock::new(GlobalIrq);
        let expected = lock.wait_quiescent();
        lock.read(|| ());

        let mut value = 0;
        let res = lock.try_write(expected, || value = 1);
        assert!(res.is_err());
        assert_eq!(value, 0);

        let expected = lock.wait_quiescent();
        assert!(lock.try_write(expected, || value = 2).is_ok());
        assert_eq!(value, 2);
    }

    #[test]
    fn try_write_rejects_open_reader() {
        let lock = SeqLock::new(GlobalIrq);
        let expected = lock.counter();
        lock.reader_enter();
        assert!(lock.try_write(expected, || ()).is_err());
        lock.reader_exit();
    }

    /// Backend that lets one reader access slip in right before the first
    /// writer commit, as an ISR would.
    struct Preempt {
        fired: AtomicBool,
        attempts: AtomicUsize,
    }

    impl CriticalSection for Preempt {
        fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
            f()
        }

        fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            if !self.fired.swap(true, Ordering::Relaxed) {
                PREEMPTED.read(|| ());
            }
            f()
        }
    }

    static PREEMPTED: SeqLock<Preempt> = SeqLock::new(Preempt {
        fired: AtomicBool::new(false),
        attempts: AtomicUsize::new(0),
    });

    #[test]
    fn write_retries_after_reader_access() {
        let mut runs = 0;
        let r = PREEMPTED.write(|| {
            runs += 1;
            "committed"
        });

        assert_eq!(r, "committed");
        assert_eq!(runs, 1);
        assert_eq!(PREEMPTED.section().attempts.load(Ordering::Relaxed), 2);
        assert_eq!(PREEMPTED.counter(), 2);
    }

    #[test]
    fn locks_with_own_backends_nest_on_one_line() {
        let line = MockIrq::new(true);
        let outer = SeqLock::new(NestedIrq::new(&line));
        let inner = SeqLock::new(NestedIrq::new(&line));

        outer.write(|| {
            inner.write(|| assert!(!line.is_enabled()));
            assert!(!line.is_enabled());
        });

        assert!(line.is_enabled());
        assert_eq!(line.enables(), 1);
        assert_eq!(line.disables(), 2);
    }

    #[test]
    fn reader_never_sees_torn_update() {
        const WRITES: u32 = 2_000;

        let lock = SeqLock::new(GlobalIrq);
        let data = AtomicU32::new(0);
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..WRITES {
                    lock.write(|| {
                        let v = data.load(Ordering::Relaxed);
                        data.store(v + 1, Ordering::Relaxed);
                        let v = data.load(Ordering::Relaxed);
                        data.store(v + 1, Ordering::Relaxed);
                    });
                }
                done.store(true, Ordering::Release);
            });

            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    let v = lock.read(|| data.load(Ordering::Relaxed));
                    assert_eq!(v % 2, 0, "torn read: {v}");
                    thread::yield_now();
                }
            });
        });

        assert_eq!(data.load(Ordering::Relaxed), 2 * WRITES);
        assert!(lock.is_quiescent());
    }

    #[cfg(feature = "std")]
    #[test]
    fn host_mutex_backend_under_contention() {
        use crate::seqlock::HostMutex;

        let lock = SeqLock::new(HostMutex::new());
        let data = AtomicU32::new(0);
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..1_000 {
                    lock.write(|| {
                        data.fetch_add(1, Ordering::Relaxed);
                        data.fetch_add(1, Ordering::Relaxed);
                    });
                }
                done.store(true, Ordering::Release);
            });

            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    lock.read(|| assert_eq!(data.load(Ordering::Relaxed) % 2, 0));
                    thread::yield_now();
                }
            });
        });

        assert_eq!(data.load(Ordering::Relaxed), 2_000);
    }
}
