//! Critical-section backends for [`SeqLock`](crate::seqlock::SeqLock).
//!
//! Every backend provides one hook for the reader's counter update and one
//! for the writer's check-and-commit. The writer hook must keep the reader
//! from running; the reader hook may do nothing when the reader cannot be
//! preempted by anything touching the lock.

/// The pair of hooks a [`SeqLock`](crate::seqlock::SeqLock) runs its
/// critical steps in.
pub trait CriticalSection {
    /// Runs the reader's counter update.
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R;

    /// Runs the writer's check-and-commit with the reader excluded.
    fn writer<R>(&self, f: impl FnOnce() -> R) -> R;
}

impl<T: CriticalSection + ?Sized> CriticalSection for &T {
    #[inline]
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).reader(f)
    }

    #[inline]
    fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).writer(f)
    }
}

/// A single maskable interrupt line, usually the one the reader runs on.
pub trait IrqLine {
    fn disable(&self);
    fn enable(&self);
    fn is_enabled(&self) -> bool;
}

impl<L: IrqLine + ?Sized> IrqLine for &L {
    #[inline]
    fn disable(&self) {
        (**self).disable()
    }

    #[inline]
    fn enable(&self) {
        (**self).enable()
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

/// Backend for a reader on a dedicated, highest-priority interrupt.
///
/// The reader hook is a no-op. The writer masks the reader's line for the
/// duration of the commit and unmasks it afterwards.
#[derive(Debug)]
pub struct DedicatedIrq<L> {
    line: L,
}

impl<L: IrqLine> DedicatedIrq<L> {
    pub const fn new(line: L) -> Self {
        Self { line }
    }

    pub fn line(&self) -> &L {
        &self.line
    }
}

impl<L: IrqLine> CriticalSection for DedicatedIrq<L> {
    #[inline]
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }

    #[inline]
    fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
        self.line.disable();
        let r = f();
        self.line.enable();
        r
    }
}

/// Backend for writers that may preempt each other while masking the line.
///
/// Each writer section restores the line to the state it found, so a nested
/// section leaves it masked and only the outermost one unmasks it. Several
/// instances, on one lock or many, may mask the same line (see the `&L`
/// impl of [`IrqLine`]).
#[derive(Debug)]
pub struct NestedIrq<L> {
    line: L,
}

impl<L: IrqLine> NestedIrq<L> {
    pub const fn new(line: L) -> Self {
        Self { line }
    }

    pub fn line(&self) -> &L {
        &self.line
    }
}

impl<L: IrqLine> CriticalSection for NestedIrq<L> {
    #[inline]
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }

    fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
        let was_enabled = self.line.is_enabled();
        self.line.disable();
        let r = f();
        if was_enabled {
            self.line.enable();
        }
        r
    }
}

/// Backend whose four hooks are supplied by the caller.
///
/// ```
/// use embedded_irqsync::seqlock::{InlineHooks, SeqLock};
///
/// fn nothing() {}
///
/// static LOCK: SeqLock<InlineHooks> = SeqLock::new(InlineHooks {
///     enter_reader: nothing,
///     leave_reader: nothing,
///     enter_writer: nothing,
///     leave_writer: nothing,
/// });
///
/// LOCK.read(|| ());
/// assert!(LOCK.is_quiescent());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InlineHooks {
    pub enter_reader: fn(),
    pub leave_reader: fn(),
    pub enter_writer: fn(),
    pub leave_writer: fn(),
}

impl CriticalSection for InlineHooks {
    #[inline]
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
        (self.enter_reader)();
        let r = f();
        (self.leave_reader)();
        r
    }

    #[inline]
    fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
        (self.enter_writer)();
        let r = f();
        (self.leave_writer)();
        r
    }
}

/// Backend that masks all interrupts through the `critical-section` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalIrq;

impl CriticalSection for GlobalIrq {
    #[inline]
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }

    #[inline]
    fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}

/// Backend for host builds: both hooks take the same mutex.
#[cfg(feature = "std")]
pub struct HostMutex {
    lock: parking_lot::Mutex<()>,
}

#[cfg(feature = "std")]
impl HostMutex {
    pub const fn new() -> Self {
        Self {
            lock: parking_lot::const_mutex(()),
        }
    }
}

#[cfg(feature = "std")]
impl Default for HostMutex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl core::fmt::Debug for HostMutex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HostMutex").finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl CriticalSection for HostMutex {
    fn reader<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock.lock();
        f()
    }

    fn writer<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock.lock();
        f()
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::seqlock::test_support::MockIrq;

    #[test]
    fn dedicated_masks_only_for_writer() {
        let cs = DedicatedIrq::new(MockIrq::new(true));

        let seen = cs.reader(|| cs.line().is_enabled());
        assert!(seen);
        assert_eq!(cs.line().disables(), 0);

        let seen = cs.writer(|| cs.line().is_enabled());
        assert!(!seen);
        assert!(cs.line().is_enabled());
        assert_eq!(cs.line().disables(), 1);
        assert_eq!(cs.line().enables(), 1);
    }

    #[test]
    fn nested_writer_keeps_line_masked_until_outermost_exit() {
        let cs = NestedIrq::new(MockIrq::new(true));

        cs.writer(|| {
            cs.writer(|| {
                assert!(!cs.line().is_enabled());
            });
            // Inner exit must not unmask
            assert!(!cs.line().is_enabled());
        });

        assert!(cs.line().is_enabled());
        assert_eq!(cs.line().enables(), 1);
    }

    #[test]
    fn separate_instances_share_one_line() {
        let line = MockIrq::new(true);
        let outer = NestedIrq::new(&line);
        let inner = NestedIrq::new(&line);

        outer.writer(|| {
            inner.writer(|| assert!(!line.is_enabled()));
            assert!(!line.is_enabled());
            assert_eq!(line.enables(), 0);
        });

        assert!(line.is_enabled());
        assert_eq!(line.disables(), 2);
        assert_eq!(line.enables(), 1);
    }

    #[test]
    fn nested_writer_restores_masked_line() {
        let cs = NestedIrq::new(MockIrq::new(false));
        cs.writer(|| {});
        assert!(!cs.line().is_enabled());
        assert_eq!(cs.line().enables(), 0);
    }

    static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn bump_hook() {
        HOOK_CALLS.fetch_add(1, Ordering::Relaxed);
    }

    fn noop_hook() {}

    #[test]
    fn inline_hooks_bracket_both_roles() {
        let cs = InlineHooks {
            enter_reader: bump_hook,
            leave_reader: bump_hook,
            enter_writer: bump_hook,
            leave_writer: noop_hook,
        };

        let before = HOOK_CALLS.load(Ordering::Relaxed);
        assert_eq!(cs.reader(|| 1), 1);
        assert_eq!(cs.writer(|| 2), 2);
        assert_eq!(HOOK_CALLS.load(Ordering::Relaxed) - before, 3);
    }

    #[test]
    fn global_irq_runs_closure() {
        assert_eq!(GlobalIrq.reader(|| 3), 3);
        assert_eq!(GlobalIrq.writer(|| GlobalIrq.reader(|| 4)), 4);
    }

    #[cfg(feature = "std")]
    #[test]
    fn host_mutex_runs_closure() {
        let cs = HostMutex::new();
        assert_eq!(cs.reader(|| 5), 5);
        assert_eq!(cs.writer(|| 6), 6);
    }
}
