//! Test support utilities - only compiled in test builds.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::seqlock::IrqLine;

/// Interrupt line that records how it was driven.
pub struct MockIrq {
    enabled: AtomicBool,
    disables: AtomicUsize,
    enables: AtomicUsize,
}

impl MockIrq {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            disables: AtomicUsize::new(0),
            enables: AtomicUsize::new(0),
        }
    }

    pub fn disables(&self) -> usize {
        self.disables.load(Ordering::Relaxed)
    }

    pub fn enables(&self) -> usize {
        self.enables.load(Ordering::Relaxed)
    }
}

impl IrqLine for MockIrq {
    fn disable(&self) {
        self.disables.fetch_add(1, Ordering::Relaxed);
        self.enabled.store(false, Ordering::Relaxed);
    }

    fn enable(&self) {
        self.enables.fetch_add(1, Ordering::Relaxed);
        self.enabled.store(true, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
