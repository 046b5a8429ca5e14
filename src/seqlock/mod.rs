//! Sequential lock between a non-blocking reader and a retrying writer.
//!
//! The reader is usually the highest-priority interrupt. It brackets every
//! access to the protected state with [`SeqLock::reader_enter`] and
//! [`SeqLock::reader_exit`], which makes the counter odd while the access is
//! in progress. A writer waits for an even counter, enters its critical
//! section, and commits only if no reader access started in the meantime.
//!
//! How the writer excludes the reader is decided by the [`CriticalSection`]
//! backend chosen as the lock's type parameter. There is no default backend,
//! so a lock without one does not compile.

pub mod lock;
pub mod section;

#[cfg(test)]
mod test_support;

pub use lock::SeqLock;
#[cfg(feature = "std")]
pub use section::HostMutex;
pub use section::{CriticalSection, DedicatedIrq, GlobalIrq, InlineHooks, IrqLine, NestedIrq};

pub mod prelude {
    #[cfg(feature = "std")]
    pub use super::HostMutex;
    pub use super::{
        CriticalSection, DedicatedIrq, GlobalIrq, InlineHooks, IrqLine, NestedIrq, SeqLock,
    };
}
