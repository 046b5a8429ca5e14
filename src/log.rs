//! Event tracing, compiled in only with the `defmt` feature.

/// Emits a `defmt::trace!` event when the `defmt` feature is enabled and
/// expands to nothing otherwise.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        {
            defmt::trace!($($arg)*);
        }
    };
}

pub(crate) use trace_event;
