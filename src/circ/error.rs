/// Precondition violations of the circular buffer.
///
/// These describe bugs in the calling device logic. The trapping API turns
/// them into a panic carrying the [`Display`](core::fmt::Display) text; the
/// `try_*` configuration functions return them instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CircError {
    /// Backing storage has zero length.
    ZeroCapacity,
    /// Byte-mode operation attempted while in block mode.
    ByteOpInBlockMode,
    /// Block operation attempted while in byte mode.
    NotInBlockMode,
    /// Block mode was already entered.
    AlreadyBlockMode,
    /// Block size must be greater than one.
    BlockSizeTooSmall,
    /// Block size exceeds the buffer capacity.
    BlockSizeTooLarge,
    /// Capacity is not a multiple of the block size.
    BlockSizeMisaligned,
    /// A block reservation is already outstanding.
    ReservationOutstanding,
    /// No block reservation is outstanding.
    NoReservation,
    /// A status region is already attached.
    StatusAttached,
    /// Warning thresholds violate `low <= high <= capacity`.
    InvalidWarning,
    /// Write past the end of a reserved block.
    BlockOverrun,
}

impl core::fmt::Display for CircError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CircError::ZeroCapacity => write!(f, "circular buffer capacity must be non-zero"),
            CircError::ByteOpInBlockMode => write!(f, "byte operation in block mode"),
            CircError::NotInBlockMode => write!(f, "block operation outside block mode"),
            CircError::AlreadyBlockMode => write!(f, "block mode already entered"),
            CircError::BlockSizeTooSmall => write!(f, "block size must be greater than 1"),
            CircError::BlockSizeTooLarge => write!(f, "block size exceeds capacity"),
            CircError::BlockSizeMisaligned => {
                write!(f, "capacity is not a multiple of block size")
            }
            CircError::ReservationOutstanding => write!(f, "block reservation already outstanding"),
            CircError::NoReservation => write!(f, "no outstanding block reservation"),
            CircError::StatusAttached => write!(f, "status region already attached"),
            CircError::InvalidWarning => {
                write!(f, "warning thresholds must satisfy low <= high <= capacity")
            }
            CircError::BlockOverrun => write!(f, "write past the end of the reserved block"),
        }
    }
}

/// Fatal trap for a precondition violation.
#[cold]
#[track_caller]
pub(crate) fn trap(err: CircError) -> ! {
    panic!("{}", err)
}

/// Unwraps a configuration result, trapping on error.
#[inline]
#[track_caller]
pub(crate) fn or_trap<T>(res: Result<T, CircError>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => trap(e),
    }
}
