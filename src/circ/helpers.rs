//! Cursor and configuration arithmetic shared by the buffer and its views.
//!
//! Cursors are byte offsets into the owned storage; every advance wraps
//! modulo the capacity. Counters are free-running and wrap on overflow, so
//! occupancy is always computed with wrapping subtraction.

use crate::circ::CircError;

/// Advances `cursor` by `n` bytes around a ring of `capacity` bytes.
///
/// `cursor` must already be in range and `n` must not exceed `capacity`.
///
/// # Example
/// ```
/// use embedded_irqsync::circ::helpers::advance;
///
/// assert_eq!(advance(2, 1, 8), 3);
/// assert_eq!(advance(6, 4, 8), 2);
/// assert_eq!(advance(7, 1, 8), 0);
/// ```
#[inline]
pub fn advance(cursor: usize, n: usize, capacity: usize) -> usize {
    debug_assert!(cursor < capacity && n <= capacity);
    let next = cursor + n;
    if next >= capacity {
        next - capacity
    } else {
        next
    }
}

/// Bytes produced but not yet consumed, given the two free-running counters.
#[inline]
pub fn occupancy(produced: usize, consumed: usize) -> usize {
    produced.wrapping_sub(consumed)
}

/// Checks that `block_size` can partition a ring of `capacity` bytes.
///
/// # Errors
/// * [`CircError::BlockSizeTooSmall`] - if `block_size <= 1`
/// * [`CircError::BlockSizeTooLarge`] - if `block_size > capacity`
/// * [`CircError::BlockSizeMisaligned`] - if `capacity % block_size != 0`
///
/// # Example
/// ```
/// use embedded_irqsync::circ::{CircError, helpers::validate_block_size};
///
/// assert_eq!(validate_block_size(8, 4), Ok(()));
/// assert_eq!(validate_block_size(13, 5), Err(CircError::BlockSizeMisaligned));
/// ```
pub fn validate_block_size(capacity: usize, block_size: usize) -> Result<(), CircError> {
    if block_size <= 1 {
        return Err(CircError::BlockSizeTooSmall);
    }
    if block_size > capacity {
        return Err(CircError::BlockSizeTooLarge);
    }
    if capacity % block_size != 0 {
        return Err(CircError::BlockSizeMisaligned);
    }
    Ok(())
}

/// Checks `low <= high <= capacity` for warning thresholds.
///
/// # Errors
/// * [`CircError::InvalidWarning`] - if the ordering does not hold
pub fn validate_warning(capacity: usize, low: usize, high: usize) -> Result<(), CircError> {
    if low > high || high > capacity {
        return Err(CircError::InvalidWarning);
    }
    Ok(())
}

#[test]
fn cursor_and_config_edge_cases() {
    // Wrap exactly at the end
    assert_eq!(advance(3, 1, 4), 0);

    // Full-capacity advance is a no-op
    assert_eq!(advance(1, 4, 4), 1);

    // Occupancy survives counter wrap-around
    assert_eq!(occupancy(2, usize::MAX), 3);

    // Block size larger than the ring
    assert_eq!(validate_block_size(5, 10), Err(CircError::BlockSizeTooLarge));

    // Degenerate block sizes
    assert_eq!(validate_block_size(8, 1), Err(CircError::BlockSizeTooSmall));
    assert_eq!(validate_block_size(8, 0), Err(CircError::BlockSizeTooSmall));

    // Block equal to the ring
    assert_eq!(validate_block_size(2, 2), Ok(()));

    // Warning ordering
    assert_eq!(validate_warning(4, 1, 2), Ok(()));
    assert_eq!(validate_warning(4, 0, 4), Ok(()));
    assert_eq!(validate_warning(4, 3, 2), Err(CircError::InvalidWarning));
    assert_eq!(validate_warning(4, 0, 5), Err(CircError::InvalidWarning));
}
