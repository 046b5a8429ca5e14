use core::sync::atomic::AtomicU8;

use crate::circ::{CircBuffer, CircError, error::or_trap};

/// One-shot configuration of a [`CircBuffer`].
///
/// Settings can be given in any order; they are applied and validated in
/// [`build`](Self::build).
///
/// ```
/// use embedded_irqsync::circ::CircBufferBuilder;
///
/// let mut storage = [0u8; 64];
/// let buf = CircBufferBuilder::new(&mut storage)
///     .warning(16, 48)
///     .block_size(8)
///     .build();
///
/// assert!(buf.is_block_mode());
/// assert_eq!(buf.warning_thresholds(), (16, 48));
/// ```
pub struct CircBufferBuilder<'a> {
    storage: &'a mut [u8],
    status: &'a [AtomicU8],
    block_size: Option<usize>,
    warning: Option<(usize, usize)>,
}

impl<'a> CircBufferBuilder<'a> {
    pub fn new(storage: &'a mut [u8]) -> Self {
        Self {
            storage,
            status: &[],
            block_size: None,
            warning: None,
        }
    }

    /// Status region replayed at the head of every read session.
    pub fn status(mut self, status: &'a [AtomicU8]) -> Self {
        self.status = status;
        self
    }

    /// Puts the buffer in block mode with blocks of `block_size` bytes.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Warning hysteresis thresholds.
    pub fn warning(mut self, low: usize, high: usize) -> Self {
        self.warning = Some((low, high));
        self
    }

    /// Builds the buffer.
    ///
    /// # Panics
    /// Panics if any setting is invalid; see [`try_build`](Self::try_build).
    #[track_caller]
    pub fn build(self) -> CircBuffer<'a> {
        or_trap(self.try_build())
    }

    /// Builds the buffer, reporting the first invalid setting.
    ///
    /// # Errors
    /// - [`CircError::ZeroCapacity`] if the storage is empty
    /// - a block size error if the block size does not fit the storage
    /// - [`CircError::InvalidWarning`] unless `low <= high <= capacity`
    pub fn try_build(self) -> Result<CircBuffer<'a>, CircError> {
        let mut buf = CircBuffer::try_new(self.storage)?;
        if !self.status.is_empty() {
            buf.try_attach_status(self.status)?;
        }
        if let Some(block_size) = self.block_size {
            buf.try_enter_block_mode(block_size)?;
        }
        if let Some((low, high)) = self.warning {
            buf.try_configure_warning(low, high)?;
        }
        Ok(buf)
    }
}
