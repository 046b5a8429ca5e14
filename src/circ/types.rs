/// Poison value returned by byte-returning reads once a read session has
/// run out of data.
pub const BAD_BYTE: u8 = 0xBB;

/// Outcome of filling a reserved block.
///
/// Returned from the closure given to
/// [`CircBuffer::with_block`](crate::circ::CircBuffer::with_block) to say
/// whether the block should be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockWrite<R> {
    /// Publish the block to the consumer and return the result.
    Commit(R),
    /// Drop the reservation without publishing; return the result.
    Cancel(R),
}

impl<R> BlockWrite<R> {
    /// Returns true if this result publishes the block.
    #[inline]
    pub fn is_commit(&self) -> bool {
        matches!(self, BlockWrite::Commit(_))
    }

    /// Unwraps the inner value regardless of outcome.
    #[inline]
    pub fn into_inner(self) -> R {
        match self {
            BlockWrite::Commit(r) | BlockWrite::Cancel(r) => r,
        }
    }
}
