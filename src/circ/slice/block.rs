use core::cell::Cell;

use crate::circ::{CircError, error::trap, slice::Sample};

/// Write-only window over a reserved block.
///
/// The producer fills the block in place, either at explicit offsets or
/// through a sequential cursor; nothing becomes visible to the consumer until
/// the reservation is committed. Writes past the end of the block trap with
/// [`CircError::BlockOverrun`].
///
/// # Example
/// ```
/// use embedded_irqsync::circ::BlockSlice;
///
/// let mut frame = [0u8; 6];
/// let mut block = BlockSlice::from_mut(&mut frame);
/// block.push_le(0x0ABCu16);
/// block.push_be(-2i32);
/// assert_eq!(block.remaining(), 0);
/// assert_eq!(frame, [0xBC, 0x0A, 0xFF, 0xFF, 0xFF, 0xFE]);
/// ```
#[derive(Debug)]
pub struct BlockSlice<'a> {
    cells: &'a [Cell<u8>],
    cursor: usize,
}

impl<'a> BlockSlice<'a> {
    #[inline]
    pub(crate) fn new(cells: &'a [Cell<u8>]) -> Self {
        Self { cells, cursor: 0 }
    }

    /// Block window over a plain byte slice.
    #[inline]
    pub fn from_mut(bytes: &'a mut [u8]) -> Self {
        Self::new(Cell::from_mut(bytes).as_slice_of_cells())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bytes left after the sequential cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len() - self.cursor
    }

    #[track_caller]
    fn window(&self, offset: usize, len: usize) -> &'a [Cell<u8>] {
        match offset.checked_add(len) {
            Some(end) if end <= self.cells.len() => &self.cells[offset..end],
            _ => trap(CircError::BlockOverrun),
        }
    }

    /// Stores one byte at `offset`.
    #[inline]
    #[track_caller]
    pub fn set(&mut self, offset: usize, value: u8) {
        self.window(offset, 1)[0].set(value);
    }

    /// Copies `data` into the block starting at `offset`.
    #[track_caller]
    pub fn write_bytes_at(&mut self, offset: usize, data: &[u8]) {
        let dst = self.window(offset, data.len());
        for (cell, &b) in dst.iter().zip(data) {
            cell.set(b);
        }
    }

    /// Copies `data` over the whole block. Lengths must match.
    #[track_caller]
    pub fn copy_from_slice(&mut self, data: &[u8]) {
        if data.len() != self.len() {
            trap(CircError::BlockOverrun);
        }
        self.write_bytes_at(0, data);
    }

    pub fn fill(&mut self, value: u8) {
        for cell in self.cells {
            cell.set(value);
        }
    }

    /// Stores `value` little-endian at `offset`.
    #[inline]
    #[track_caller]
    pub fn write_le_at<T: Sample>(&mut self, offset: usize, value: T) {
        self.write_bytes_at(offset, value.le_bytes().as_ref());
    }

    /// Stores `value` big-endian at `offset`.
    #[inline]
    #[track_caller]
    pub fn write_be_at<T: Sample>(&mut self, offset: usize, value: T) {
        self.write_bytes_at(offset, value.be_bytes().as_ref());
    }

    /// Appends `value` little-endian at the cursor.
    #[track_caller]
    pub fn push_le<T: Sample>(&mut self, value: T) {
        let bytes = value.le_bytes();
        self.push_bytes(bytes.as_ref());
    }

    /// Appends `value` big-endian at the cursor.
    #[track_caller]
    pub fn push_be<T: Sample>(&mut self, value: T) {
        let bytes = value.be_bytes();
        self.push_bytes(bytes.as_ref());
    }

    #[track_caller]
    fn push_bytes(&mut self, data: &[u8]) {
        self.write_bytes_at(self.cursor, data);
        self.cursor += data.len();
    }
}
