mod sealed {
    pub trait Sealed {}
}

/// Fixed-width value that can be packed into a reserved block.
///
/// Implemented for the integer widths an ADC or timer block carries, and for
/// `f32`. Sealed.
pub trait Sample: sealed::Sealed + Copy {
    /// Encoded form, `[u8; size_of::<Self>()]`.
    type Bytes: AsRef<[u8]>;

    fn le_bytes(self) -> Self::Bytes;
    fn be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_sample {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Sample for $ty {
            type Bytes = [u8; core::mem::size_of::<$ty>()];

            #[inline]
            fn le_bytes(self) -> Self::Bytes {
                self.to_le_bytes()
            }

            #[inline]
            fn be_bytes(self) -> Self::Bytes {
                self.to_be_bytes()
            }
        }
    )*};
}

impl_sample!(u8, i8, u16, i16, u32, i32, f32);
