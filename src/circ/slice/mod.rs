mod block;
mod sample;

pub use block::BlockSlice;
pub use sample::Sample;
