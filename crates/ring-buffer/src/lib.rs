//! Bounded History Buffers
//!
//! Fixed-capacity FIFO windows that evict their oldest entry on overflow.
//! Used for landmark history, scalar smoothing, and classification streaks.

mod buffer;

pub use buffer::RingBuffer;
