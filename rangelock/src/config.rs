//! Construction-time configuration for [`RangeLock`](crate::RangeLock).
//!
//! There are no runtime configuration flags — only one knob at
//! construction: the skip list's maximum height `H` (the height sampler's
//! distribution parameter `p` is fixed at `1/2`).

/// Configuration for a [`RangeLock`](crate::RangeLock) instance.
#[derive(Debug, Clone, Copy)]
pub struct RangeLockConfig {
    /// Maximum skip list height. Must be `>= 1`. Typical values are 4-20:
    /// higher values lower worst-case traversal length at the cost of more
    /// per-node memory (one forward pointer per occupied level).
    pub height: usize,
}

impl Default for RangeLockConfig {
    fn default() -> Self {
        Self { height: 16 }
    }
}
