//! Arena allocation for stream storage.

/// Provides the contiguous storage behind a [`Stream`](crate::Stream).
///
/// Implementations choose where the arena lives (plain heap, a DMA-safe
/// region, a static pool); the stream only requires `size` contiguous,
/// zeroed bytes that it will own for its whole lifetime.
pub trait Allocator: Send + Sync {
    /// Returns `size` zeroed bytes.
    fn allocate(&self, size: usize) -> Box<[u8]>;
}

/// Heap allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAllocator;

impl Allocator for StandardAllocator {
    fn allocate(&self, size: usize) -> Box<[u8]> {
        vec![0u8; size].into_boxed_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_allocator() {
        let arena = StandardAllocator.allocate(128);
        assert_eq!(arena.len(), 128);
        assert!(arena.iter().all(|&b| b == 0));
        assert!(StandardAllocator.allocate(0).is_empty());
    }
}
