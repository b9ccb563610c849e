//! Pluggable block allocator capability.
//!
//! # Invariants
//! - A [`Block`] is always backed by a live allocation of exactly its layout.
//! - A block must be released through the same allocator that produced it.
//! - Allocators are not assumed safe for concurrent use; a single caller
//!   drives an allocator and its buffers for the whole operation.
//!
//! # Design Notes
//! - The block carries its own [`Layout`], so `release` needs no side table.
//! - There is no null block; "release nothing" is expressed structurally by
//!   having no block to release (see `GrowBuf`).
//! - [`SystemAlloc`] is the default capability over `std::alloc`; a `'static`
//!   instance ([`SYSTEM`]) lets buffers default to it without any state.

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

/// Errors returned by block allocators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// A zero-size allocation was requested where a backing block is required.
    SizeZero,
    /// The requested layout was invalid (size overflow or bad alignment).
    InvalidLayout,
    /// The allocator could not satisfy the request.
    OutOfMemory,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeZero => write!(f, "zero-size allocation"),
            Self::InvalidLayout => write!(f, "invalid allocation layout"),
            Self::OutOfMemory => write!(f, "allocator out of memory"),
        }
    }
}

impl std::error::Error for AllocError {}

/// An owned raw memory region: base pointer plus the layout it was
/// allocated with. No element type is implied.
///
/// # Guarantees
/// - `capacity()` is exactly the byte size the block was allocated with.
///
/// # Invariants
/// - The pointer is non-null and valid for `capacity()` bytes until the block
///   is passed back to its allocator's `release`.
#[must_use]
#[derive(Debug)]
pub struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Block {
    /// Assembles a block from a raw allocation.
    ///
    /// # Safety
    /// `ptr` must point to a live allocation of exactly `layout`, owned by
    /// the caller, and must remain valid until the block is released.
    pub unsafe fn from_raw(ptr: NonNull<u8>, layout: Layout) -> Self {
        Self { ptr, layout }
    }

    /// Capacity of the region in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Layout the region was allocated with.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Base pointer of the region.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Disassembles the block for release.
    #[inline]
    pub fn into_raw(self) -> (NonNull<u8>, Layout) {
        (self.ptr, self.layout)
    }
}

/// Allocator capability: opaque state plus an allocate/release pair.
///
/// Implementations decide their own failure modes; callers only rely on
/// `allocate` returning a block of at least the requested layout and on
/// `release` accepting any block that `allocate` produced.
pub trait BlockAlloc {
    /// Allocates a block for `layout`, or reports failure.
    fn allocate(&self, layout: Layout) -> Result<Block, AllocError>;

    /// Returns a block to the allocator.
    fn release(&self, block: Block);
}

/// The global allocator as a block-allocator capability.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAlloc;

/// Shared instance for buffers created without an explicit allocator.
pub static SYSTEM: SystemAlloc = SystemAlloc;

impl BlockAlloc for SystemAlloc {
    fn allocate(&self, layout: Layout) -> Result<Block, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::SizeZero);
        }
        // SAFETY: the layout has nonzero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        match NonNull::new(ptr) {
            // SAFETY: a non-null return from `alloc` is a live allocation of
            // exactly `layout`.
            Some(ptr) => Ok(unsafe { Block::from_raw(ptr, layout) }),
            None => Err(AllocError::OutOfMemory),
        }
    }

    fn release(&self, block: Block) {
        let (ptr, layout) = block.into_raw();
        // SAFETY: the block was produced by `alloc` with this exact layout.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) };
    }
}
