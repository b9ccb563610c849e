//! Growable, allocator-parameterized contiguous buffer.
//!
//! # Invariants
//! - `len <= capacity` at all times.
//! - Elements in `0..len` are initialized; storage in `len..capacity` is
//!   uninitialized and must never be read (for byte buffers, a high-water
//!   mark tracks the prefix that has ever been initialized).
//! - The buffer exclusively owns its block and releases it through the same
//!   allocator that produced it.
//! - Growth preserves elements `0..min(len, new_cap)`; a failed allocation
//!   leaves the buffer untouched and is reported, never assumed away.
//!
//! # Design Notes
//! - One generic container parameterized over the element type and the
//!   allocator capability, instead of per-type code expansion.
//! - A buffer created without an explicit allocator borrows the shared
//!   [`SYSTEM`] instance, so growth always has an allocator to call.
//! - `remove_value` swaps the last element into the hole: O(1) removal at
//!   the cost of element order. This is a deliberate trade-off.
//! - Zero-sized element types are not supported; they have no meaningful
//!   block backing.

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::alloc::{AllocError, Block, BlockAlloc, SystemAlloc, SYSTEM};

/// Capacity growth policy: `new_cap = max(min_cap, cap * multiplier + additive)`.
///
/// The floor also applies to the first allocation, so tiny buffers do not
/// churn through one-element blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Multiplicative growth factor.
    pub multiplier: usize,
    /// Additive growth constant.
    pub additive: usize,
    /// Minimum capacity of any grown buffer.
    pub min_cap: usize,
}

impl GrowthPolicy {
    /// Default geometric doubling.
    pub const DOUBLING: GrowthPolicy = GrowthPolicy {
        multiplier: 2,
        additive: 0,
        min_cap: 4,
    };

    /// Next capacity for a buffer at `cap` that must hold at least `needed`.
    pub fn next_capacity(&self, cap: usize, needed: usize) -> usize {
        let grown = cap
            .saturating_mul(self.multiplier)
            .saturating_add(self.additive);
        grown.max(self.min_cap).max(needed)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DOUBLING
    }
}

/// Owned, contiguous, resizable sequence of `T` backed by a borrowed
/// allocator capability.
///
/// # Guarantees
/// - Elements are stored contiguously; `as_slice` covers exactly `0..len`.
/// - Dropping the buffer drops its elements and releases the block.
///
/// # Invariants
/// - `len <= capacity`; only `0..len` is initialized.
/// - `init >= len` tracks bytes ever initialized in the current block
///   (used by the `u8` spare-capacity API; see `spare_bytes_mut`).
pub struct GrowBuf<'a, T, A: BlockAlloc + ?Sized = SystemAlloc> {
    block: Option<Block>,
    len: usize,
    // Elements ever initialized in the current block; only meaningful for
    // element types without drop glue (the byte path).
    init: usize,
    alloc: &'a A,
    _marker: PhantomData<T>,
}

impl<T> GrowBuf<'static, T, SystemAlloc> {
    /// Creates an empty buffer over the system allocator. No allocation.
    pub fn new() -> Self {
        Self::new_in(&SYSTEM)
    }
}

impl<T> Default for GrowBuf<'static, T, SystemAlloc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, A: BlockAlloc + ?Sized> GrowBuf<'a, T, A> {
    /// Creates an empty buffer over `alloc`. No allocation.
    pub fn new_in(alloc: &'a A) -> Self {
        assert!(mem::size_of::<T>() != 0, "zero-sized element type");
        Self {
            block: None,
            len: 0,
            init: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates a buffer with at least `cap` capacity.
    pub fn with_capacity_in(cap: usize, alloc: &'a A) -> Result<Self, AllocError> {
        let mut buf = Self::new_in(alloc);
        buf.ensure_capacity(cap)?;
        Ok(buf)
    }

    /// Number of initialized elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current block can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        match &self.block {
            Some(block) => block.capacity() / mem::size_of::<T>(),
            None => 0,
        }
    }

    #[inline]
    fn data_ptr(&self) -> *mut T {
        match &self.block {
            Some(block) => block.as_ptr().cast::<T>(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// Shared view of the initialized prefix.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `0..len` is initialized and contiguous.
        unsafe { slice::from_raw_parts(self.data_ptr(), self.len) }
    }

    /// Mutable view of the initialized prefix.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `0..len` is initialized and contiguous; `&mut self` gives
        // exclusive access.
        unsafe { slice::from_raw_parts_mut(self.data_ptr(), self.len) }
    }

    /// Grows (or shrinks) the backing block to exactly `new_cap` elements.
    ///
    /// Elements `0..min(len, new_cap)` move to the new block; shrinking below
    /// `len` drops the cut-off elements first. On allocation failure the
    /// buffer is unchanged.
    pub fn realloc(&mut self, new_cap: usize) -> Result<(), AllocError> {
        if new_cap == 0 {
            self.release();
            return Ok(());
        }
        let layout = Layout::array::<T>(new_cap).map_err(|_| AllocError::InvalidLayout)?;
        let new_block = self.alloc.allocate(layout)?;

        self.truncate(self.len.min(new_cap));
        let keep = self.len;
        if keep != 0 {
            // SAFETY: both blocks are valid for `keep` elements and cannot
            // overlap; the old elements are moved, not copied, because the
            // old block is released below without dropping them.
            unsafe {
                ptr::copy_nonoverlapping(self.data_ptr(), new_block.as_ptr().cast::<T>(), keep)
            };
        }
        if let Some(old) = self.block.replace(new_block) {
            self.alloc.release(old);
        }
        self.init = keep;
        Ok(())
    }

    /// No-op if `capacity >= min_cap`; otherwise grows by the default
    /// doubling policy (with `min_cap` as the floor).
    pub fn ensure_capacity(&mut self, min_cap: usize) -> Result<(), AllocError> {
        self.ensure_capacity_with(&GrowthPolicy::DOUBLING, min_cap)
    }

    /// No-op if `capacity >= min_cap`; otherwise grows by `policy`.
    pub fn ensure_capacity_with(
        &mut self,
        policy: &GrowthPolicy,
        min_cap: usize,
    ) -> Result<(), AllocError> {
        let cap = self.capacity();
        if cap >= min_cap {
            return Ok(());
        }
        self.realloc(policy.next_capacity(cap, min_cap))
    }

    /// Appends one element, growing by the default policy if needed.
    pub fn push(&mut self, value: T) -> Result<(), AllocError> {
        self.push_with(&GrowthPolicy::DOUBLING, value)
    }

    /// Appends one element, growing by `policy` if needed.
    pub fn push_with(&mut self, policy: &GrowthPolicy, value: T) -> Result<(), AllocError> {
        if self.len == self.capacity() {
            let needed = self.len.checked_add(1).ok_or(AllocError::InvalidLayout)?;
            self.realloc(policy.next_capacity(self.capacity(), needed))?;
        }
        // SAFETY: `len < capacity` after the growth above.
        unsafe { self.data_ptr().add(self.len).write(value) };
        self.len += 1;
        self.init = self.init.max(self.len);
        Ok(())
    }

    /// Appends cloned elements from `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let needed = self
            .len
            .checked_add(items.len())
            .ok_or(AllocError::InvalidLayout)?;
        self.ensure_capacity(needed)?;
        for item in items {
            // SAFETY: capacity was reserved above; `len` advances one slot at
            // a time so a panicking `clone` cannot expose uninitialized
            // elements.
            unsafe { self.data_ptr().add(self.len).write(item.clone()) };
            self.len += 1;
        }
        self.init = self.init.max(self.len);
        Ok(())
    }

    /// Shortens the buffer to `new_len` elements, dropping the rest.
    /// No-op if `new_len >= len`. Capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        self.len = new_len;
        if mem::needs_drop::<T>() {
            // SAFETY: `new_len..old_len` is initialized; `len` was lowered
            // first so a panicking drop cannot cause a double drop.
            unsafe {
                for i in new_len..old_len {
                    ptr::drop_in_place(self.data_ptr().add(i));
                }
            }
        }
    }

    /// Drops all elements. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Removes the element at `index` by swapping the last element into its
    /// slot. O(1); does not preserve element order.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "swap_remove index out of bounds");
        // SAFETY: `index` and `len - 1` are initialized. The slot at `index`
        // is either the last element (then simply excluded by the new `len`)
        // or overwritten by the bitwise move of the last element, so no
        // element is dropped twice or duplicated.
        unsafe {
            let base = self.data_ptr();
            let value = base.add(index).read();
            self.len -= 1;
            if index != self.len {
                ptr::copy(base.add(self.len), base.add(index), 1);
            }
            value
        }
    }

    /// Removes the first element equal to `value`, swapping the last element
    /// into its slot. Returns whether a match was found.
    ///
    /// Order is not preserved; see [`GrowBuf::swap_remove`].
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        for index in 0..self.len {
            if self.as_slice()[index] == *value {
                self.swap_remove(index);
                return true;
            }
        }
        false
    }

    /// Drops all elements and returns the block to the allocator, resetting
    /// length and capacity to zero. No-op on an unallocated buffer.
    pub fn release(&mut self) {
        self.clear();
        if let Some(block) = self.block.take() {
            self.alloc.release(block);
        }
        self.init = 0;
    }
}

impl<'a, A: BlockAlloc + ?Sized> GrowBuf<'a, u8, A> {
    /// Exposes the spare capacity (`len..capacity`) as a writable byte slice.
    ///
    /// Bytes above the initialized high-water mark are zeroed on first
    /// exposure, so the returned slice is always valid to read and write.
    /// Commit bytes written here with [`GrowBuf::advance`].
    pub fn spare_bytes_mut(&mut self) -> &mut [u8] {
        let cap = self.capacity();
        if self.init < cap {
            // SAFETY: `init..cap` lies inside the owned block.
            unsafe { ptr::write_bytes(self.data_ptr().add(self.init), 0, cap - self.init) };
            self.init = cap;
        }
        // SAFETY: `len..cap` is inside the block and fully initialized above.
        unsafe { slice::from_raw_parts_mut(self.data_ptr().add(self.len), cap - self.len) }
    }

    /// Commits `n` bytes previously written through `spare_bytes_mut`.
    ///
    /// # Panics
    /// Panics if `n` exceeds the initialized spare region.
    pub fn advance(&mut self, n: usize) {
        assert!(
            self.len + n <= self.init && self.len + n <= self.capacity(),
            "advance past initialized spare capacity"
        );
        self.len += n;
    }
}

impl<T, A: BlockAlloc + ?Sized> Deref for GrowBuf<'_, T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: BlockAlloc + ?Sized> DerefMut for GrowBuf<'_, T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: BlockAlloc + ?Sized> fmt::Debug for GrowBuf<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, A: BlockAlloc + ?Sized> Drop for GrowBuf<'_, T, A> {
    fn drop(&mut self) {
        self.release();
    }
}
