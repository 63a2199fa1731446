/*!
Untyped, zero-initialized byte region

[`Arena`] owns exactly one heap block. It is released on drop, so it can't be freed twice.
*/

use std::{alloc::Layout, ptr::NonNull};

use crate::{Error, Result};

/// One contiguous heap block, zero-filled on allocation.
#[derive(Debug)]
pub struct Arena {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: the block is uniquely owned plain memory, like `Box<[u8]>`
unsafe impl Send for Arena {}
unsafe impl Sync for Arena {}

impl Arena {
    /// Allocates a zero-filled block. Zero-sized layouts are rejected.
    pub fn allocate(layout: Layout) -> Result<Self> {
        if layout.size() == 0 {
            return Err(Error::AllocationFailure { bytes: 0 });
        }

        // SAFETY: the layout has non-zero size
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(Error::AllocationFailure {
            bytes: layout.size(),
        })?;

        log::trace!(
            "arena: allocated {} bytes at {:p}",
            layout.size(),
            ptr.as_ptr()
        );
        Ok(Self { ptr, layout })
    }

    /// Allocates room for `n` values of `T`, zero-filled.
    pub fn allocate_array<T>(n: usize) -> Result<Self> {
        let layout = Layout::array::<T>(n).map_err(|_| Error::AllocationFailure {
            bytes: n.saturating_mul(std::mem::size_of::<T>()),
        })?;
        Self::allocate(layout)
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Copies the first `byte_count` bytes of `src` to the start of `dst`.
    pub fn bulk_copy(src: &Arena, dst: &mut Arena, byte_count: usize) -> Result<()> {
        let limit = src.len().min(dst.len());
        if byte_count > limit {
            return Err(Error::OutOfRange {
                index: byte_count,
                capacity: limit,
            });
        }

        // SAFETY: both ranges are in bounds and two live arenas never overlap
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), dst.as_mut_ptr(), byte_count);
        }
        Ok(())
    }

    /// Zeroes `byte_count` bytes starting at `offset`.
    pub fn zero_fill(&mut self, offset: usize, byte_count: usize) -> Result<()> {
        match offset.checked_add(byte_count) {
            Some(end) if end <= self.len() => {}
            _ => {
                return Err(Error::OutOfRange {
                    index: offset.saturating_add(byte_count),
                    capacity: self.len(),
                })
            }
        }

        // SAFETY: `offset..offset + byte_count` is in bounds
        unsafe {
            std::ptr::write_bytes(self.as_mut_ptr().add(offset), 0, byte_count);
        }
        Ok(())
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        log::trace!(
            "arena: released {} bytes at {:p}",
            self.layout.size(),
            self.ptr.as_ptr()
        );
        // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact layout
        unsafe {
            std::alloc::dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(arena: &Arena) -> &[u8] {
        unsafe { std::slice::from_raw_parts(arena.as_ptr(), arena.len()) }
    }

    #[test]
    fn allocation_is_zeroed() {
        let arena = Arena::allocate_array::<u64>(8).unwrap();
        assert_eq!(arena.len(), 64);
        assert!(bytes(&arena).iter().all(|b| *b == 0));
        assert_eq!(arena.as_ptr() as usize % std::mem::align_of::<u64>(), 0);
    }

    #[test]
    fn zero_sized_is_rejected() {
        assert_eq!(
            Arena::allocate_array::<u64>(0).unwrap_err(),
            Error::AllocationFailure { bytes: 0 }
        );
    }

    #[test]
    fn copy_then_zero() {
        let mut src = Arena::allocate_array::<u8>(8).unwrap();
        unsafe {
            std::ptr::write_bytes(src.as_mut_ptr(), 0xab, 8);
        }

        let mut dst = Arena::allocate_array::<u8>(16).unwrap();
        Arena::bulk_copy(&src, &mut dst, 8).unwrap();
        assert_eq!(&bytes(&dst)[..8], &[0xab; 8]);
        assert_eq!(&bytes(&dst)[8..], &[0; 8]);

        dst.zero_fill(2, 4).unwrap();
        assert_eq!(&bytes(&dst)[..8], &[0xab, 0xab, 0, 0, 0, 0, 0xab, 0xab]);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let src = Arena::allocate_array::<u8>(16).unwrap();
        let mut dst = Arena::allocate_array::<u8>(8).unwrap();
        assert_eq!(
            Arena::bulk_copy(&src, &mut dst, 9),
            Err(Error::OutOfRange {
                index: 9,
                capacity: 8
            })
        );
        assert!(dst.zero_fill(4, 5).is_err());
        assert!(dst.zero_fill(usize::MAX, 2).is_err());
        assert!(dst.zero_fill(8, 0).is_ok());
    }
}
