/*!
Non-owning window over contiguous memory

A [`MemoryView`] is a `(pointer, length)` pair borrowed from its owner. It's used to read the
arena in bulk without copying, or to hand a batch of values to
[`IndexedVector::extend_from_view`](crate::IndexedVector::extend_from_view).
*/

use std::{
    fmt::{self, Debug},
    marker::PhantomData,
    ops::Range,
    ptr::NonNull,
    slice,
};

use crate::{Error, Result};

/// Borrowed `(pointer, length)` window. Bounds are always known.
pub struct MemoryView<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T> Clone for MemoryView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for MemoryView<'a, T> {}

// SAFETY: same rules as `&'a [T]`
unsafe impl<'a, T: Sync> Send for MemoryView<'a, T> {}
unsafe impl<'a, T: Sync> Sync for MemoryView<'a, T> {}

impl<'a, T> From<&'a [T]> for MemoryView<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Self::new(items)
    }
}

impl<'a, T> MemoryView<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            // a slice pointer is never null
            ptr: NonNull::from(items).cast(),
            len: items.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// `ptr` must be valid for reads of `len` initialized values for `'a`, and the memory must
    /// not be mutated while the view is alive.
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_slice(&self) -> &'a [T] {
        // SAFETY: guaranteed on construction
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn get(&self, i: usize) -> Option<&'a T> {
        self.as_slice().get(i)
    }

    pub fn iter(&self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    /// Narrower window, or `None` if `range` is out of bounds.
    pub fn subview(&self, range: Range<usize>) -> Option<Self> {
        self.as_slice().get(range).map(Self::new)
    }

    pub fn split_at(&self, mid: usize) -> Option<(Self, Self)> {
        if mid > self.len {
            return None;
        }
        let (left, right) = self.as_slice().split_at(mid);
        Some((Self::new(left), Self::new(right)))
    }
}

impl<'a, T: Copy> MemoryView<'a, T> {
    /// Bulk copy-out. `dst` must have the same length as the view.
    pub fn copy_to_slice(&self, dst: &mut [T]) -> Result<()> {
        if dst.len() != self.len {
            return Err(Error::OutOfRange {
                index: self.len,
                capacity: dst.len(),
            });
        }
        dst.copy_from_slice(self.as_slice());
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

impl<'a, T> IntoIterator for MemoryView<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: Debug> Debug for MemoryView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_over_slice() {
        let xs = [1u8, 2, 3, 4, 5];
        let view = MemoryView::new(&xs);
        assert_eq!(view.len(), 5);
        assert_eq!(view.as_ptr(), xs.as_ptr());
        assert_eq!(view.get(4), Some(&5));
        assert_eq!(view.get(5), None);

        let sub = view.subview(1..3).unwrap();
        assert_eq!(sub.as_slice(), &[2, 3]);
        assert!(view.subview(3..6).is_none());

        let (l, r) = view.split_at(2).unwrap();
        assert_eq!((l.len(), r.len()), (2, 3));
        assert!(view.split_at(6).is_none());
    }

    #[test]
    fn copy_out_checks_length() {
        let xs = [7u32, 8, 9];
        let view = MemoryView::from(&xs[..]);

        let mut dst = [0u32; 3];
        view.copy_to_slice(&mut dst).unwrap();
        assert_eq!(dst, xs);

        let mut short = [0u32; 2];
        assert_eq!(
            view.copy_to_slice(&mut short),
            Err(Error::OutOfRange {
                index: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn empty_view() {
        let xs: [u16; 0] = [];
        let view = MemoryView::new(&xs);
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
        assert_eq!(format!("{:?}", view), "[]");
    }
}
