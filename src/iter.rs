/*!
`ivec_arena` iterator types

All of them walk the circular active list starting from the head and stop after `len` steps.
*/

use std::{iter::FusedIterator, marker::PhantomData};

use derivative::Derivative;

use crate::{node::Node, DefaultIndex, NodeId, RawIndex};

/// Walk direction over the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Next,
    Prev,
}

/// [`IndexedVector::iter`](crate::IndexedVector::iter) → `(NodeId, &T)`
#[derive(Derivative)]
#[derivative(Debug, Clone(bound = ""))]
pub struct Iter<'a, T, I: RawIndex = DefaultIndex> {
    #[derivative(Debug = "ignore")]
    pub(crate) slots: &'a [Node<T, I>],
    pub(crate) cursor: I,
    pub(crate) remaining: usize,
    pub(crate) dir: Direction,
}

impl<'a, T, I: RawIndex> Iterator for Iter<'a, T, I> {
    type Item = (NodeId<T, I>, &'a T);
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let raw = self.cursor;
        let node = self.slots.get(raw.to_usize())?;
        let value = node.value()?;
        self.cursor = match self.dir {
            Direction::Next => node.next,
            Direction::Prev => node.prev,
        };
        self.remaining -= 1;

        Some((NodeId::from_raw(raw), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, I: RawIndex> FusedIterator for Iter<'a, T, I> {}
impl<'a, T, I: RawIndex> ExactSizeIterator for Iter<'a, T, I> {}

/// [`IndexedVector::values`](crate::IndexedVector::values) → `&T`
#[derive(Derivative)]
#[derivative(Debug, Clone(bound = ""))]
pub struct Values<'a, T, I: RawIndex = DefaultIndex> {
    pub(crate) iter: Iter<'a, T, I>,
}

impl<'a, T, I: RawIndex> Iterator for Values<'a, T, I> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T, I: RawIndex> FusedIterator for Values<'a, T, I> {}
impl<'a, T, I: RawIndex> ExactSizeIterator for Values<'a, T, I> {}

/// [`IndexedVector::values_mut`](crate::IndexedVector::values_mut) → `&mut T`
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ValuesMut<'a, T, I: RawIndex = DefaultIndex> {
    /// Base of the slot array, borrowed mutably for `'a`
    #[derivative(Debug = "ignore")]
    pub(crate) slots: *mut Node<T, I>,
    pub(crate) capacity: usize,
    pub(crate) cursor: I,
    /// Number of items left to visit
    pub(crate) remaining: usize,
    #[derivative(Debug = "ignore")]
    pub(crate) _marker: PhantomData<&'a mut [Node<T, I>]>,
}

impl<'a, T, I: RawIndex> Iterator for ValuesMut<'a, T, I> {
    type Item = &'a mut T;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let i = self.cursor.to_usize();
        if i >= self.capacity {
            return None;
        }

        // SAFETY: in bounds. A well-formed cycle visits each slot once within `len` steps, so
        // the returned references never alias.
        let node = unsafe { &mut *self.slots.add(i) };
        self.cursor = node.next;
        self.remaining -= 1;
        node.value_mut()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, I: RawIndex> FusedIterator for ValuesMut<'a, T, I> {}
impl<'a, T, I: RawIndex> ExactSizeIterator for ValuesMut<'a, T, I> {}
