/*!
Slot record stored in the arena
*/

use std::{
    fmt::{self, Debug},
    mem::MaybeUninit,
};

use crate::{DefaultIndex, RawIndex};

/// Lifecycle tag of a slot.
///
/// The all-zero bit pattern is [`SlotState::Unused`], so a freshly zeroed arena holds valid
/// unused slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlotState {
    /// Never issued since the last (re)allocation or reset
    Unused = 0,
    /// Recycled onto the free list
    Free = 1,
    /// On the active list
    Live = 2,
}

/// One fixed-size slot: links, tag and inline value.
///
/// `next`/`prev` thread the circular active list for live slots. Free slots use `next` only,
/// as the singly linked free list, terminated by [`RawIndex::NULL`].
#[repr(C)]
pub struct Node<T, I: RawIndex = DefaultIndex> {
    pub(crate) next: I,
    pub(crate) prev: I,
    pub(crate) state: SlotState,
    pub(crate) value: MaybeUninit<T>,
}

impl<T: Copy, I: RawIndex> Clone for Node<T, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, I: RawIndex> Copy for Node<T, I> {}

impl<T, I: RawIndex> Node<T, I> {
    pub(crate) fn live(value: T, next: I, prev: I) -> Self {
        Self {
            next,
            prev,
            state: SlotState::Live,
            value: MaybeUninit::new(value),
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == SlotState::Live
    }

    /// Next link. Only meaningful for live slots and free slots.
    pub fn next(&self) -> I {
        self.next
    }

    /// Previous link. Only meaningful for live slots.
    pub fn prev(&self) -> I {
        self.prev
    }

    /// The value if the slot is live.
    pub fn value(&self) -> Option<&T> {
        if self.is_live() {
            // SAFETY: live slots always hold an initialized value
            Some(unsafe { &*self.value.as_ptr() })
        } else {
            None
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        if self.is_live() {
            // SAFETY: live slots always hold an initialized value
            Some(unsafe { &mut *self.value.as_mut_ptr() })
        } else {
            None
        }
    }
}

impl<T: Debug, I: RawIndex> Debug for Node<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("state", &self.state)
            .field("next", &self.next)
            .field("prev", &self.prev)
            .field("value", &self.value())
            .finish()
    }
}
