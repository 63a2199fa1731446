/*!
[`IndexedVector`]: circular doubly linked list stored in one [`Arena`]
*/

use std::{
    fmt::{self, Debug},
    marker::PhantomData,
    mem, ops, slice,
};

use crate::{
    iter::{Direction, Iter, Values, ValuesMut},
    node::Node,
    Arena, Config, DefaultIndex, Error, GrowthPolicy, MemoryView, NodeId, RawIndex, Result,
    SlotState,
};

/// Circular doubly linked list with O(1) insertion and removal via stable index handles.
///
/// Every slot lives in a single zero-filled [`Arena`]. Erased slots are recycled through a free
/// list threaded through the same slot array. When neither a free slot nor a never-issued
/// slot is left, the arena is replaced by a larger one and the issued slots are copied over
/// byte for byte, so [`NodeId`]s survive growth.
///
/// Values are moved by plain byte copy, hence `T: Copy`.
pub struct IndexedVector<T: Copy, I: RawIndex = DefaultIndex> {
    /// `None` after [`IndexedVector::dispose`]
    arena: Option<Arena>,
    /// Number of slots in the arena
    capacity: usize,
    /// Slots `0..issued` are live or free. The rest are unused.
    issued: usize,
    /// Number of live slots
    len: usize,
    head: Option<I>,
    free_head: Option<I>,
    growth: GrowthPolicy,
    _t: PhantomData<T>,
}

impl<T: Copy, I: RawIndex> IndexedVector<T, I> {
    /// Creates an empty vector with room for `max(init_capacity, 4)` slots.
    pub fn new(init_capacity: usize) -> Result<Self> {
        Self::with_config(Config::with_capacity(init_capacity))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let mut vec = Self {
            arena: None,
            capacity: 0,
            issued: 0,
            len: 0,
            head: None,
            free_head: None,
            growth: config.growth,
            _t: PhantomData,
        };
        vec.reallocate(config.effective_capacity())?;
        Ok(vec)
    }

    /// Creates a vector holding `values` in iteration order.
    pub fn from_values<It: IntoIterator<Item = T>>(values: It) -> Result<Self> {
        let values = values.into_iter();
        let mut vec = Self::new(values.size_hint().0)?;
        for value in values {
            vec.push_back(value)?;
        }
        Ok(vec)
    }

    /// Number of live nodes
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the arena
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Anchor of the active list
    pub fn head(&self) -> Option<NodeId<T, I>> {
        self.head.map(NodeId::from_raw)
    }

    fn slots(&self) -> &[Node<T, I>] {
        match &self.arena {
            // SAFETY: the arena holds `capacity` slots, and all-zero bytes are a valid slot
            Some(arena) => unsafe {
                slice::from_raw_parts(arena.as_ptr() as *const Node<T, I>, self.capacity)
            },
            None => &[],
        }
    }

    fn slots_mut(&mut self) -> &mut [Node<T, I>] {
        let capacity = self.capacity;
        match &mut self.arena {
            // SAFETY: see `slots`
            Some(arena) => unsafe {
                slice::from_raw_parts_mut(arena.as_mut_ptr() as *mut Node<T, I>, capacity)
            },
            None => &mut [],
        }
    }
}

/// # ----- Validation -----
impl<T: Copy, I: RawIndex> IndexedVector<T, I> {
    /// Lifecycle state of the slot at `raw`.
    pub fn state(&self, raw: I) -> Result<SlotState> {
        let index = raw.to_usize();
        if index >= self.capacity {
            return Err(Error::OutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok(self.state_at(index))
    }

    /// Slots past `issued` count as unused whatever their tag says (see `erase_unchecked`).
    fn state_at(&self, index: usize) -> SlotState {
        if index >= self.issued {
            SlotState::Unused
        } else {
            self.slots()[index].state
        }
    }

    /// Returns the slot index if `raw` refers to a live slot.
    fn validate(&self, raw: I) -> Result<usize> {
        let index = raw.to_usize();
        match self.state(raw)? {
            SlotState::Live => Ok(index),
            state => Err(Error::InvalidReference { index, state }),
        }
    }

    pub fn contains(&self, node: NodeId<T, I>) -> bool {
        self.validate(node.raw()).is_ok()
    }

    /// Walks both lists and verifies the link invariants.
    pub fn check_integrity(&self) -> Result<()> {
        let corrupted = |msg: String| Err(Error::Corrupted(msg));

        if !(self.len <= self.issued && self.issued <= self.capacity) {
            return corrupted(format!(
                "len {} / issued {} / capacity {}",
                self.len, self.issued, self.capacity
            ));
        }

        let slots = self.slots();
        let mut visited = vec![false; self.issued];

        match self.head {
            None if self.len != 0 => return corrupted(format!("no head with len {}", self.len)),
            None => {}
            Some(head) => {
                let mut cursor = head.to_usize();
                for step in 0..self.len {
                    if cursor >= self.issued || slots[cursor].state != SlotState::Live {
                        return corrupted(format!("step {} reached non-live slot {}", step, cursor));
                    }
                    if visited[cursor] {
                        return corrupted(format!("slot {} visited twice", cursor));
                    }
                    visited[cursor] = true;

                    let next = slots[cursor].next.to_usize();
                    if next >= self.issued || slots[next].prev.to_usize() != cursor {
                        return corrupted(format!("broken prev link {} <- {}", cursor, next));
                    }
                    cursor = next;
                }
                if cursor != head.to_usize() {
                    return corrupted(format!("cycle does not return to head {:?}", head));
                }
            }
        }

        let n_live = slots[..self.issued].iter().filter(|n| n.is_live()).count();
        if n_live != self.len {
            return corrupted(format!("{} live tags for len {}", n_live, self.len));
        }

        let mut free = self.free_head;
        let mut n_free = 0;
        while let Some(raw) = free {
            let i = raw.to_usize();
            if i >= self.issued || slots[i].state != SlotState::Free || visited[i] {
                return corrupted(format!("bad free slot {}", i));
            }
            visited[i] = true;
            n_free += 1;
            let next = slots[i].next;
            free = if next.is_null() { None } else { Some(next) };
        }

        if self.len + n_free != self.issued {
            return corrupted(format!(
                "{} live + {} free != {} issued",
                self.len, n_free, self.issued
            ));
        }

        Ok(())
    }
}

/// # ----- Accessors -----
impl<T: Copy, I: RawIndex> IndexedVector<T, I> {
    /// Checked access by raw slot index.
    ///
    /// Fails with [`Error::OutOfRange`] if `raw >= capacity()` and with
    /// [`Error::InvalidReference`] if the slot is free or unused.
    pub fn at(&self, raw: I) -> Result<&T> {
        let index = self.validate(raw)?;
        // SAFETY: validated to be live
        Ok(unsafe { self.value_unchecked(index) })
    }

    pub fn at_mut(&mut self, raw: I) -> Result<&mut T> {
        let index = self.validate(raw)?;
        let node = &mut self.slots_mut()[index];
        // SAFETY: validated to be live
        Ok(unsafe { &mut *node.value.as_mut_ptr() })
    }

    pub fn get(&self, node: NodeId<T, I>) -> Option<&T> {
        self.at(node.raw()).ok()
    }

    pub fn get_mut(&mut self, node: NodeId<T, I>) -> Option<&mut T> {
        self.at_mut(node.raw()).ok()
    }

    /// Unchecked access by raw slot index.
    ///
    /// # Safety
    /// `raw` must refer to a live slot, e.g. the result of the last insertion.
    pub unsafe fn get_unchecked(&self, raw: I) -> &T {
        self.value_unchecked(raw.to_usize())
    }

    /// # Safety
    /// `raw` must refer to a live slot.
    pub unsafe fn get_unchecked_mut(&mut self, raw: I) -> &mut T {
        let node = self.slots_mut().get_unchecked_mut(raw.to_usize());
        &mut *node.value.as_mut_ptr()
    }

    unsafe fn value_unchecked(&self, index: usize) -> &T {
        &*self.slots().get_unchecked(index).value.as_ptr()
    }

    /// Node after `node` in the cycle
    pub fn next(&self, node: NodeId<T, I>) -> Result<NodeId<T, I>> {
        let index = self.validate(node.raw())?;
        Ok(NodeId::from_raw(self.slots()[index].next))
    }

    /// Node before `node` in the cycle
    pub fn prev(&self, node: NodeId<T, I>) -> Result<NodeId<T, I>> {
        let index = self.validate(node.raw())?;
        Ok(NodeId::from_raw(self.slots()[index].prev))
    }

    /// Recovers the handle of a value borrowed from this vector from its address.
    ///
    /// Returns `None` if the reference does not point into a slot of this vector.
    pub fn index_of(&self, value: &T) -> Option<NodeId<T, I>> {
        let slots = self.slots();
        let base = slots.as_ptr() as usize;
        let addr = value as *const T as usize;

        let slot_size = mem::size_of::<Node<T, I>>();
        let index = addr.checked_sub(base)? / slot_size;

        // reject addresses that are not the value field of a slot
        let node = slots.get(index)?;
        if node.value.as_ptr() as usize != addr {
            return None;
        }

        I::from_usize(index).map(NodeId::from_raw)
    }

    /// Issued slots (live and free) as a read-only window.
    pub fn as_view(&self) -> MemoryView<'_, Node<T, I>> {
        MemoryView::new(&self.slots()[..self.issued])
    }
}

/// # ----- Mutations -----
impl<T: Copy, I: RawIndex> IndexedVector<T, I> {
    /// Inserts `value` right before `base` and returns the handle of the new node.
    pub fn insert_before(&mut self, base: NodeId<T, I>, value: T) -> Result<NodeId<T, I>> {
        self.validate(base.raw())?;
        // SAFETY: validated to be live
        unsafe { self.insert_before_unchecked(base, value) }
    }

    /// Inserts `value` right before `base` without validating `base`.
    ///
    /// # Safety
    /// `base` must refer to a live slot. Otherwise the links are corrupted and later unchecked
    /// reads may touch uninitialized values.
    pub unsafe fn insert_before_unchecked(
        &mut self,
        base: NodeId<T, I>,
        value: T,
    ) -> Result<NodeId<T, I>> {
        // growth can happen here, but `base` is an index and stays valid
        let target = self.next_free_slot()?;

        let base = base.raw();
        let slots = self.slots_mut();
        let prev = slots[base.to_usize()].prev;
        slots[target.to_usize()] = Node::live(value, base, prev);
        slots[prev.to_usize()].next = target;
        slots[base.to_usize()].prev = target;
        self.len += 1;

        Ok(NodeId::from_raw(target))
    }

    /// Inserts `value` before the head, i.e. at the end of the cycle. The head is unchanged
    /// unless the vector was empty.
    pub fn push_back(&mut self, value: T) -> Result<NodeId<T, I>> {
        match self.head {
            // SAFETY: the head is always live
            Some(head) => unsafe { self.insert_before_unchecked(NodeId::from_raw(head), value) },
            None => self.insert_first(value),
        }
    }

    /// Inserts `value` before the head and makes it the new head.
    pub fn push_front(&mut self, value: T) -> Result<NodeId<T, I>> {
        let node = self.push_back(value)?;
        self.head = Some(node.raw());
        Ok(node)
    }

    /// Bulk copy-in: appends every value of the view.
    pub fn extend_from_view(&mut self, view: MemoryView<'_, T>) -> Result<()> {
        self.reserve(view.len())?;
        for value in view {
            self.push_back(*value)?;
        }
        Ok(())
    }

    /// Single node linked to itself
    fn insert_first(&mut self, value: T) -> Result<NodeId<T, I>> {
        debug_assert!(self.head.is_none() && self.len == 0);
        let target = self.next_free_slot()?;
        self.slots_mut()[target.to_usize()] = Node::live(value, target, target);
        self.head = Some(target);
        self.len = 1;
        Ok(NodeId::from_raw(target))
    }

    /// Unlinks `node` and returns its value.
    pub fn erase(&mut self, node: NodeId<T, I>) -> Result<T> {
        self.validate(node.raw())?;
        // SAFETY: validated to be live
        Ok(unsafe { self.erase_unchecked(node) })
    }

    /// Unlinks `node` without validating it.
    ///
    /// # Safety
    /// `node` must refer to a live slot.
    pub unsafe fn erase_unchecked(&mut self, node: NodeId<T, I>) -> T {
        let raw = node.raw();
        let index = raw.to_usize();
        let free_head = self.free_head;

        let slots = self.slots_mut();
        let Node {
            next, prev, value, ..
        } = slots[index];
        slots[prev.to_usize()].next = next;
        slots[next.to_usize()].prev = prev;

        let slot = &mut slots[index];
        slot.state = SlotState::Free;
        slot.next = free_head.unwrap_or(I::NULL);
        slot.prev = I::NULL;

        if self.head == Some(raw) {
            self.head = Some(next);
        }
        self.len -= 1;

        if self.len == 0 {
            // every slot is free again: forget the free list and restart issuing from slot 0
            self.head = None;
            self.free_head = None;
            self.issued = 0;
        } else {
            self.free_head = Some(raw);
        }

        value.assume_init()
    }

    /// Removes all the nodes. Capacity is kept.
    pub fn clear(&mut self) {
        let issued_bytes = self.issued * mem::size_of::<Node<T, I>>();
        if let Some(arena) = &mut self.arena {
            // the issued prefix is always inside the arena
            let zeroed = arena.zero_fill(0, issued_bytes);
            debug_assert!(zeroed.is_ok());
        }
        self.head = None;
        self.free_head = None;
        self.issued = 0;
        self.len = 0;
    }

    /// Makes sure `additional` more insertions can't trigger growth.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self.issued.saturating_add(additional);
        if required <= self.capacity {
            return Ok(());
        }
        if required > I::MAX_CAPACITY {
            return Err(Error::CapacityOverflow {
                requested: required,
                max: I::MAX_CAPACITY,
            });
        }

        // rounded up by the policy, then clamped to stay addressable like `grow`
        let new_cap = self
            .growth
            .capacity_for(required)
            .unwrap_or(I::MAX_CAPACITY)
            .max(self.capacity.saturating_mul(2))
            .min(I::MAX_CAPACITY);
        self.reallocate(new_cap)
    }

    /// Releases the arena now. Capacity drops to zero and repeated calls do nothing.
    ///
    /// The vector stays usable: the next insertion allocates again.
    pub fn dispose(&mut self) {
        if let Some(arena) = self.arena.take() {
            log::debug!(
                "disposing vector: {} slots, {} bytes",
                self.capacity,
                arena.len()
            );
        }
        self.capacity = 0;
        self.issued = 0;
        self.len = 0;
        self.head = None;
        self.free_head = None;
    }

    fn next_free_slot(&mut self) -> Result<I> {
        if let Some(slot) = self.free_head {
            let next = self.slots()[slot.to_usize()].next;
            self.free_head = if next.is_null() { None } else { Some(next) };
            return Ok(slot);
        }

        if self.issued == self.capacity {
            self.grow()?;
        }

        debug_assert!(self.issued < self.capacity);
        let slot = I::from_usize(self.issued).ok_or(Error::CapacityOverflow {
            requested: self.issued + 1,
            max: I::MAX_CAPACITY,
        })?;
        self.issued += 1;
        Ok(slot)
    }

    /// NOTE: After growing, issued < capacity.
    fn grow(&mut self) -> Result<()> {
        let overflow = Error::CapacityOverflow {
            requested: self.capacity.saturating_add(1),
            max: I::MAX_CAPACITY,
        };

        if self.capacity >= I::MAX_CAPACITY {
            return Err(overflow);
        }

        // the last step may fall short of doubling to stay addressable
        let new_cap = self.growth.grown(self.capacity).ok_or(overflow)?;
        self.reallocate(new_cap.min(I::MAX_CAPACITY))
    }

    /// Moves the issued slots to a fresh arena of `new_cap` slots.
    fn reallocate(&mut self, new_cap: usize) -> Result<()> {
        debug_assert!(new_cap > self.capacity);
        if new_cap > I::MAX_CAPACITY {
            return Err(Error::CapacityOverflow {
                requested: new_cap,
                max: I::MAX_CAPACITY,
            });
        }

        let mut arena = Arena::allocate_array::<Node<T, I>>(new_cap)?;
        if let Some(old) = &self.arena {
            let issued_bytes = self.issued * mem::size_of::<Node<T, I>>();
            Arena::bulk_copy(old, &mut arena, issued_bytes)?;
        }

        log::debug!(
            "growing vector: {} -> {} slots ({} issued, {} live)",
            self.capacity,
            new_cap,
            self.issued,
            self.len
        );

        // the old arena is released only now, after the copy
        self.arena = Some(arena);
        self.capacity = new_cap;
        Ok(())
    }
}

/// # ----- Iterators -----
impl<T: Copy, I: RawIndex> IndexedVector<T, I> {
    /// `(NodeId, &T)` from the head along `next`
    pub fn iter(&self) -> Iter<T, I> {
        self.walk(self.head, Direction::Next)
    }

    /// `(NodeId, &T)` from the node before the head along `prev`
    pub fn iter_rev(&self) -> Iter<T, I> {
        let tail = self.head.map(|head| self.slots()[head.to_usize()].prev);
        self.walk(tail, Direction::Prev)
    }

    /// `&T` in cycle order
    pub fn values(&self) -> Values<T, I> {
        Values { iter: self.iter() }
    }

    /// `&mut T` in cycle order
    pub fn values_mut(&mut self) -> ValuesMut<T, I> {
        let remaining = self.len;
        let cursor = self.head.unwrap_or(I::NULL);
        let capacity = self.capacity;
        ValuesMut {
            slots: self.slots_mut().as_mut_ptr(),
            capacity,
            cursor,
            remaining,
            _marker: PhantomData,
        }
    }

    fn walk(&self, start: Option<I>, dir: Direction) -> Iter<T, I> {
        Iter {
            slots: self.slots(),
            cursor: start.unwrap_or(I::NULL),
            remaining: if start.is_some() { self.len } else { 0 },
            dir,
        }
    }
}

impl<T: Copy, I: RawIndex> IndexedVector<T, I> {
    /// Fallible clone. The copy keeps every index.
    pub fn try_clone(&self) -> Result<Self> {
        let arena = match &self.arena {
            Some(old) => {
                let mut arena = Arena::allocate(old.layout())?;
                let issued_bytes = self.issued * mem::size_of::<Node<T, I>>();
                Arena::bulk_copy(old, &mut arena, issued_bytes)?;
                Some(arena)
            }
            None => None,
        };

        Ok(Self {
            arena,
            capacity: self.capacity,
            issued: self.issued,
            len: self.len,
            head: self.head,
            free_head: self.free_head,
            growth: self.growth,
            _t: PhantomData,
        })
    }
}

impl<T: Copy, I: RawIndex> Clone for IndexedVector<T, I> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(vec) => vec,
            Err(_) => {
                let layout = self
                    .arena
                    .as_ref()
                    .map(Arena::layout)
                    .unwrap_or_else(std::alloc::Layout::new::<Node<T, I>>);
                std::alloc::handle_alloc_error(layout)
            }
        }
    }
}

impl<T: Copy + Debug, I: RawIndex> Debug for IndexedVector<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

/// Same values in the same cycle order. Indices and capacity are not compared.
impl<T: Copy + PartialEq, I: RawIndex> PartialEq for IndexedVector<T, I> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.values().eq(other.values())
    }
}

impl<T: Copy + Eq, I: RawIndex> Eq for IndexedVector<T, I> {}

impl<T: Copy, I: RawIndex> ops::Index<NodeId<T, I>> for IndexedVector<T, I> {
    type Output = T;
    fn index(&self, node: NodeId<T, I>) -> &Self::Output {
        self.at(node.raw()).unwrap_or_else(|err| panic!("{}", err))
    }
}

impl<T: Copy, I: RawIndex> ops::IndexMut<NodeId<T, I>> for IndexedVector<T, I> {
    fn index_mut(&mut self, node: NodeId<T, I>) -> &mut Self::Output {
        self.at_mut(node.raw()).unwrap_or_else(|err| panic!("{}", err))
    }
}

impl<'a, T: Copy, I: RawIndex> IntoIterator for &'a IndexedVector<T, I> {
    type IntoIter = Iter<'a, T, I>;
    type Item = <Self::IntoIter as Iterator>::Item;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Creates an [`IndexedVector`] holding the given values in order, wrapped in a [`Result`].
///
/// # Example
/// ```
/// use ivec_arena::{ivec, IndexedVector};
/// let xs: IndexedVector<usize> = ivec![0, 1, 2, 3, 4].unwrap();
/// assert_eq!(xs.len(), 5);
/// ```
#[macro_export]
macro_rules! ivec {
    ($($value:expr),* $(,)?) => {{
        $crate::IndexedVector::from_values(::std::vec![$($value),*])
    }};
}
