/*!
Example code and documentation

# Basic usage

[`IndexedVector<T>`] is a circular list. Insertion returns a [`NodeId`]:

```
use ivec_arena::{IndexedVector, NodeId};

let mut xs = IndexedVector::<char>::new(4)?;

let a: NodeId<char> = xs.push_back('a')?;
let c = xs.push_back('c')?;

// O(1) insertion before any node:
let b = xs.insert_before(c, 'b')?;
assert_eq!(xs.values().collect::<String>(), "abc");

// Checked and indexed access:
assert_eq!(xs.at(b.raw())?, &'b');
assert_eq!(xs[a], 'a');

// The list is circular:
assert_eq!(xs.next(c)?, a);
assert_eq!(xs.prev(a)?, c);
# Ok::<(), ivec_arena::Error>(())
```

# Erased handles

Once a node is erased, its handle is rejected until the slot is handed out again:

```
use ivec_arena::{Error, IndexedVector, SlotState};

let mut xs = IndexedVector::<u32>::new(4)?;
let x = xs.push_back(10)?;
let _y = xs.push_back(20)?;

assert_eq!(xs.erase(x)?, 10);
assert_eq!(
    xs.at(x.raw()),
    Err(Error::InvalidReference { index: 0, state: SlotState::Free })
);

// the next insertion recycles the erased slot
let z = xs.push_back(30)?;
assert_eq!(z, x);
# Ok::<(), ivec_arena::Error>(())
```

# Growth keeps handles

Handles are indices, not addresses, so they survive reallocation of the arena:

```
use ivec_arena::IndexedVector;

let mut xs = IndexedVector::<u64>::new(4)?;
let ids = (0..4).map(|i| xs.push_back(i)).collect::<Result<Vec<_>, _>>()?;
assert_eq!(xs.capacity(), 4);

xs.push_back(4)?;
assert_eq!(xs.capacity(), 8);
for (i, id) in ids.iter().enumerate() {
    assert_eq!(xs[*id], i as u64);
}
# Ok::<(), ivec_arena::Error>(())
```

References, on the other hand, can't outlive a mutation, and the borrow checker enforces it.
[`IndexedVector::index_of`] turns a borrowed value back into its handle.

# Index width

The second type parameter picks the integer type of links and handles. `u16` halves the slot
overhead of the default `u32`, but caps the vector at `u16::MAX` nodes. The largest `u16` is
reserved as the null link, so slot indices run from `0` to `u16::MAX - 1`:

```
use std::mem;
use ivec_arena::{IndexedVector, Node};

let mut xs = IndexedVector::<u8, u16>::new(16)?;
assert_eq!(mem::size_of::<Node<u8, u16>>(), 6);

xs.reserve(u16::MAX as usize)?;
assert_eq!(xs.capacity(), u16::MAX as usize);
assert!(xs.reserve(u16::MAX as usize + 1).is_err());
# Ok::<(), ivec_arena::Error>(())
```
*/

// for linking types in the docstring:
#[allow(unused)]
use super::*;
