/*!
Index width and typed index handles
*/

use std::{
    fmt::{self, Debug},
    hash::Hash,
    marker::PhantomData,
};

use derivative::Derivative;

/// Default index width. `u32` unless the `wide-index` feature is on.
#[cfg(not(feature = "wide-index"))]
pub type DefaultIndex = u32;

/// Default index width. `u32` unless the `wide-index` feature is on.
#[cfg(feature = "wide-index")]
pub type DefaultIndex = u64;

/// Integer type used for `next`/`prev` links and index handles.
///
/// The largest value is reserved as [`RawIndex::NULL`], so a vector indexed by `I` holds at
/// most [`RawIndex::MAX_CAPACITY`] slots.
pub trait RawIndex: Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord + 'static {
    /// Sentinel link value ("no slot")
    const NULL: Self;
    /// Maximum number of slots addressable with this width
    const MAX_CAPACITY: usize;

    /// Returns `None` if `raw` does not fit or collides with [`RawIndex::NULL`].
    fn from_usize(raw: usize) -> Option<Self>;
    fn to_usize(self) -> usize;

    fn is_null(self) -> bool {
        self == Self::NULL
    }
}

macro_rules! impl_raw_index {
    ($ty:ident) => {
        impl RawIndex for $ty {
            const NULL: Self = $ty::MAX;
            // `usize` may be narrower than the index type (`u64` on 32-bit targets)
            const MAX_CAPACITY: usize = if ($ty::MAX as u128) < (usize::MAX as u128) {
                $ty::MAX as usize
            } else {
                usize::MAX
            };

            fn from_usize(raw: usize) -> Option<Self> {
                if raw >= Self::MAX_CAPACITY {
                    return None;
                }
                Some(raw as $ty)
            }

            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };

    ($($ty:ident),+) => {
        $(
            impl_raw_index!($ty);
        )*
    };
}

impl_raw_index!(u16, u32, u64, usize);

/// Stable index handle to a node in an [`IndexedVector`](crate::IndexedVector).
///
/// It stays valid across growth. It becomes invalid once the node is erased, and the slot may
/// be handed out again by a later insertion.
///
/// # Memory use
/// ```
/// use std::mem;
/// use ivec_arena::NodeId;
/// assert_eq!(mem::size_of::<NodeId<(), u32>>(), mem::size_of::<u32>());
/// ```
#[derive(Derivative)]
#[derivative(
    Copy(bound = ""),
    Clone(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    Hash(bound = ""),
    PartialOrd(bound = ""),
    Ord(bound = "")
)]
#[repr(transparent)]
pub struct NodeId<T, I: RawIndex = DefaultIndex> {
    raw: I,
    /// Item type parameter
    _t: PhantomData<fn() -> T>,
}

impl<T, I: RawIndex> NodeId<T, I> {
    /// Wraps a raw slot index. Nothing is validated until the handle is used.
    pub fn from_raw(raw: I) -> Self {
        Self {
            raw,
            _t: PhantomData,
        }
    }

    pub fn raw(&self) -> I {
        self.raw
    }

    pub fn to_usize(&self) -> usize {
        self.raw.to_usize()
    }
}

impl<T, I: RawIndex> Debug for NodeId<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", self.raw)
    }
}

impl<T, I: RawIndex + fmt::Display> fmt::Display for NodeId<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_reserved() {
        assert_eq!(u16::from_usize(u16::MAX as usize), None);
        assert_eq!(u16::from_usize(u16::MAX as usize - 1), Some(u16::MAX - 1));
        assert!(u32::NULL.is_null());
        assert_eq!(<u16 as RawIndex>::MAX_CAPACITY, 65535);
    }

    #[test]
    fn handle_ordering_follows_raw_index() {
        let a = NodeId::<String, u32>::from_raw(1);
        let b = NodeId::<String, u32>::from_raw(7);
        assert!(a < b);
        assert_eq!(a, NodeId::from_raw(1));
        assert_eq!(format!("{:?}", b), "NodeId(7)");
    }
}
