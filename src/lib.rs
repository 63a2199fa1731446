//! Arena-backed circular doubly linked list, [`IndexedVector`], with stable index handles.
//!
//! Nodes live in fixed-size slots of one contiguous [`Arena`]. Insertion before any node and
//! removal of any node are O(1); erased slots are recycled through a free list. External code
//! holds [`NodeId`]s (integer slot indices), which stay valid when the arena grows and moves.
//!
//! # Similar crates
//! * [slab](https://docs.rs/slab/latest)
//! * [indexlist](https://docs.rs/indexlist/latest)
//!
//! See [`example`] for usage.

pub mod arena;
pub mod config;
pub mod error;
pub mod example;
pub mod growth;
pub mod index;
pub mod iter;
pub mod node;
pub mod vector;
pub mod view;


pub use crate::{
    arena::Arena,
    config::Config,
    error::{Error, Result},
    growth::GrowthPolicy,
    index::{DefaultIndex, NodeId, RawIndex},
    node::{Node, SlotState},
    vector::IndexedVector,
    view::MemoryView,
};
