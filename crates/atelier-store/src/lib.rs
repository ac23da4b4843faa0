// Local persistence layer - a string-keyed slot store
// One key, one JSON blob. That's the whole contract.

pub mod slot;

pub use slot::{FileSlotStore, MemorySlotStore, SlotError, SlotStore};
