//! Per-attribute state tracking for host entities.
//!
//! A host type owns one [`TextAttribute`] per declared text attribute, or a
//! [`TextAttributeSet`] holding all of them. Slots load lazily, remember
//! what they loaded, and track whether an assignment differs from the last
//! persisted value.
//!
//! Slots hold no locks. Mutating the same slot from several threads needs
//! external synchronization by the caller.

mod set;
mod slot;

pub use set::TextAttributeSet;
pub use slot::{SlotState, TextAttribute};
