//! Error handling for the text cache
//!
//! Every failure carries a recovery hint so hosts can decide whether to retry,
//! clear stored data or fix their own wiring.

mod conversions;
mod recovery;
mod types;

pub use types::*;
