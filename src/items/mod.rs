//! Equipment variants and loadouts.

pub mod types;

pub use types::*;
