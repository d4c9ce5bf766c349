//! Monster stat blocks, XP budgets and the monster-group search.

#![allow(unused_imports)]

pub mod selector;
pub mod thresholds;
pub mod types;

pub use selector::*;
pub use thresholds::*;
pub use types::*;
