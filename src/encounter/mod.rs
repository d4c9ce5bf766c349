//! Encounter records and the per-encounter generation pipeline.

#![allow(unused_imports)]

pub mod pipeline;
pub mod types;

pub use pipeline::*;
pub use types::*;
