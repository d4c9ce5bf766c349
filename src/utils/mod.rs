//! Utility modules: batch persistence.

#![allow(unused_imports)]

pub mod persistence;

pub use persistence::*;
