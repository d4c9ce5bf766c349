//! Encounter validation and dataset statistics.

#![allow(unused_imports)]

pub mod statistics;
pub mod validator;

pub use statistics::*;
pub use validator::*;
