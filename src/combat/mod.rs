//! Combat power estimation and outcome resolution.

#![allow(unused_imports)]

pub mod combatant;
pub mod math;
pub mod outcome;
pub mod power;

#[cfg(test)]
pub(crate) mod test_support;

pub use combatant::*;
pub use math::*;
pub use outcome::*;
pub use power::*;
