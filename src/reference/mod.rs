//! Reference data: rule tables for races, classes, spells, equipment and monsters.

pub mod repository;
pub mod types;

pub use repository::ReferenceData;
pub use types::*;
