//! Encounter Forge - procedural combat encounter generator
//!
//! Builds parties and monster groups from rule tables, predicts the outcome of each
//! encounter and exports the labeled records.

pub mod build_info;
pub mod character;
pub mod combat;
pub mod core;
pub mod encounter;
pub mod generator;
pub mod items;
pub mod monsters;
pub mod reference;
pub mod utils;
pub mod validation;
