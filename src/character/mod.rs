//! Party member generation: attributes, equipment, traits, progression and derived stats.

#![allow(unused_imports)]

pub mod attributes;
pub mod bonus_spells;
pub mod builder;
pub mod derived_stats;
pub mod equipment;
pub mod progression;
pub mod skills;
pub mod spellcasting;
pub mod traits;

pub use attributes::*;
pub use builder::*;
pub use derived_stats::DerivedStats;
pub use progression::{Feature, FeatureSpec, Progression};
pub use skills::*;
pub use spellcasting::{Spell, SpellBook};
