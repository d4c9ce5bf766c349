//! Run configuration, the generation loop and its report.

#![allow(unused_imports)]

pub mod config;
pub mod report;
pub mod runner;

pub use config::*;
pub use report::*;
pub use runner::*;
