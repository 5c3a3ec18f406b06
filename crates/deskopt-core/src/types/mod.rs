//! Domain records shared by the engine crates.
//!
//! These mirror the persistence schema (profiles, item categories, ergonomic
//! rules, detected items) but carry no storage concerns: the engine receives
//! them by value and never mutates them.

mod catalog;
mod detection;
mod profile;

pub use catalog::*;
pub use detection::*;
pub use profile::*;
