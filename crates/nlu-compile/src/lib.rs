#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! LR(0)-style state-table builder (spec.md §2 component 2, §4.1).
//!
//! Compiles an immutable [`nlu_core::Grammar`] into a [`nlu_core::StateTable`]:
//! a set of automaton states, each with an ordered list of reductions and
//! shifts. This crate owns the construction algorithm only -- the
//! resulting types live in `nlu-core` so `nlu-engine` can consume a
//! `StateTable` without depending on the builder.

mod build;
mod closure;
mod error;
mod item;
mod production;

#[cfg(test)]
mod build_tests;

pub use build::build_state_table;
pub use error::BuildError;
pub use production::{Production, ProductionId, Productions};
