//! An incremental solution engine for ***Vehicle Routing Problem***.
//!
//! The crate keeps a mutable multi-vehicle route representation as index-linked arrays, evaluates
//! candidate edits with a two-phase constraint and objective protocol (a cheap estimate while
//! scanning, an exact recomputation while propagating) and generates only the combinatorially
//! relevant insertion positions for every plan unit.
//!
//! A typical flow:
//! - build a [`Model`](models::Model): stops, vehicle types, vehicles, plan units, constraints
//!   and objectives;
//! - create a [`Solution`](solution::Solution) which locks the model and adds initial stops;
//! - repeatedly ask the solution for the best move of an unplanned plan unit and execute it.

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod config;
pub mod features;
pub mod models;
pub mod prelude;
pub mod solution;
pub mod utils;
