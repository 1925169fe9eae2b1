//! Welcome to `firstfit`!
//!
//! A workbench for the classic *first-fit* partition allocation policy:
//! a fixed row of memory blocks receives a sequence of process requests,
//! and each request lands in the first block that still has room for it.
//! What is left over is reported as fragmentation.

pub mod elements;
pub mod algo;
pub mod io;
pub mod report;
pub mod session;

/// Imports, type aliases, traits ... in general
/// useful stuff that shall be needed in many places.
pub mod utils;

pub use crate::utils::*;
