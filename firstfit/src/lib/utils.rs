pub use std::{
    io::{BufRead, BufReader},
    path::PathBuf,
    time::Instant,
};
pub use thiserror::Error;
pub use itertools::Itertools;
pub use rayon::prelude::*;
pub use indexmap::IndexMap;

pub use crate::{
    elements::*,
    algo::first_fit,
    io::*,
    report::*,
    session::Session,
};

/// The unit for measuring memory. `firstfit` does not care about
/// semantics (bytes, KB, pages...), as long as blocks and processes
/// are measured the same way.
pub type ByteSteps = usize;

/// Aggregates over many blocks may not fit in [ByteSteps] when the
/// inputs sit close to its maximum, so sums are carried in a wider type.
pub type Total = u128;
