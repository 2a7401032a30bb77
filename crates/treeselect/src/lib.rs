//! Range-based selection tracking for tree views.
//!
//! Selected nodes are kept as the minimal set of ranges that are contiguous in the tree's
//! top-to-bottom row order, together with an index from node to owning range.

pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

/// Install the tracing subscriber for binaries and tools.
pub fn init(verbosity: u8) {
    infra::logging::init(verbosity);
}
