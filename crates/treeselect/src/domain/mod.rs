//! Domain types: tree paths, the tree capability, and selection errors.

pub mod errors;
pub mod model;
pub mod path;
pub mod tree;
