//! Application layer: tree walks, selection ranges, the selection manager, and script replay.

pub mod events;
pub mod range;
pub mod replay;
pub mod selection;
pub mod walk;
