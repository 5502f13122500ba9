//! aw-integration - Integration library for arc-wrap
//!
//! This crate is the boundary between the wrapper and the tool it fronts:
//! directory queries through the tool's conduit bridge, and the final
//! process hand-off.

pub mod conduit;
pub mod handoff;

pub use conduit::ConduitClient;
pub use handoff::Handoff;
