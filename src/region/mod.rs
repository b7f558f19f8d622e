//! Region-level interaction factors.

pub mod interact;
pub mod registry;
