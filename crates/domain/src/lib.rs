//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod gate;
mod role;

pub use access::{AccessLists, ActiveSelection, CatalogEntry, CatalogKind};
pub use gate::{AccessGate, GateDecision, GateState, Portal, Route};
pub use role::{Profile, Role};
