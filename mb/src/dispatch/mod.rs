//! Update intake: access control, callback payloads, and routing

pub mod access;
pub mod action;
pub mod router;

pub use access::{AccessGate, Admission};
pub use action::{Action, ActionParseError};
pub use router::Router;
