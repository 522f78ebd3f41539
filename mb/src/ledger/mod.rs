//! Command-channel access to the attempt store

pub mod manager;
pub mod messages;

pub use manager::LedgerManager;
pub use messages::{LedgerCommand, LedgerError, LedgerResponse};
