//! Muster - group session scheduling and result tracking over chat
//!
//! Muster runs a Telegram bot for a small fixed roster spread across
//! time zones. It schedules group sessions (day grid, slot picker,
//! RSVP tallies rendered in each member's local time) and records
//! timed challenge attempts into a shared SQLite ledger.
//!
//! # Core Concepts
//!
//! - **One message, one surface**: each flow lives on a single editable
//!   message, re-rendered in place as state changes
//! - **State on the server**: callback payloads carry intents, never
//!   values; pending values and proposals live in flow state
//! - **Local time everywhere**: UTC inside, each member sees their own
//!   wall-clock times
//!
//! # Modules
//!
//! - [`chat`] - Chat API trait and Telegram implementation
//! - [`session`] - Planning flow with RSVP tracking
//! - [`attempt`] - Result entry slider and statistics
//! - [`ledger`] - Command-channel access to the attempt store
//! - [`dispatch`] - Update routing and access control
//! - [`config`] - Configuration types and loading

pub mod attempt;
pub mod chat;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod duration;
pub mod ledger;
pub mod localtime;
pub mod remark;
pub mod roster;
pub mod session;

// Re-export commonly used types
pub use attempt::{EntryFlow, StatsView};
pub use chat::{ChatApi, ChatError, TelegramApi};
pub use config::Config;
pub use dispatch::{AccessGate, Action, Admission, Router};
pub use ledger::{LedgerError, LedgerManager, LedgerResponse};
pub use roster::Roster;
pub use session::{RsvpBoard, RsvpChoice, SessionPlanner, SlotCatalog};
