//! Session scheduling: slot catalog, RSVP tracking, and the planning flow

pub mod orchestrator;
pub mod rsvp;
pub mod slots;

pub use orchestrator::SessionPlanner;
pub use rsvp::{RsvpBoard, RsvpChoice, RsvpOutcome, RsvpSnapshot};
pub use slots::{SlotCatalog, attendance_keyboard};
