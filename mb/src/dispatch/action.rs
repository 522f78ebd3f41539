//! Callback action codec
//!
//! Every inline button carries one of these encodings in its payload.
//! Encodings are compact and stable: messages outlive restarts, so old
//! payloads must keep parsing.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::session::rsvp::RsvpChoice;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("Unknown action: {0}")]
    Unknown(String),

    #[error("Invalid action payload: {0}")]
    InvalidPayload(String),
}

/// Decoded button tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Day picked on the planning calendar
    PickDay(NaiveDate),
    /// Return from the time picker to the day grid
    BackToDays,
    /// Tear down a planning message
    CancelPlan,
    /// Time slot picked, payload is the canonical UTC time
    PickSlot(NaiveTime),
    /// Attendance vote
    Rsvp(RsvpChoice),
    /// Slider nudge for result entry
    Adjust(i64),
    /// Persist the current slider value
    SaveAttempt,
    /// Tear down an entry message without saving
    CancelAttempt,
    /// Delete a saved attempt by ledger id
    DeleteRecord(i64),
    /// Delete a saved attempt and reopen the slider
    RedoEntry(i64),
    /// Expand the stats card into per-day history
    ShowDetails,
    /// Collapse the history back into the summary
    HideDetails,
    /// Inert button, acknowledged and nothing else
    Noop,
}

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Action::PickDay(date) => format!("day:{}", date.format("%Y-%m-%d")),
            Action::BackToDays => "day:back".to_string(),
            Action::CancelPlan => "plan:cancel".to_string(),
            Action::PickSlot(slot) => format!("slot:{}", slot.format("%H:%M")),
            Action::Rsvp(RsvpChoice::Attending) => "rsvp:yes".to_string(),
            Action::Rsvp(RsvpChoice::Declined) => "rsvp:no".to_string(),
            Action::Adjust(delta) => format!("adj:{}", delta),
            Action::SaveAttempt => "entry:save".to_string(),
            Action::CancelAttempt => "entry:cancel".to_string(),
            Action::DeleteRecord(id) => format!("rec:del:{}", id),
            Action::RedoEntry(id) => format!("rec:redo:{}", id),
            Action::ShowDetails => "stats:details".to_string(),
            Action::HideDetails => "stats:hide".to_string(),
            Action::Noop => "noop".to_string(),
        }
    }

    pub fn parse(data: &str) -> Result<Self, ActionParseError> {
        if data == "noop" {
            return Ok(Action::Noop);
        }
        let (family, rest) = data
            .split_once(':')
            .ok_or_else(|| ActionParseError::Unknown(data.to_string()))?;
        let invalid = || ActionParseError::InvalidPayload(data.to_string());

        match family {
            "day" => {
                if rest == "back" {
                    Ok(Action::BackToDays)
                } else {
                    NaiveDate::parse_from_str(rest, "%Y-%m-%d")
                        .map(Action::PickDay)
                        .map_err(|_| invalid())
                }
            }
            "plan" => match rest {
                "cancel" => Ok(Action::CancelPlan),
                _ => Err(ActionParseError::Unknown(data.to_string())),
            },
            "slot" => NaiveTime::parse_from_str(rest, "%H:%M")
                .map(Action::PickSlot)
                .map_err(|_| invalid()),
            "rsvp" => match rest {
                "yes" => Ok(Action::Rsvp(RsvpChoice::Attending)),
                "no" => Ok(Action::Rsvp(RsvpChoice::Declined)),
                _ => Err(ActionParseError::Unknown(data.to_string())),
            },
            "adj" => rest.parse::<i64>().map(Action::Adjust).map_err(|_| invalid()),
            "entry" => match rest {
                "save" => Ok(Action::SaveAttempt),
                "cancel" => Ok(Action::CancelAttempt),
                _ => Err(ActionParseError::Unknown(data.to_string())),
            },
            "rec" => {
                let (verb, id) = rest.split_once(':').ok_or_else(invalid)?;
                let id = id.parse::<i64>().map_err(|_| invalid())?;
                match verb {
                    "del" => Ok(Action::DeleteRecord(id)),
                    "redo" => Ok(Action::RedoEntry(id)),
                    _ => Err(ActionParseError::Unknown(data.to_string())),
                }
            }
            "stats" => match rest {
                "details" => Ok(Action::ShowDetails),
                "hide" => Ok(Action::HideDetails),
                _ => Err(ActionParseError::Unknown(data.to_string())),
            },
            _ => Err(ActionParseError::Unknown(data.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(action: Action) {
        let encoded = action.encode();
        assert_eq!(Action::parse(&encoded), Ok(action), "payload {}", encoded);
    }

    #[test]
    fn test_every_action_round_trips() {
        round_trip(Action::PickDay(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()));
        round_trip(Action::BackToDays);
        round_trip(Action::CancelPlan);
        round_trip(Action::PickSlot(NaiveTime::from_hms_opt(16, 30, 0).unwrap()));
        round_trip(Action::Rsvp(RsvpChoice::Attending));
        round_trip(Action::Rsvp(RsvpChoice::Declined));
        round_trip(Action::Adjust(5));
        round_trip(Action::Adjust(-10));
        round_trip(Action::SaveAttempt);
        round_trip(Action::CancelAttempt);
        round_trip(Action::DeleteRecord(42));
        round_trip(Action::RedoEntry(42));
        round_trip(Action::ShowDetails);
        round_trip(Action::HideDetails);
        round_trip(Action::Noop);
    }

    #[test]
    fn test_parse_known_payloads() {
        assert_eq!(Action::parse("rsvp:yes"), Ok(Action::Rsvp(RsvpChoice::Attending)));
        assert_eq!(Action::parse("adj:-5"), Ok(Action::Adjust(-5)));
        assert_eq!(Action::parse("rec:del:7"), Ok(Action::DeleteRecord(7)));
        assert_eq!(
            Action::parse("slot:16:30"),
            Ok(Action::PickSlot(NaiveTime::from_hms_opt(16, 30, 0).unwrap()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_family() {
        assert!(matches!(
            Action::parse("zzz:7"),
            Err(ActionParseError::Unknown(_))
        ));
        assert!(matches!(
            Action::parse("bare"),
            Err(ActionParseError::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(matches!(
            Action::parse("day:2025-13-99"),
            Err(ActionParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            Action::parse("adj:five"),
            Err(ActionParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            Action::parse("rec:del:"),
            Err(ActionParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            Action::parse("slot:25:99"),
            Err(ActionParseError::InvalidPayload(_))
        ));
        assert!(matches!(
            Action::parse("rsvp:maybe"),
            Err(ActionParseError::Unknown(_))
        ));
    }
}
