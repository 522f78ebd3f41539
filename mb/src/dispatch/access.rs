//! Roster-based access gate
//!
//! Every inbound command and button tap passes through here first.
//! Identity is the Telegram username, so accounts without one are
//! turned away before the roster check.

use tracing::warn;

use crate::chat::types::User;
use crate::roster::Roster;

pub const DENIED_NO_USERNAME: &str = "🚫 Access denied. Please set a username in Telegram.";
pub const DENIED_NOT_LISTED: &str = "🚫 Access denied. You are not on the guest list.";

/// Admission decision for an inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Allowed in; carries the normalized roster handle
    Granted(String),
    /// Turned away; carries the text to show the user
    Denied(&'static str),
}

pub struct AccessGate {
    roster: Roster,
}

impl AccessGate {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn admit(&self, user: &User) -> Admission {
        let Some(username) = user.username.as_deref().filter(|u| !u.is_empty()) else {
            warn!(user_id = user.id, "admit: user has no username");
            return Admission::Denied(DENIED_NO_USERNAME);
        };
        let handle = username.to_lowercase();
        if !self.roster.contains(&handle) {
            warn!(%handle, "admit: handle not on roster");
            return Admission::Denied(DENIED_NOT_LISTED);
        }
        Admission::Granted(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn gate() -> AccessGate {
        let mut offsets = BTreeMap::new();
        offsets.insert("alice".to_string(), 3.0);
        offsets.insert("bob".to_string(), -5.0);
        AccessGate::new(Roster::new(offsets))
    }

    fn user(id: i64, username: Option<&str>) -> User {
        User {
            id,
            first_name: "Test".to_string(),
            username: username.map(String::from),
        }
    }

    #[test]
    fn test_admits_roster_member() {
        assert_eq!(
            gate().admit(&user(1, Some("alice"))),
            Admission::Granted("alice".to_string())
        );
    }

    #[test]
    fn test_admission_normalizes_case() {
        assert_eq!(
            gate().admit(&user(1, Some("ALICE"))),
            Admission::Granted("alice".to_string())
        );
    }

    #[test]
    fn test_denies_missing_username() {
        assert_eq!(
            gate().admit(&user(2, None)),
            Admission::Denied(DENIED_NO_USERNAME)
        );
        assert_eq!(
            gate().admit(&user(2, Some(""))),
            Admission::Denied(DENIED_NO_USERNAME)
        );
    }

    #[test]
    fn test_denies_stranger() {
        assert_eq!(
            gate().admit(&user(3, Some("mallory"))),
            Admission::Denied(DENIED_NOT_LISTED)
        );
    }
}
