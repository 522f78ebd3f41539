//! Day and time keyboards for session planning

use chrono::{Duration, NaiveDate, NaiveTime};
use eyre::Result;

use crate::chat::types::{Button, Keyboard};
use crate::config::SessionConfig;
use crate::dispatch::action::Action;
use crate::localtime;
use crate::session::rsvp::RsvpChoice;

const BTN_BACK_TO_DATES: &str = "⬅️ Back to dates";
const BTN_IM_IN: &str = "🙋‍♂️ I'm in";
const BTN_NOT_GOING: &str = "🏃‍♂️ Not going";
const BTN_DELETE: &str = "❌ Delete";
const BTN_CANCEL: &str = "❌ Cancel";

const DAYS_PER_ROW: usize = 3;
const SLOTS_PER_ROW: usize = 2;

/// Configured candidate start times and how far ahead to offer them
pub struct SlotCatalog {
    slots_utc: Vec<NaiveTime>,
    horizon_days: u32,
}

impl SlotCatalog {
    pub fn new(slots_utc: Vec<NaiveTime>, horizon_days: u32) -> Self {
        Self { slots_utc, horizon_days }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let slots_utc = config
            .slots_utc
            .iter()
            .map(|slot| {
                NaiveTime::parse_from_str(slot, "%H:%M")
                    .map_err(|_| eyre::eyre!("Invalid slot time (expected HH:MM): {}", slot))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(slots_utc, config.horizon_days))
    }

    /// Upcoming days starting at the given local today
    ///
    /// Regenerated on every render so the window tracks the calendar.
    pub fn day_window(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..i64::from(self.horizon_days))
            .map(|i| today + Duration::days(i))
            .collect()
    }

    /// Day grid with a cancel row underneath
    pub fn day_keyboard(&self, today: NaiveDate) -> Keyboard {
        let mut keyboard = Keyboard::new();
        for chunk in self.day_window(today).chunks(DAYS_PER_ROW) {
            let row = chunk
                .iter()
                .map(|day| Button::new(day_label(*day), Action::PickDay(*day).encode()))
                .collect();
            keyboard = keyboard.row(row);
        }
        keyboard.row(vec![Button::new(BTN_CANCEL, Action::CancelPlan.encode())])
    }

    /// Slot grid for one day, labeled in the viewer's local time
    ///
    /// Labels are localized but payloads stay canonical UTC, so two
    /// people in different zones tapping the same button mean the
    /// same instant.
    pub fn time_keyboard(&self, date: NaiveDate, offset_hours: f64) -> Keyboard {
        let mut keyboard = Keyboard::new();
        for chunk in self.slots_utc.chunks(SLOTS_PER_ROW) {
            let row = chunk
                .iter()
                .map(|slot| {
                    Button::new(slot_label(date, *slot, offset_hours), Action::PickSlot(*slot).encode())
                })
                .collect();
            keyboard = keyboard.row(row);
        }
        keyboard.row(vec![Button::new(BTN_BACK_TO_DATES, Action::BackToDays.encode())])
    }

    /// Localized labels for one day's slots, in catalog order
    pub fn slot_labels(&self, date: NaiveDate, offset_hours: f64) -> Vec<String> {
        self.slots_utc
            .iter()
            .map(|slot| slot_label(date, *slot, offset_hours))
            .collect()
    }
}

/// Vote buttons shown under a session proposal
pub fn attendance_keyboard() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Button::new(BTN_IM_IN, Action::Rsvp(RsvpChoice::Attending).encode()),
            Button::new(BTN_NOT_GOING, Action::Rsvp(RsvpChoice::Declined).encode()),
        ])
        .row(vec![Button::new(BTN_DELETE, Action::CancelPlan.encode())])
}

fn day_label(day: NaiveDate) -> String {
    day.format("%a %d.%m").to_string()
}

fn slot_label(date: NaiveDate, slot: NaiveTime, offset_hours: f64) -> String {
    let base = date.and_time(slot).and_utc();
    localtime::shift(base, offset_hours).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SlotCatalog {
        SlotCatalog::from_config(&SessionConfig::default()).unwrap()
    }

    fn monday() -> NaiveDate {
        // 2025-10-20 is a Monday
        NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
    }

    #[test]
    fn test_from_config_rejects_bad_slot() {
        let config = SessionConfig {
            slots_utc: vec!["noon".to_string()],
            ..SessionConfig::default()
        };
        assert!(SlotCatalog::from_config(&config).is_err());
    }

    #[test]
    fn test_day_window_starts_today() {
        let days = catalog().day_window(monday());
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], monday());
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2025, 10, 26).unwrap());
    }

    #[test]
    fn test_day_keyboard_layout() {
        let keyboard = catalog().day_keyboard(monday());
        // 7 days in rows of 3, then the cancel row
        assert_eq!(keyboard.rows.len(), 4);
        assert_eq!(keyboard.rows[0].len(), 3);
        assert_eq!(keyboard.rows[1].len(), 3);
        assert_eq!(keyboard.rows[2].len(), 1);
        assert_eq!(keyboard.rows[3][0].text, BTN_CANCEL);
        assert_eq!(keyboard.rows[3][0].callback_data, "plan:cancel");
    }

    #[test]
    fn test_day_buttons_carry_dates() {
        let keyboard = catalog().day_keyboard(monday());
        let first = &keyboard.rows[0][0];
        assert_eq!(first.text, "Mon 20.10");
        assert_eq!(first.callback_data, "day:2025-10-20");
    }

    #[test]
    fn test_time_keyboard_localizes_labels_only() {
        let keyboard = catalog().time_keyboard(monday(), 3.0);
        // 5 slots in rows of 2, then the back row
        assert_eq!(keyboard.rows.len(), 4);
        let first = &keyboard.rows[0][0];
        assert_eq!(first.text, "19:00");
        assert_eq!(first.callback_data, "slot:16:00");
        assert_eq!(keyboard.rows[3][0].text, BTN_BACK_TO_DATES);
    }

    #[test]
    fn test_time_keyboard_fractional_offset() {
        let labels = catalog().slot_labels(monday(), 5.5);
        assert_eq!(labels[0], "21:30");
        assert_eq!(labels[4], "23:30");
    }

    #[test]
    fn test_time_keyboard_negative_offset() {
        let labels = catalog().slot_labels(monday(), -5.0);
        assert_eq!(labels, vec!["11:00", "11:30", "12:00", "12:30", "13:00"]);
    }

    #[test]
    fn test_attendance_keyboard_payloads() {
        let keyboard = attendance_keyboard();
        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.rows[0][0].callback_data, "rsvp:yes");
        assert_eq!(keyboard.rows[0][1].callback_data, "rsvp:no");
        assert_eq!(keyboard.rows[1][0].callback_data, "plan:cancel");
    }
}
