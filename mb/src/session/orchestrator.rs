//! Session planning flow
//!
//! Walks a chat from day selection through time selection to RSVP
//! collection, all on one editable message. The structured proposal
//! (date, slot, rendered header) lives in flow state, never re-parsed
//! from message text, so re-renders are cheap and lossless.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::chat::types::{CallbackQuery, SurfaceKey};
use crate::chat::{ChatApi, escape_markdown};
use crate::localtime;
use crate::remark::RemarkPicker;
use crate::roster::Roster;
use crate::session::rsvp::{RsvpBoard, RsvpChoice, RsvpOutcome, RsvpSnapshot};
use crate::session::slots::{SlotCatalog, attendance_keyboard};

const PLANNING_TITLE: &str = "📅 **Planning a session**\nChoose a day:";
const ALREADY_ATTENDING: &str = "You are already on the list! 😉";
const ALREADY_DECLINED: &str = "You have already marked that you won't come.";
const PLANNING_CANCELLED: &str = "Planning cancelled";
const MESSAGE_GONE: &str = "Message deleted or hidden";
const EMPTY_LIST: &str = "...";

/// Where one planning surface sits in the flow
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlanState {
    SelectingDay,
    SelectingTime { date: NaiveDate },
    /// Proposal posted; header is the rendered summary above the votes
    AwaitingRsvp { header: String },
}

struct PlannerInner {
    flows: HashMap<SurfaceKey, PlanState>,
    rsvps: RsvpBoard,
    remarks: RemarkPicker,
}

/// Drives session planning surfaces
pub struct SessionPlanner {
    chat: Arc<dyn ChatApi>,
    roster: Roster,
    catalog: SlotCatalog,
    min_participants: u32,
    celebration: Vec<String>,
    inner: Mutex<PlannerInner>,
}

impl SessionPlanner {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        roster: Roster,
        catalog: SlotCatalog,
        min_participants: u32,
        celebration: Vec<String>,
        remarks: RemarkPicker,
    ) -> Self {
        Self {
            chat,
            roster,
            catalog,
            min_participants,
            celebration,
            inner: Mutex::new(PlannerInner {
                flows: HashMap::new(),
                rsvps: RsvpBoard::new(),
                remarks,
            }),
        }
    }

    /// /plan entry: post a fresh day grid
    pub async fn start(&self, chat_id: i64, handle: &str) -> Result<()> {
        let today = localtime::local_today(self.roster.offset(handle));
        let keyboard = self.catalog.day_keyboard(today);
        let message = self
            .chat
            .send_message(chat_id, PLANNING_TITLE, Some(&keyboard))
            .await?;
        let mut inner = self.inner.lock().await;
        inner.flows.insert(message.surface_key(), PlanState::SelectingDay);
        info!(chat_id, message_id = message.message_id, "start: planning surface opened");
        Ok(())
    }

    /// Day tapped: move to the time picker, localized for the tapper
    pub async fn pick_day(
        &self,
        callback: &CallbackQuery,
        key: SurfaceKey,
        date: NaiveDate,
        handle: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.flows.get(&key) {
            Some(PlanState::SelectingDay) | Some(PlanState::SelectingTime { .. }) => {}
            _ => {
                debug!(?key, "pick_day: no live planning flow for surface");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
        }
        inner.flows.insert(key, PlanState::SelectingTime { date });

        let title = format!("📅 **{}**\nChoose time:", date.format("%d.%m"));
        let keyboard = self.catalog.time_keyboard(date, self.roster.offset(handle));
        self.chat
            .edit_message_text(key.chat_id, key.message_id, &title, Some(&keyboard))
            .await?;
        self.chat.answer_callback(&callback.id, None, false).await?;
        Ok(())
    }

    /// Back tapped on the time picker: re-render the day grid
    pub async fn back_to_days(
        &self,
        callback: &CallbackQuery,
        key: SurfaceKey,
        handle: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.flows.get(&key) {
            Some(PlanState::SelectingDay) | Some(PlanState::SelectingTime { .. }) => {}
            _ => {
                debug!(?key, "back_to_days: no live planning flow for surface");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
        }
        inner.flows.insert(key, PlanState::SelectingDay);

        let today = localtime::local_today(self.roster.offset(handle));
        let keyboard = self.catalog.day_keyboard(today);
        self.chat
            .edit_message_text(key.chat_id, key.message_id, PLANNING_TITLE, Some(&keyboard))
            .await?;
        self.chat.answer_callback(&callback.id, None, false).await?;
        Ok(())
    }

    /// Slot tapped: build the proposal header and open voting
    pub async fn pick_slot(
        &self,
        callback: &CallbackQuery,
        key: SurfaceKey,
        slot: NaiveTime,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let date = match inner.flows.get(&key) {
            Some(PlanState::SelectingTime { date }) => *date,
            _ => {
                debug!(?key, "pick_slot: surface is not picking a time");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
        };

        let header = self.proposal_header(date, slot);
        inner.flows.insert(key, PlanState::AwaitingRsvp { header: header.clone() });

        let snapshot = inner.rsvps.snapshot(key);
        let text = self.render(&header, &snapshot, &mut inner.remarks);
        self.chat
            .edit_message_text(key.chat_id, key.message_id, &text, Some(&attendance_keyboard()))
            .await?;
        self.chat.answer_callback(&callback.id, None, false).await?;
        info!(?key, date = %date, slot = %slot, "pick_slot: proposal posted");
        Ok(())
    }

    /// Vote tapped: record it and re-render the status section
    pub async fn record_rsvp(
        &self,
        callback: &CallbackQuery,
        key: SurfaceKey,
        choice: RsvpChoice,
        handle: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let header = match inner.flows.get(&key) {
            Some(PlanState::AwaitingRsvp { header }) => header.clone(),
            _ => {
                debug!(?key, "record_rsvp: no live proposal for surface");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
        };

        if inner.rsvps.record(key, handle, choice) == RsvpOutcome::AlreadyRecorded {
            debug!(%handle, ?key, "record_rsvp: duplicate vote");
            let toast = match choice {
                RsvpChoice::Attending => ALREADY_ATTENDING,
                RsvpChoice::Declined => ALREADY_DECLINED,
            };
            self.chat.answer_callback(&callback.id, Some(toast), false).await?;
            return Ok(());
        }

        let snapshot = inner.rsvps.snapshot(key);
        let text = self.render(&header, &snapshot, &mut inner.remarks);
        self.chat
            .edit_message_text(key.chat_id, key.message_id, &text, Some(&attendance_keyboard()))
            .await?;
        self.chat.answer_callback(&callback.id, None, false).await?;
        Ok(())
    }

    /// Cancel tapped anywhere in the flow: drop state and the message
    pub async fn cancel(&self, callback: &CallbackQuery, key: SurfaceKey) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.flows.remove(&key);
        inner.rsvps.discard(key);
        drop(inner);

        if let Err(e) = self.chat.delete_message(key.chat_id, key.message_id).await {
            if e.is_bad_request() {
                debug!(?key, error = %e, "cancel: planning message already gone");
                self.chat
                    .answer_callback(&callback.id, Some(MESSAGE_GONE), false)
                    .await?;
                return Ok(());
            }
            return Err(e.into());
        }
        info!(?key, "cancel: planning surface removed");
        self.chat
            .answer_callback(&callback.id, Some(PLANNING_CANCELLED), false)
            .await?;
        Ok(())
    }

    /// Summary block: one local start time per roster member
    fn proposal_header(&self, date: NaiveDate, slot: NaiveTime) -> String {
        let base = date.and_time(slot).and_utc();
        let times = self
            .roster
            .handles()
            .map(|handle| {
                let local = localtime::shift(base, self.roster.offset(handle));
                format!("📍 {}: {}", escape_markdown(handle), local.format("%H:%M"))
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "🧘 **Session {}** (base UTC {})\n\n{}\n\nShall we confirm?",
            date.format("%d.%m"),
            slot.format("%H:%M"),
            times
        )
    }

    fn render(&self, header: &str, snapshot: &RsvpSnapshot, remarks: &mut RemarkPicker) -> String {
        let going = join_handles(&snapshot.attending);
        let not_going = join_handles(&snapshot.declined);
        let status = format!("✅ Who is going: {}\n❌ Can't make it: {}", going, not_going);

        let count = snapshot.attending.len() as u32;
        let verdict = if count >= self.min_participants {
            let joke = remarks.pick(&self.celebration).unwrap_or("");
            format!(
                "🎉 **Session confirmed!** (gathered {}/{})\n---\n\n✨ _{}_",
                count, self.min_participants, joke
            )
        } else {
            format!(
                "⏳ Need at least {} more people to confirm.",
                self.min_participants - count
            )
        };

        format!("{}\n\n{}\n\n{}", header, status, verdict)
    }
}

fn join_handles(handles: &std::collections::BTreeSet<String>) -> String {
    if handles.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        handles
            .iter()
            .map(|h| escape_markdown(h))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
