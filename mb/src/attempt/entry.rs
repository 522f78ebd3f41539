//! Result entry flow
//!
//! /record posts a slider message; ➖/➕ taps adjust a pending value
//! held server-side, ✅ appends it to the ledger and swaps the slider
//! for a result card. The card offers delete and redo, so a mistaken
//! save never needs an admin.

use std::sync::Arc;

use eyre::Result;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::attempt::adjuster::{AdjustOutcome, EntryBoard, EntryKey};
use crate::chat::types::{Button, CallbackQuery, Keyboard, SurfaceKey, User};
use crate::chat::{ChatApi, escape_markdown};
use crate::config::AttemptConfig;
use crate::dispatch::action::Action;
use crate::duration::format_seconds;
use crate::ledger::LedgerManager;
use crate::localtime;
use crate::remark::RemarkPicker;
use crate::roster::Roster;

const DELETE_SUCCESS: &str = "Result deleted 🗑";
const DELETE_NONE: &str = "No record to delete.";
const DELETE_ERROR: &str = "Window closed or no record to delete.";
const SAVED_TOAST: &str = "Result saved!";
const SAVE_FAILED: &str = "Could not save your result. Try again.";

fn too_fast(wait_secs: u64) -> String {
    format!("Too fast! Wait {}s", wait_secs)
}

fn challenge_title(first_name: &str) -> String {
    format!(
        "💪 **Challenge**\n{}, adjust your result:",
        escape_markdown(first_name)
    )
}

fn completed_card(first_name: &str, seconds: i64, date: chrono::NaiveDate, note: &str) -> String {
    format!(
        "🏆 **Challenge Completed!**\n\n👤 **User:** {}\n⏱ **Result:** {}\n📅 **Date:** {}\n\n_{}_",
        escape_markdown(first_name),
        format_seconds(seconds),
        date.format("%d.%m.%Y"),
        note
    )
}

fn slider_keyboard(seconds: i64, fine_step: i64, coarse_step: i64) -> Keyboard {
    Keyboard::new()
        .row(vec![
            Button::new(format!("➖{}s", fine_step), Action::Adjust(-fine_step).encode()),
            Button::new(format!("⏱ {}", format_seconds(seconds)), Action::Noop.encode()),
            Button::new(format!("➕{}s", fine_step), Action::Adjust(fine_step).encode()),
        ])
        .row(vec![
            Button::new(format!("➖{}s", coarse_step), Action::Adjust(-coarse_step).encode()),
            Button::new(format!("➕{}s", coarse_step), Action::Adjust(coarse_step).encode()),
        ])
        .row(vec![
            Button::new("✅ Confirm", Action::SaveAttempt.encode()),
            Button::new("❌ Delete", Action::CancelAttempt.encode()),
        ])
}

fn result_keyboard(id: i64) -> Keyboard {
    Keyboard::new().row(vec![
        Button::new("❌ Delete", Action::DeleteRecord(id).encode()),
        Button::new("⬅️ Back", Action::RedoEntry(id).encode()),
    ])
}

struct EntryInner {
    board: EntryBoard,
    remarks: RemarkPicker,
}

/// Drives slider surfaces and the saved-result cards
pub struct EntryFlow {
    chat: Arc<dyn ChatApi>,
    roster: Roster,
    ledger: LedgerManager,
    fine_step: i64,
    coarse_step: i64,
    motivation: Vec<String>,
    inner: Mutex<EntryInner>,
}

impl EntryFlow {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        roster: Roster,
        ledger: LedgerManager,
        config: &AttemptConfig,
        motivation: Vec<String>,
        remarks: RemarkPicker,
    ) -> Self {
        Self {
            chat,
            roster,
            ledger,
            fine_step: config.fine_step,
            coarse_step: config.coarse_step,
            motivation,
            inner: Mutex::new(EntryInner {
                board: EntryBoard::new(config.min_seconds, config.initial_seconds),
                remarks,
            }),
        }
    }

    /// /record entry: post a fresh slider
    pub async fn start(&self, chat_id: i64, user: &User) -> Result<()> {
        let seconds = {
            let mut inner = self.inner.lock().await;
            inner.board.start(EntryKey::new(chat_id, user.id))
        };
        let text = challenge_title(&user.first_name);
        let keyboard = slider_keyboard(seconds, self.fine_step, self.coarse_step);
        self.chat.send_message(chat_id, &text, Some(&keyboard)).await?;
        info!(chat_id, user_id = user.id, "start: entry slider opened");
        Ok(())
    }

    /// ➖/➕ tapped: apply the delta and refresh the slider label
    pub async fn adjust(&self, callback: &CallbackQuery, key: SurfaceKey, delta: i64) -> Result<()> {
        let entry_key = EntryKey::new(key.chat_id, callback.from.id);
        let mut inner = self.inner.lock().await;
        let seconds = match inner.board.adjust(entry_key, delta) {
            None => {
                debug!(?entry_key, "adjust: no pending entry");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
            Some(AdjustOutcome::Unchanged(_)) => {
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
            Some(AdjustOutcome::Changed(seconds)) => seconds,
        };

        let keyboard = slider_keyboard(seconds, self.fine_step, self.coarse_step);
        match self
            .chat
            .edit_message_keyboard(key.chat_id, key.message_id, &keyboard)
            .await
        {
            Ok(()) => {
                self.chat.answer_callback(&callback.id, None, false).await?;
                Ok(())
            }
            Err(e) if e.is_rate_limit() => {
                // The pending value keeps the adjustment; only the label lags
                let wait = e.retry_after().map(|d| d.as_secs()).unwrap_or(5);
                warn!(?entry_key, wait, "adjust: rate limited");
                self.chat
                    .answer_callback(&callback.id, Some(&too_fast(wait)), true)
                    .await?;
                Ok(())
            }
            Err(e) if e.is_bad_request() => {
                debug!(?entry_key, error = %e, "adjust: slider message gone");
                self.chat.answer_callback(&callback.id, None, false).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// ✅ tapped: append to the ledger and swap in the result card
    pub async fn save(&self, callback: &CallbackQuery, key: SurfaceKey, handle: &str) -> Result<()> {
        let entry_key = EntryKey::new(key.chat_id, callback.from.id);
        let mut inner = self.inner.lock().await;
        let seconds = match inner.board.current(entry_key) {
            Some(seconds) => seconds,
            None => {
                debug!(?entry_key, "save: no pending entry");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
        };

        let date = localtime::local_today(self.roster.offset(handle));
        let id = match self.ledger.append(handle, seconds, date).await {
            Ok(id) => id,
            Err(e) => {
                // Keep the pending value so the user can just tap again
                warn!(%handle, seconds, error = %e, "save: ledger append failed");
                self.chat
                    .answer_callback(&callback.id, Some(SAVE_FAILED), true)
                    .await?;
                return Err(e.into());
            }
        };
        inner.board.take(entry_key);

        let note = inner.remarks.pick(&self.motivation).unwrap_or("").to_string();
        let text = completed_card(&callback.from.first_name, seconds, date, &note);
        self.chat
            .edit_message_text(key.chat_id, key.message_id, &text, Some(&result_keyboard(id)))
            .await?;
        info!(%handle, seconds, id, "save: attempt recorded");
        self.chat
            .answer_callback(&callback.id, Some(SAVED_TOAST), false)
            .await?;
        Ok(())
    }

    /// ❌ tapped on the slider: drop the pending value and the message
    pub async fn cancel(&self, callback: &CallbackQuery, key: SurfaceKey) -> Result<()> {
        let entry_key = EntryKey::new(key.chat_id, callback.from.id);
        let had_entry = {
            let mut inner = self.inner.lock().await;
            inner.board.take(entry_key).is_some()
        };
        if had_entry {
            self.chat.answer_callback(&callback.id, None, false).await?;
        } else {
            debug!(?entry_key, "cancel: no pending entry");
            self.chat
                .answer_callback(&callback.id, Some(DELETE_NONE), true)
                .await?;
        }

        if let Err(e) = self.chat.delete_message(key.chat_id, key.message_id).await {
            if e.is_bad_request() {
                debug!(?key, error = %e, "cancel: slider message already gone");
                return Ok(());
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// ❌ tapped on a result card: drop the saved row and the card
    pub async fn delete_record(&self, callback: &CallbackQuery, key: SurfaceKey, id: i64) -> Result<()> {
        match self.ledger.delete(id).await {
            Ok(true) => {
                info!(id, "delete_record: row removed");
                self.chat
                    .answer_callback(&callback.id, Some(DELETE_SUCCESS), false)
                    .await?;
            }
            Ok(false) => {
                debug!(id, "delete_record: row already gone");
                self.chat
                    .answer_callback(&callback.id, Some(DELETE_NONE), true)
                    .await?;
            }
            Err(e) => {
                warn!(id, error = %e, "delete_record: ledger delete failed");
                self.chat
                    .answer_callback(&callback.id, Some(DELETE_ERROR), true)
                    .await?;
                return Err(e.into());
            }
        }

        if let Err(e) = self.chat.delete_message(key.chat_id, key.message_id).await {
            if e.is_bad_request() {
                debug!(?key, error = %e, "delete_record: card already gone");
                return Ok(());
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// ⬅️ tapped on a result card: undo the save and reopen the slider
    pub async fn redo(&self, callback: &CallbackQuery, key: SurfaceKey, id: i64) -> Result<()> {
        if let Err(e) = self.ledger.delete(id).await {
            // The stale row stays; the new save still goes through
            warn!(id, error = %e, "redo: could not remove saved row");
        }

        let seconds = {
            let mut inner = self.inner.lock().await;
            inner.board.start(EntryKey::new(key.chat_id, callback.from.id))
        };
        let text = challenge_title(&callback.from.first_name);
        let keyboard = slider_keyboard(seconds, self.fine_step, self.coarse_step);
        match self
            .chat
            .edit_message_text(key.chat_id, key.message_id, &text, Some(&keyboard))
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_bad_request() => {
                debug!(?key, error = %e, "redo: card message gone");
            }
            Err(e) => return Err(e.into()),
        }
        self.chat.answer_callback(&callback.id, None, false).await?;
        Ok(())
    }
}
