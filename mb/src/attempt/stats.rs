//! Statistics surface
//!
//! /progress posts a two-window summary (week and month) with a toggle
//! into a per-day attempt log. Both views are recomputed from the
//! ledger on every render, so the message never goes stale against
//! the store. Windows are anchored to the viewer's local calendar day.

use std::sync::Arc;

use attemptledger::{AttemptRow, WindowStats};
use eyre::Result;
use tracing::debug;

use crate::chat::types::{Button, CallbackQuery, Keyboard, SurfaceKey};
use crate::chat::ChatApi;
use crate::dispatch::action::Action;
use crate::duration::{format_compact, format_seconds};
use crate::ledger::LedgerManager;
use crate::localtime;
use crate::roster::Roster;

const STATS_HEADER: &str = "📊 **Your Challenge Statistics**\n\n";
const WEEK_TITLE: &str = "🗓 **Week (7 days):**\n";
const MONTH_TITLE: &str = "📅 **Month (30 days):**\n";
const TAGLINE: &str = "_The more you do, the easier it gets!_ 💪";
const NO_DATA: &str = "No data yet";
const DETAILS_HEADER: &str = "📝 **Attempt History (30 days):**\n\n";

const WEEK_DAYS: u32 = 7;
const MONTH_DAYS: u32 = 30;

fn summary_keyboard() -> Keyboard {
    Keyboard::new().row(vec![Button::new("📝 Details (Log)", Action::ShowDetails.encode())])
}

fn details_keyboard() -> Keyboard {
    Keyboard::new().row(vec![Button::new("⬆️ Hide", Action::HideDetails.encode())])
}

fn window_block(stats: &WindowStats, badge: &str) -> String {
    format!(
        " • Total time: `{}`\n • Attempts: `{}`\n • Average: `{}`\n • Best: `{}` {}\n\n",
        format_seconds(stats.total),
        stats.count,
        format_seconds(stats.average),
        format_seconds(stats.max),
        badge
    )
}

/// One log line per calendar day, newest day first
fn details_text(rows: &[AttemptRow]) -> String {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for row in rows {
        let day = row.date.format("%d.%m").to_string();
        let value = format_compact(row.seconds);
        match groups.last_mut() {
            Some((label, values)) if *label == day => values.push(value),
            _ => groups.push((day, vec![value])),
        }
    }

    let mut text = String::from(DETAILS_HEADER);
    for (label, values) in &groups {
        text.push_str(&format!("🔹 **{}:** {}\n", label, values.join(", ")));
    }
    text
}

/// Renders summary and history views for one viewer
pub struct StatsView {
    chat: Arc<dyn ChatApi>,
    roster: Roster,
    ledger: LedgerManager,
}

impl StatsView {
    pub fn new(chat: Arc<dyn ChatApi>, roster: Roster, ledger: LedgerManager) -> Self {
        Self { chat, roster, ledger }
    }

    /// /progress entry: post the two-window summary
    pub async fn show_summary(&self, chat_id: i64, handle: &str) -> Result<()> {
        let text = self.summary_text(handle).await?;
        self.chat
            .send_message(chat_id, &text, Some(&summary_keyboard()))
            .await?;
        Ok(())
    }

    /// Details tapped: swap the summary for the per-day log
    pub async fn show_details(
        &self,
        callback: &CallbackQuery,
        key: SurfaceKey,
        handle: &str,
    ) -> Result<()> {
        let today = localtime::local_today(self.roster.offset(handle));
        let rows = self.ledger.list_recent(handle, MONTH_DAYS, today).await?;
        if rows.is_empty() {
            debug!(%handle, "show_details: no attempts in window");
            self.chat
                .answer_callback(&callback.id, Some(NO_DATA), true)
                .await?;
            return Ok(());
        }

        let text = details_text(&rows);
        self.chat
            .edit_message_text(key.chat_id, key.message_id, &text, Some(&details_keyboard()))
            .await?;
        self.chat.answer_callback(&callback.id, None, false).await?;
        Ok(())
    }

    /// Hide tapped: recompute and restore the summary
    pub async fn hide_details(
        &self,
        callback: &CallbackQuery,
        key: SurfaceKey,
        handle: &str,
    ) -> Result<()> {
        let text = self.summary_text(handle).await?;
        self.chat
            .edit_message_text(key.chat_id, key.message_id, &text, Some(&summary_keyboard()))
            .await?;
        self.chat.answer_callback(&callback.id, None, false).await?;
        Ok(())
    }

    async fn summary_text(&self, handle: &str) -> Result<String> {
        let today = localtime::local_today(self.roster.offset(handle));
        let week = self.ledger.window_stats(handle, WEEK_DAYS, today).await?;
        let month = self.ledger.window_stats(handle, MONTH_DAYS, today).await?;

        let mut text = String::from(STATS_HEADER);
        text.push_str(WEEK_TITLE);
        text.push_str(&window_block(&week, "🏆"));
        text.push_str(MONTH_TITLE);
        text.push_str(&window_block(&month, "🦁"));
        text.push_str(TAGLINE);
        Ok(text)
    }
}
