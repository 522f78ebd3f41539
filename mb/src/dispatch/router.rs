//! Update routing
//!
//! Long-polls the chat backend and fans each update out to the flow
//! that owns it. One update failing never stops the loop; the error is
//! logged and polling continues with the next offset.

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::attempt::{EntryFlow, StatsView};
use crate::chat::types::{BotCommand, CallbackQuery, Message, Update};
use crate::chat::ChatApi;
use crate::dispatch::access::{AccessGate, Admission};
use crate::dispatch::action::Action;
use crate::session::SessionPlanner;

/// Commands advertised in the chat client's menu
pub const COMMANDS: &[(&str, &str)] = &[
    ("plan", "🧘‍♀️ Schedule a session"),
    ("record", "⏱ New result entry"),
    ("progress", "📊 My statistics"),
];

const SHUTDOWN_ACK: &str = "🛑 Bot shut down.";
const SHUTDOWN_DENIED: &str = "🚫 You don't have permission to shut down the bot.";

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct Router {
    chat: Arc<dyn ChatApi>,
    gate: AccessGate,
    planner: SessionPlanner,
    entry: EntryFlow,
    stats: StatsView,
    admin: Option<String>,
    poll_timeout_secs: u64,
    shutdown_tx: mpsc::Sender<()>,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chat: Arc<dyn ChatApi>,
        gate: AccessGate,
        planner: SessionPlanner,
        entry: EntryFlow,
        stats: StatsView,
        admin: Option<String>,
        poll_timeout_secs: u64,
        shutdown_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            chat,
            gate,
            planner,
            entry,
            stats,
            admin: admin.map(|a| a.to_lowercase()),
            poll_timeout_secs,
            shutdown_tx,
        }
    }

    /// Publishes the command menu to the chat backend
    pub async fn register_commands(&self) -> Result<()> {
        let commands: Vec<BotCommand> = COMMANDS
            .iter()
            .map(|(command, description)| BotCommand {
                command: command.to_string(),
                description: description.to_string(),
            })
            .collect();
        self.chat.set_commands(&commands).await?;
        info!(count = commands.len(), "register_commands: menu published");
        Ok(())
    }

    /// Polls until a shutdown signal arrives
    pub async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        let mut offset: i64 = 0;
        info!("run: polling for updates");
        loop {
            let updates = tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("run: shutdown requested");
                    break;
                }
                result = self.chat.get_updates(offset, self.poll_timeout_secs) => match result {
                    Ok(updates) => updates,
                    Err(e) if e.is_rate_limit() => {
                        let wait = e.retry_after().unwrap_or(POLL_RETRY_DELAY);
                        warn!(wait_secs = wait.as_secs(), "run: polling rate limited");
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    Err(e) => {
                        error!(error = %e, "run: polling failed");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Err(e) = self.dispatch(update).await {
                    error!(error = %e, "run: update handling failed");
                }
            }
        }
        Ok(())
    }

    async fn dispatch(&self, update: Update) -> Result<()> {
        if let Some(message) = update.message {
            self.dispatch_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.dispatch_callback(callback).await
        } else {
            Ok(())
        }
    }

    async fn dispatch_message(&self, message: Message) -> Result<()> {
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let Some(command) = parse_command(text) else {
            return Ok(());
        };
        let Some(user) = message.from.as_ref() else {
            return Ok(());
        };

        let handle = match self.gate.admit(user) {
            Admission::Granted(handle) => handle,
            Admission::Denied(reason) => {
                self.chat.send_message(message.chat.id, reason, None).await?;
                return Ok(());
            }
        };

        debug!(command, %handle, chat_id = message.chat.id, "dispatch_message");
        match command {
            "plan" => self.planner.start(message.chat.id, &handle).await,
            "record" => self.entry.start(message.chat.id, user).await,
            "progress" => self.stats.show_summary(message.chat.id, &handle).await,
            "shutdown" => self.handle_shutdown(message.chat.id, &handle).await,
            other => {
                debug!(command = other, "dispatch_message: unknown command");
                Ok(())
            }
        }
    }

    async fn handle_shutdown(&self, chat_id: i64, handle: &str) -> Result<()> {
        if self.admin.as_deref() != Some(handle) {
            warn!(%handle, "handle_shutdown: refused");
            self.chat.send_message(chat_id, SHUTDOWN_DENIED, None).await?;
            return Ok(());
        }
        info!(%handle, "handle_shutdown: stopping on admin request");
        self.chat.send_message(chat_id, SHUTDOWN_ACK, None).await?;
        let _ = self.shutdown_tx.send(()).await;
        Ok(())
    }

    async fn dispatch_callback(&self, callback: CallbackQuery) -> Result<()> {
        let handle = match self.gate.admit(&callback.from) {
            Admission::Granted(handle) => handle,
            Admission::Denied(reason) => {
                self.chat
                    .answer_callback(&callback.id, Some(reason), true)
                    .await?;
                return Ok(());
            }
        };

        let Some(key) = callback.message.as_ref().map(|m| m.surface_key()) else {
            debug!("dispatch_callback: no source message");
            self.chat.answer_callback(&callback.id, None, false).await?;
            return Ok(());
        };

        let action = match callback.data.as_deref() {
            Some(data) => match Action::parse(data) {
                Ok(action) => action,
                Err(e) => {
                    warn!(error = %e, "dispatch_callback: bad payload");
                    self.chat.answer_callback(&callback.id, None, false).await?;
                    return Ok(());
                }
            },
            None => {
                debug!("dispatch_callback: empty payload");
                self.chat.answer_callback(&callback.id, None, false).await?;
                return Ok(());
            }
        };

        debug!(?action, %handle, ?key, "dispatch_callback");
        match action {
            Action::PickDay(date) => self.planner.pick_day(&callback, key, date, &handle).await,
            Action::BackToDays => self.planner.back_to_days(&callback, key, &handle).await,
            Action::PickSlot(slot) => self.planner.pick_slot(&callback, key, slot).await,
            Action::Rsvp(choice) => self.planner.record_rsvp(&callback, key, choice, &handle).await,
            Action::CancelPlan => self.planner.cancel(&callback, key).await,
            Action::Adjust(delta) => self.entry.adjust(&callback, key, delta).await,
            Action::SaveAttempt => self.entry.save(&callback, key, &handle).await,
            Action::CancelAttempt => self.entry.cancel(&callback, key).await,
            Action::DeleteRecord(id) => self.entry.delete_record(&callback, key, id).await,
            Action::RedoEntry(id) => self.entry.redo(&callback, key, id).await,
            Action::ShowDetails => self.stats.show_details(&callback, key, &handle).await,
            Action::HideDetails => self.stats.hide_details(&callback, key, &handle).await,
            Action::Noop => {
                self.chat.answer_callback(&callback.id, None, false).await?;
                Ok(())
            }
        }
    }
}

/// Extracts the command name from "/name", "/name@bot", "/name args"
fn parse_command(text: &str) -> Option<&str> {
    let stripped = text.trim().strip_prefix('/')?;
    let token = stripped.split_whitespace().next()?;
    Some(match token.split_once('@') {
        Some((name, _)) => name,
        None => token,
    })
}
