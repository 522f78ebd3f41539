//! Async facade over the attempt ledger
//!
//! The rusqlite connection is not Sync, so it lives on a dedicated task
//! and handlers talk to it through a command channel. Cloning the
//! manager clones the sender; all clones reach the same store.

use std::path::Path;

use attemptledger::{AttemptRow, Ledger, WindowStats};
use chrono::NaiveDate;
use eyre::Result;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::ledger::messages::{LedgerCommand, LedgerError, LedgerResponse};

#[derive(Clone)]
pub struct LedgerManager {
    tx: mpsc::Sender<LedgerCommand>,
}

impl LedgerManager {
    /// Opens the store and spawns the actor task
    pub fn spawn(db_path: &Path) -> Result<Self> {
        let store = Ledger::open(db_path)?;
        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(actor_loop(store, rx));

        info!("LedgerManager spawned");
        Ok(Self { tx })
    }

    pub async fn append(&self, handle: &str, seconds: i64, date: NaiveDate) -> LedgerResponse<i64> {
        debug!("append: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(LedgerCommand::Append {
                handle: handle.to_string(),
                seconds,
                date,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LedgerError::ChannelError)?;
        reply_rx.await.map_err(|_| LedgerError::ChannelError)?
    }

    pub async fn delete(&self, id: i64) -> LedgerResponse<bool> {
        debug!("delete: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(LedgerCommand::Delete { id, reply: reply_tx })
            .await
            .map_err(|_| LedgerError::ChannelError)?;
        reply_rx.await.map_err(|_| LedgerError::ChannelError)?
    }

    pub async fn window_stats(
        &self,
        handle: &str,
        days: u32,
        today: NaiveDate,
    ) -> LedgerResponse<WindowStats> {
        debug!("window_stats: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(LedgerCommand::WindowStats {
                handle: handle.to_string(),
                days,
                today,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LedgerError::ChannelError)?;
        reply_rx.await.map_err(|_| LedgerError::ChannelError)?
    }

    pub async fn list_recent(
        &self,
        handle: &str,
        days: u32,
        today: NaiveDate,
    ) -> LedgerResponse<Vec<AttemptRow>> {
        debug!("list_recent: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(LedgerCommand::ListRecent {
                handle: handle.to_string(),
                days,
                today,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LedgerError::ChannelError)?;
        reply_rx.await.map_err(|_| LedgerError::ChannelError)?
    }

    pub async fn shutdown(&self) -> LedgerResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(LedgerCommand::Shutdown)
            .await
            .map_err(|_| LedgerError::ChannelError)
    }
}

async fn actor_loop(store: Ledger, mut rx: mpsc::Receiver<LedgerCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            LedgerCommand::Append { handle, seconds, date, reply } => {
                debug!(%handle, seconds, "actor: append");
                let result = store
                    .append(&handle, seconds, date)
                    .map_err(|e| LedgerError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }
            LedgerCommand::Delete { id, reply } => {
                debug!(id, "actor: delete");
                let result = store
                    .delete(id)
                    .map_err(|e| LedgerError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }
            LedgerCommand::WindowStats { handle, days, today, reply } => {
                debug!(%handle, days, "actor: window_stats");
                let result = store
                    .window_stats(&handle, days, today)
                    .map_err(|e| LedgerError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }
            LedgerCommand::ListRecent { handle, days, today, reply } => {
                debug!(%handle, days, "actor: list_recent");
                let result = store
                    .recent(&handle, days, today)
                    .map_err(|e| LedgerError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }
            LedgerCommand::Shutdown => {
                info!("actor: shutdown");
                break;
            }
        }
    }
    debug!("LedgerManager actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn test_manager() -> (LedgerManager, TempDir) {
        let dir = TempDir::new().unwrap();
        let manager = LedgerManager::spawn(&dir.path().join("attempts.db")).unwrap();
        (manager, dir)
    }

    #[tokio::test]
    async fn test_append_returns_row_id() {
        let (manager, _dir) = test_manager().await;
        let id = manager.append("alice", 90, test_date("2025-10-15")).await.unwrap();
        assert!(id > 0);
        let second = manager.append("alice", 45, test_date("2025-10-15")).await.unwrap();
        assert!(second > id);
        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_window_stats_roundtrip() {
        let (manager, _dir) = test_manager().await;
        manager.append("alice", 60, test_date("2025-10-14")).await.unwrap();
        manager.append("alice", 90, test_date("2025-10-15")).await.unwrap();
        manager.append("bob", 500, test_date("2025-10-15")).await.unwrap();

        let stats = manager
            .window_stats("alice", 7, test_date("2025-10-15"))
            .await
            .unwrap();
        assert_eq!(stats.total, 150);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max, 90);
        assert_eq!(stats.average, 75);
        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let (manager, _dir) = test_manager().await;
        let id = manager.append("alice", 60, test_date("2025-10-15")).await.unwrap();
        assert!(manager.delete(id).await.unwrap());
        assert!(!manager.delete(id).await.unwrap());
        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let (manager, _dir) = test_manager().await;
        manager.append("alice", 10, test_date("2025-10-13")).await.unwrap();
        manager.append("alice", 20, test_date("2025-10-15")).await.unwrap();
        manager.append("alice", 30, test_date("2025-10-15")).await.unwrap();

        let rows = manager
            .list_recent("alice", 30, test_date("2025-10-15"))
            .await
            .unwrap();
        let seconds: Vec<i64> = rows.iter().map(|r| r.seconds).collect();
        assert_eq!(seconds, vec![30, 20, 10]);
        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_calls_after_shutdown_fail() {
        let (manager, _dir) = test_manager().await;
        manager.shutdown().await.unwrap();
        // Give the actor a moment to drain and drop the receiver
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let result = manager.append("alice", 60, test_date("2025-10-15")).await;
        assert_eq!(result, Err(LedgerError::ChannelError));
    }
}
