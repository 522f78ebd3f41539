use attemptledger::{AttemptRow, WindowStats};
use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Ledger error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

pub type LedgerResponse<T> = Result<T, LedgerError>;

/// Commands the ledger actor accepts
#[derive(Debug)]
pub enum LedgerCommand {
    Append {
        handle: String,
        seconds: i64,
        date: NaiveDate,
        reply: oneshot::Sender<LedgerResponse<i64>>,
    },
    Delete {
        id: i64,
        reply: oneshot::Sender<LedgerResponse<bool>>,
    },
    WindowStats {
        handle: String,
        days: u32,
        today: NaiveDate,
        reply: oneshot::Sender<LedgerResponse<WindowStats>>,
    },
    ListRecent {
        handle: String,
        days: u32,
        today: NaiveDate,
        reply: oneshot::Sender<LedgerResponse<Vec<AttemptRow>>>,
    },
    Shutdown,
}
