use std::fmt;

use serde_json::Value;

use crate::suite::entry::EntryError;

/// Derived three-state status of an entry after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed,
    Unmet,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Failed => write!(f, "FAILED"),
            Self::Unmet => write!(f, "UNMET"),
        }
    }
}

/// Per-entry execution record, created at defaults before dispatch and
/// finalized once, either by the entry's single execution attempt or by
/// being marked unmet without execution. A fresh record set is created for
/// every dispatch run.
#[derive(Debug, Clone, Default)]
pub struct EntryState {
    /// A dependency failed or was itself unmet; the entry never ran.
    pub unmet: bool,
    /// The entry's callable was invoked.
    pub executed: bool,
    /// The invocation completed without a failure.
    pub ok: bool,
    /// The callable's return value, recorded on success.
    pub return_value: Option<Value>,
    /// Structured failure detail, recorded when the invocation failed.
    pub error: Option<EntryError>,
    /// Output captured during the invocation, if capture was on.
    pub captured_output: Option<String>,
    /// Log lines captured during the invocation, if capture was on.
    pub captured_logs: Option<Vec<String>>,
}

impl EntryState {
    /// The derived status. `executed == false` with `unmet == false` is
    /// "not yet reached" and only visible mid-dispatch; it reports as
    /// `Failed` like any non-ok state.
    pub fn status(&self) -> Status {
        if self.unmet {
            Status::Unmet
        } else if self.ok {
            Status::Ok
        } else {
            Status::Failed
        }
    }

    /// Whether the entry ran and failed.
    pub fn is_failed(&self) -> bool {
        self.executed && !self.ok
    }
}
