use serde::{Deserialize, Serialize};

use crate::runner::dispatch::RunResult;
use crate::suite::builder::Suite;

/// Serializable run result for emitter output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite: SuiteMetadata,
    pub results: Vec<EntryResultReport>,
    pub summary: SummaryReport,
}

/// Metadata about the suite that ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteMetadata {
    pub name: String,
    pub entries_total: usize,
    pub dependencies_total: usize,
}

/// A single entry's outcome in the report, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResultReport {
    pub order: usize,
    pub entry: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_logs: Option<Vec<String>>,
}

/// Error detail in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Summary statistics in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    pub unmet: usize,
    pub success: bool,
}

/// Convert a [`RunResult`] into a serializable [`SuiteReport`].
pub fn to_report(result: &RunResult, suite: &Suite) -> SuiteReport {
    let results: Vec<EntryResultReport> = result
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let error = record.state.error.as_ref().map(|e| ErrorReport {
                kind: e.kind.to_string(),
                message: e.message.clone(),
                detail: e.detail.clone(),
            });

            EntryResultReport {
                order: i + 1,
                entry: record.name.clone(),
                status: record.state.status().to_string(),
                error,
                captured_output: record.state.captured_output.clone(),
                captured_logs: record.state.captured_logs.clone(),
            }
        })
        .collect();

    SuiteReport {
        suite: SuiteMetadata {
            name: result.suite_name.clone(),
            entries_total: suite.entries().len(),
            dependencies_total: suite.dependency_count(),
        },
        results,
        summary: SummaryReport {
            total: result.summary.total,
            ok: result.summary.ok,
            failed: result.summary.failed,
            unmet: result.summary.unmet,
            success: result.summary.success(),
        },
    }
}
