use std::fmt::Write;

use crate::runner::dispatch::{EntryRecord, RunSummary};
use crate::runner::state::Status;

const LINE_WIDTH: usize = 70;

/// A full-width horizontal rule.
pub fn hr(ch: char) -> String {
    ch.to_string().repeat(LINE_WIDTH)
}

/// A divider with a label in the middle.
pub fn ln(label: &str, ch: char) -> String {
    let label_len = label.len() + 2;
    let chunk = LINE_WIDTH.saturating_sub(label_len) / 2;
    let side = ch.to_string().repeat(chunk);
    let mut out = format!("{side} {label} {side}");
    while out.len() < LINE_WIDTH {
        out.push(ch);
    }
    out
}

/// The single status line for one entry: `→ suite.entry... STATUS`.
pub fn format_entry_line(suite_name: &str, record: &EntryRecord) -> String {
    format!(
        "→ {suite_name}.{}... {}",
        record.name,
        record.state.status()
    )
}

/// The failure detail block shown under a FAILED entry's status line:
/// error message and detail, then any captured output and log lines in
/// begin/end banners. Entries with any other status get no block.
pub fn format_failure_block(record: &EntryRecord) -> Option<String> {
    if record.state.status() != Status::Failed {
        return None;
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", hr('='));
    if let Some(error) = &record.state.error {
        let _ = writeln!(out, "{error}");
        if let Some(detail) = &error.detail {
            let _ = writeln!(out, "{detail}");
        }
    }
    if let Some(output) = &record.state.captured_output
        && !output.is_empty()
    {
        let _ = writeln!(out, "{}", ln(">> begin captured output <<", '-'));
        let _ = writeln!(out, "{}", output.trim_end_matches('\n'));
        let _ = writeln!(out, "{}", ln(">> end captured output <<", '-'));
    }
    if let Some(logs) = &record.state.captured_logs
        && !logs.is_empty()
    {
        let _ = writeln!(out, "{}", ln(">> begin captured logging <<", '-'));
        let _ = writeln!(out, "{}", logs.join("\n"));
        let _ = writeln!(out, "{}", ln(">> end captured logging <<", '-'));
    }
    let _ = writeln!(out, "{}", hr('-'));

    Some(out)
}

/// The final summary line for a run (or for totals across runs).
pub fn format_summary(totals: &RunSummary) -> String {
    format!(
        "{}\nRan {} tests, {} OK, {} FAILED, {} UNMET",
        hr('_'),
        totals.total,
        totals.ok,
        totals.failed,
        totals.unmet
    )
}
