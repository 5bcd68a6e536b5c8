use std::fmt;

use serde_json::Value;

/// Which output channels to capture during entry execution.
///
/// Threaded into the runner at construction; there is no process-global
/// toggle. With a channel off, writes stream straight through and the
/// record's corresponding field stays empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Buffer printed output instead of writing it to stdout.
    pub output: bool,
    /// Buffer log lines instead of writing them to stderr.
    pub logs: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output: true,
            logs: true,
        }
    }
}

impl CaptureConfig {
    /// Capture nothing; everything streams through.
    pub fn disabled() -> Self {
        Self {
            output: false,
            logs: false,
        }
    }
}

/// Output captured from one entry execution, handed back to the dispatcher
/// uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub output: Option<String>,
    pub logs: Option<Vec<String>>,
}

/// The handle an entry body executes against: its positional arguments plus
/// the capture sinks for printed output and log lines.
pub struct EntryContext<'a> {
    args: &'a [Value],
    config: CaptureConfig,
    output: String,
    logs: Vec<String>,
}

impl<'a> EntryContext<'a> {
    pub fn new(args: &'a [Value], config: CaptureConfig) -> Self {
        Self {
            args,
            config,
            output: String::new(),
            logs: Vec::new(),
        }
    }

    /// All positional arguments, one per `with_return` dependency edge, in
    /// the entry's declared dependency order.
    pub fn args(&self) -> &[Value] {
        self.args
    }

    /// A single positional argument by index.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Print a line of output. Captured into the execution record, or
    /// written to stdout when output capture is off.
    pub fn print(&mut self, line: impl fmt::Display) {
        if self.config.output {
            self.output.push_str(&line.to_string());
            self.output.push('\n');
        } else {
            println!("{line}");
        }
    }

    /// Emit a log line. Captured into the execution record, or written to
    /// stderr when log capture is off.
    pub fn log(&mut self, line: impl fmt::Display) {
        if self.config.logs {
            self.logs.push(line.to_string());
        } else {
            eprintln!("{line}");
        }
    }

    /// Collect whatever was captured. Channels that were not capturing
    /// yield `None`.
    pub fn into_captured(self) -> Captured {
        Captured {
            output: self.config.output.then_some(self.output),
            logs: self.config.logs.then_some(self.logs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn args_are_positional() {
        let args = vec![json!("first"), json!(2)];
        let cx = EntryContext::new(&args, CaptureConfig::default());
        assert_eq!(cx.args().len(), 2);
        assert_eq!(cx.arg(0), Some(&json!("first")));
        assert_eq!(cx.arg(1), Some(&json!(2)));
        assert_eq!(cx.arg(2), None);
    }

    #[test]
    fn captures_printed_lines_when_enabled() {
        let mut cx = EntryContext::new(&[], CaptureConfig::default());
        cx.print("func a");
        cx.print("func a again");
        let captured = cx.into_captured();
        assert_eq!(captured.output.as_deref(), Some("func a\nfunc a again\n"));
    }

    #[test]
    fn captures_log_lines_when_enabled() {
        let mut cx = EntryContext::new(&[], CaptureConfig::default());
        cx.log("connecting");
        cx.log("connected");
        let captured = cx.into_captured();
        assert_eq!(
            captured.logs,
            Some(vec!["connecting".to_owned(), "connected".to_owned()])
        );
    }

    #[test]
    fn disabled_channels_capture_nothing() {
        let mut cx = EntryContext::new(&[], CaptureConfig::disabled());
        cx.print("streamed");
        cx.log("streamed");
        let captured = cx.into_captured();
        assert_eq!(captured.output, None);
        assert_eq!(captured.logs, None);
    }

    #[test]
    fn capture_channels_are_independent() {
        let config = CaptureConfig {
            output: true,
            logs: false,
        };
        let mut cx = EntryContext::new(&[], config);
        cx.print("buffered");
        cx.log("streamed");
        let captured = cx.into_captured();
        assert_eq!(captured.output.as_deref(), Some("buffered\n"));
        assert_eq!(captured.logs, None);
    }

    #[test]
    fn empty_capture_is_empty_not_none() {
        let cx = EntryContext::new(&[], CaptureConfig::default());
        let captured = cx.into_captured();
        assert_eq!(captured.output.as_deref(), Some(""));
        assert_eq!(captured.logs, Some(vec![]));
    }
}
