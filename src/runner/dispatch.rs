use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::graph::resolve::{self, ResolveError};
use crate::runner::capture::{CaptureConfig, EntryContext};
use crate::runner::state::EntryState;
use crate::suite::builder::Suite;
use crate::suite::entry::{Entry, EntryError};

/// Configuration for a dispatch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    /// Which entry output channels to capture.
    pub capture: CaptureConfig,
    /// Emit dispatch diagnostics on stderr.
    pub debug: bool,
}

/// The dispatcher: runs one suite's entries in dependency order.
///
/// Entries run strictly one at a time on the calling thread, in registry
/// order within a pass; entries whose dependencies are not yet executed are
/// deferred to the next pass until no pending entries remain.
pub struct SuiteRunner<'a> {
    suite: &'a Suite,
    config: RunConfig,
}

impl<'a> SuiteRunner<'a> {
    /// Create a runner with the default config.
    pub fn new(suite: &'a Suite) -> Self {
        Self {
            suite,
            config: RunConfig::default(),
        }
    }

    /// Create a runner with an explicit config.
    pub fn with_config(suite: &'a Suite, config: RunConfig) -> Self {
        Self { suite, config }
    }

    /// Execute the full suite and return one record per entry.
    ///
    /// 1. Validate the dependency graph (a structural defect aborts here,
    ///    with zero entries executed)
    /// 2. Run the suite setup routine, if any
    /// 3. Dispatch entries pass by pass until none are pending
    /// 4. Run the suite teardown routine, if any
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on a structural defect or a setup failure. An
    /// individual entry's failure is recorded, never returned.
    pub fn run(&self) -> Result<RunResult, RunError> {
        resolve::validate(self.suite).map_err(RunError::Structural)?;

        if let Some(setup) = self.suite.setup() {
            self.debug(format_args!("running {}", setup.name));
            invoke_routine(setup).map_err(RunError::SetupFailed)?;
        }

        let mut states: HashMap<String, EntryState> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        let candidates: Vec<&Entry> = self.suite.entries().iter().collect();
        self.dispatch(&candidates, &mut states, &mut order);

        let teardown_error = match self.suite.teardown() {
            Some(teardown) => {
                self.debug(format_args!("running {}", teardown.name));
                invoke_routine(teardown).err()
            }
            None => None,
        };

        let records: Vec<EntryRecord> = order
            .into_iter()
            .map(|name| {
                let state = states
                    .remove(&name)
                    .expect("every finalized entry has a state");
                EntryRecord { name, state }
            })
            .collect();
        let summary = RunSummary::from_records(&records);

        Ok(RunResult {
            suite_name: self.suite.name.clone(),
            records,
            summary,
            teardown_error,
        })
    }

    /// One dispatch pass over the candidate list. Every candidate ends the
    /// pass executed or unmet, or is carried into the next pass; the
    /// recursion bottoms out once a pass leaves nothing pending.
    fn dispatch(
        &self,
        candidates: &[&'a Entry],
        states: &mut HashMap<String, EntryState>,
        order: &mut Vec<String>,
    ) {
        let mut pendings: Vec<&Entry> = Vec::new();

        for &entry in candidates {
            let deps = resolve::resolve(self.suite, entry)
                .expect("dependency graph was validated before dispatch");

            if !deps.is_empty() {
                if should_unmet(&deps, states) {
                    states.entry(entry.name.clone()).or_default().unmet = true;
                    self.run_entry(entry, states, order);
                    continue;
                }
                if should_pending(&deps, states) {
                    self.debug(format_args!("{} pending", entry.name));
                    pendings.push(entry);
                    continue;
                }
            }

            self.run_entry(entry, states, order);
        }

        if !pendings.is_empty() {
            self.dispatch(&pendings, states, order);
        }
    }

    /// Finalize one entry: invoke its callable with arguments built from
    /// the declared dependency order, or skip it when already marked unmet.
    fn run_entry(
        &self,
        entry: &Entry,
        states: &mut HashMap<String, EntryState>,
        order: &mut Vec<String>,
    ) {
        let state = states.entry(entry.name.clone()).or_default();
        if state.unmet {
            self.debug(format_args!("{} unmet, skip run", entry.name));
            order.push(entry.name.clone());
            return;
        }

        let mut args = Vec::new();
        for dep in &entry.dependencies {
            if dep.with_return {
                let value = states
                    .get(&dep.name)
                    .and_then(|s| s.return_value.clone())
                    .expect("dependency executed without a recorded return value");
                args.push(value);
            }
        }

        let mut cx = EntryContext::new(&args, self.config.capture);
        let outcome = catch_unwind(AssertUnwindSafe(|| entry.call(&mut cx)));
        let captured = cx.into_captured();

        let state = states
            .get_mut(&entry.name)
            .expect("state created before invocation");
        match outcome {
            Ok(Ok(value)) => {
                state.return_value = Some(value);
                state.ok = true;
            }
            Ok(Err(err)) => {
                state.error = Some(err);
                state.ok = false;
            }
            Err(payload) => {
                state.error = Some(EntryError::panicked(panic_message(payload)));
                state.ok = false;
            }
        }
        state.executed = true;
        state.captured_output = captured.output;
        state.captured_logs = captured.logs;

        self.debug(format_args!("{} {}", entry.name, state.status()));
        order.push(entry.name.clone());
    }

    fn debug(&self, message: fmt::Arguments<'_>) {
        if self.config.debug {
            eprintln!("deptest: {message}");
        }
    }
}

/// Any dependency failed or is itself unmet.
fn should_unmet(deps: &[&str], states: &HashMap<String, EntryState>) -> bool {
    deps.iter()
        .any(|dep| states.get(*dep).is_some_and(|s| s.is_failed() || s.unmet))
}

/// Any dependency has not executed yet. Only meaningful once the entry is
/// known not to be unmet.
fn should_pending(deps: &[&str], states: &HashMap<String, EntryState>) -> bool {
    deps.iter()
        .any(|dep| !states.get(*dep).is_some_and(|s| s.executed))
}

/// Run a suite setup/teardown routine outside entry capture; its return
/// value is discarded.
fn invoke_routine(routine: &Entry) -> Result<(), EntryError> {
    let mut cx = EntryContext::new(&[], CaptureConfig::disabled());
    match catch_unwind(AssertUnwindSafe(|| routine.call(&mut cx))) {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(err),
        Err(payload) => Err(EntryError::panicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast::<&str>() {
            Ok(s) => (*s).to_owned(),
            Err(_) => "entry panicked".to_owned(),
        },
    }
}

/// One finalized entry, in the order entries were finalized.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub name: String,
    pub state: EntryState,
}

/// The complete result of one dispatch run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub suite_name: String,
    pub records: Vec<EntryRecord>,
    pub summary: RunSummary,
    /// Teardown failure, recorded without altering entry statuses.
    pub teardown_error: Option<EntryError>,
}

impl RunResult {
    /// Look up one entry's record by name.
    pub fn record(&self, name: &str) -> Option<&EntryRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Status counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    pub unmet: usize,
}

impl RunSummary {
    /// Whether every entry finished OK.
    pub fn success(&self) -> bool {
        self.failed == 0 && self.unmet == 0
    }

    /// Fold another summary into this one (cross-suite totals).
    pub fn absorb(&mut self, other: &RunSummary) {
        self.total += other.total;
        self.ok += other.ok;
        self.failed += other.failed;
        self.unmet += other.unmet;
    }

    fn from_records(records: &[EntryRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.state.status() {
                crate::runner::state::Status::Ok => summary.ok += 1,
                crate::runner::state::Status::Failed => summary.failed += 1,
                crate::runner::state::Status::Unmet => summary.unmet += 1,
            }
        }
        summary
    }
}

/// Error that aborts a suite's dispatch before any entry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A structural defect in the dependency declarations.
    Structural(ResolveError),
    /// The suite setup routine failed.
    SetupFailed(EntryError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural(e) => write!(f, "structural error: {e}"),
            Self::SetupFailed(e) => write!(f, "suite setup failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Structural(e) => Some(e),
            Self::SetupFailed(e) => Some(e),
        }
    }
}
