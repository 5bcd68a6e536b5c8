use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::emit::dot::emit_dot;
use crate::emit::mermaid::emit_mermaid;
use crate::emit::run_result::{emit_run_json, emit_run_junit, emit_run_yaml};
use crate::graph::builder::build;
use crate::runner::capture::CaptureConfig;
use crate::runner::dispatch::{RunConfig, RunSummary, SuiteRunner};
use crate::runner::display::{format_entry_line, format_failure_block, format_summary};
use crate::runner::report::to_report;
use crate::suite::builder::Suite;

/// Harness options, parsed from the embedding test binary's arguments.
#[derive(Parser, Debug)]
#[command(name = "deptest", about = "Dependency-driven test harness", version)]
pub struct HarnessArgs {
    /// Don't capture entry output (printed output appears immediately)
    #[arg(short = 's', long)]
    pub nocapture: bool,

    /// Don't capture entry log lines
    #[arg(long)]
    pub nologcapture: bool,

    /// List entries without running anything
    #[arg(long)]
    pub dry: bool,

    /// Emit dispatch diagnostics on stderr
    #[arg(long)]
    pub debug: bool,

    /// Print the dependency graph instead of running (dot, mermaid)
    #[arg(long, value_name = "FORMAT")]
    pub graph: Option<String>,

    /// Emit a machine-readable run report instead of status lines
    /// (yaml, json, junit)
    #[arg(long, value_name = "FORMAT")]
    pub report: Option<String>,

    /// Write graph or report output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Parse arguments from the process command line and run the suites.
/// The conventional body of an embedding test binary's `main`.
pub fn main(suites: &[Suite]) -> ExitCode {
    let args = HarnessArgs::parse();
    run(&args, suites)
}

/// Run the suites under the given options, mapping the outcome to a process
/// exit code: success only when every entry of every suite is OK.
pub fn run(args: &HarnessArgs, suites: &[Suite]) -> ExitCode {
    match execute(args, suites) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Execute the requested mode: graph emission, dry listing, or a full run
/// with human-readable or machine-readable output.
///
/// Returns `Ok(true)` when every entry of every suite finished OK.
///
/// # Errors
///
/// Returns an error string for an unknown format or an unwritable output
/// file. A structural error in one suite is reported on stderr and fails
/// the run without aborting the remaining suites.
pub fn execute(args: &HarnessArgs, suites: &[Suite]) -> Result<bool, String> {
    if let Some(format) = &args.graph {
        let mut out = String::new();
        for suite in suites {
            let sg = build(suite);
            match format.as_str() {
                "dot" => out.push_str(&emit_dot(&sg)),
                "mermaid" => out.push_str(&emit_mermaid(&sg)),
                other => {
                    return Err(format!(
                        "unknown graph format '{other}' (expected: dot, mermaid)"
                    ));
                }
            }
        }
        write_or_print(&out, args.output.as_ref())?;
        return Ok(true);
    }

    if args.dry {
        for suite in suites {
            for entry in suite.entries() {
                println!("{}.{}", suite.name, entry.name);
            }
        }
        return Ok(true);
    }

    let config = RunConfig {
        capture: CaptureConfig {
            output: !args.nocapture,
            logs: !args.nologcapture,
        },
        debug: args.debug,
    };

    let mut totals = RunSummary::default();
    let mut all_success = true;
    let mut report_out = String::new();

    for suite in suites {
        let result = match SuiteRunner::with_config(suite, config).run() {
            Ok(result) => result,
            Err(e) => {
                eprintln!("error: suite '{}': {e}", suite.name);
                all_success = false;
                continue;
            }
        };

        if let Some(format) = &args.report {
            let report = to_report(&result, suite);
            match format.as_str() {
                "yaml" => report_out.push_str(&emit_run_yaml(&report)),
                "json" => report_out.push_str(&emit_run_json(&report)),
                "junit" | "xml" => report_out.push_str(&emit_run_junit(&report)),
                other => {
                    return Err(format!(
                        "unknown report format '{other}' (expected: yaml, json, junit)"
                    ));
                }
            }
        } else {
            for record in &result.records {
                println!("{}", format_entry_line(&result.suite_name, record));
                if let Some(block) = format_failure_block(record) {
                    print!("{block}");
                }
            }
        }

        if let Some(err) = &result.teardown_error {
            eprintln!("warning: suite '{}' teardown failed: {err}", suite.name);
        }

        totals.absorb(&result.summary);
        if !result.summary.success() {
            all_success = false;
        }
    }

    if args.report.is_some() {
        write_or_print(&report_out, args.output.as_ref())?;
    } else {
        println!("{}", format_summary(&totals));
    }

    Ok(all_success)
}

fn write_or_print(content: &str, output: Option<&PathBuf>) -> Result<(), String> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!("output written to {}", path.display());
            Ok(())
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    use crate::suite::entry::{Entry, EntryError};

    fn parse(argv: &[&str]) -> HarnessArgs {
        HarnessArgs::try_parse_from(argv).expect("arguments should parse")
    }

    fn passing_suite() -> Suite {
        Suite::builder("simple")
            .member(Entry::new("test_a", |_| Ok(Value::Null)))
            .member(
                Entry::new("test_b", |_| Ok(Value::Null))
                    .depend_on("test_a", false)
                    .unwrap(),
            )
            .build()
    }

    fn failing_suite() -> Suite {
        Suite::builder("simple")
            .member(Entry::new("test_a", |_| {
                Err(EntryError::execution("boom"))
            }))
            .build()
    }

    #[test]
    fn args_default_to_a_plain_run() {
        let args = parse(&["deptest"]);
        assert!(!args.nocapture);
        assert!(!args.nologcapture);
        assert!(!args.dry);
        assert!(!args.debug);
        assert!(args.graph.is_none());
        assert!(args.report.is_none());
        assert!(args.output.is_none());
    }

    #[test]
    fn args_parse_capture_flags() {
        let args = parse(&["deptest", "-s", "--nologcapture"]);
        assert!(args.nocapture);
        assert!(args.nologcapture);
    }

    #[test]
    fn execute_reports_overall_success() {
        let args = parse(&["deptest", "--report", "yaml", "-o", "/dev/null"]);
        let suites = vec![passing_suite()];
        assert_eq!(execute(&args, &suites), Ok(true));
    }

    #[test]
    fn execute_reports_failure_across_suites() {
        let args = parse(&["deptest", "--report", "yaml", "-o", "/dev/null"]);
        let suites = vec![passing_suite(), failing_suite()];
        assert_eq!(execute(&args, &suites), Ok(false));
    }

    #[test]
    fn execute_dry_runs_nothing() {
        let args = parse(&["deptest", "--dry"]);
        let suites = vec![failing_suite()];
        // entries never run, so the failing body cannot fail the run
        assert_eq!(execute(&args, &suites), Ok(true));
    }

    #[test]
    fn execute_rejects_unknown_graph_format() {
        let args = parse(&["deptest", "--graph", "ascii"]);
        let err = execute(&args, &[passing_suite()]).unwrap_err();
        assert!(err.contains("unknown graph format 'ascii'"));
    }

    #[test]
    fn execute_rejects_unknown_report_format() {
        let args = parse(&["deptest", "--report", "csv"]);
        let err = execute(&args, &[passing_suite()]).unwrap_err();
        assert!(err.contains("unknown report format 'csv'"));
    }

    #[test]
    fn structural_error_fails_without_aborting_other_suites() {
        let cyclic = Suite::builder("cyclic")
            .member(
                Entry::new("test_a", |_| Ok(Value::Null))
                    .depend_on("test_b", false)
                    .unwrap(),
            )
            .member(
                Entry::new("test_b", |_| Ok(Value::Null))
                    .depend_on("test_a", false)
                    .unwrap(),
            )
            .build();
        let args = parse(&["deptest", "--report", "json", "-o", "/dev/null"]);
        let suites = vec![cyclic, passing_suite()];
        assert_eq!(execute(&args, &suites), Ok(false));
    }
}
