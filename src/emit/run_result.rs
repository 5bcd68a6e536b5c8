use crate::runner::report::SuiteReport;

/// Emit a run report as YAML.
pub fn emit_run_yaml(report: &SuiteReport) -> String {
    serde_yaml::to_string(report).unwrap_or_else(|e| format!("# Error serializing report: {e}"))
}

/// Emit a run report as JSON.
pub fn emit_run_json(report: &SuiteReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{ \"error\": \"{}\" }}", e))
}

/// Emit a run report as JUnit XML. FAILED entries become `<failure>`
/// elements, UNMET entries `<skipped>`.
pub fn emit_run_junit(report: &SuiteReport) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let name = xml_escape(&report.suite.name);
    let tests = report.summary.total;
    let failures = report.summary.failed;
    let skipped = report.summary.unmet;

    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
    writeln!(
        out,
        r#"<testsuites name="{name}" tests="{tests}" failures="{failures}" skipped="{skipped}">"#
    )
    .unwrap();
    writeln!(
        out,
        r#"  <testsuite name="{name}" tests="{tests}" failures="{failures}" skipped="{skipped}">"#
    )
    .unwrap();

    for entry in &report.results {
        let entry_name = xml_escape(&entry.entry);
        writeln!(
            out,
            r#"    <testcase name="{entry_name}" classname="{name}">"#
        )
        .unwrap();

        if entry.status == "FAILED" {
            if let Some(err) = &entry.error {
                writeln!(
                    out,
                    r#"      <failure message="{}" type="{}"/>"#,
                    xml_escape(&err.message),
                    xml_escape(&err.kind)
                )
                .unwrap();
            } else {
                writeln!(out, r#"      <failure message="test failed"/>"#).unwrap();
            }
        }

        if entry.status == "UNMET" {
            writeln!(
                out,
                r#"      <skipped message="depends on a failed or unmet entry"/>"#
            )
            .unwrap();
        }

        if let Some(output) = &entry.captured_output
            && !output.is_empty()
        {
            writeln!(out, "      <system-out>").unwrap();
            writeln!(out, "{}", xml_escape(output.trim_end_matches('\n'))).unwrap();
            writeln!(out, "      </system-out>").unwrap();
        }

        writeln!(out, "    </testcase>").unwrap();
    }

    writeln!(out, "  </testsuite>").unwrap();
    writeln!(out, "</testsuites>").unwrap();

    out
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
