use std::io::{self, Write};

use serde_json::json;

use crate::diagnostics::{ErrorFormat, FormatOptions, format_diagnostics};
use crate::driver::CheckReport;
use crate::error::Error;

pub(super) fn report_error(err: &Error) {
    let mut out = io::stderr();
    if let Err(io_err) = report_error_to(err, &mut out) {
        let _ = writeln!(io::stderr(), "failed to report error: {io_err}");
    }
}

pub(super) fn report_error_to(err: &Error, out: &mut dyn Write) -> io::Result<()> {
    match err {
        Error::Parse(parse_err) => {
            writeln!(out, "error: {parse_err}")?;
            let rendered = format_diagnostics(
                parse_err.diagnostics(),
                parse_err.files(),
                FormatOptions::new(ErrorFormat::Human),
            );
            writeln!(out, "{rendered}")?;
        }
        _ => {
            writeln!(out, "{err}")?;
            if cfg!(debug_assertions) {
                if let Some(backtrace) = err.backtrace() {
                    writeln!(out, "stack trace:")?;
                    writeln!(out, "{backtrace}")?;
                }
            }
        }
    }
    Ok(())
}

pub(super) fn print_report_diagnostics_to(
    report: &CheckReport,
    options: FormatOptions,
    out: &mut dyn Write,
) -> io::Result<()> {
    if report.diagnostics.is_empty() {
        return Ok(());
    }
    if options.format != ErrorFormat::Json {
        writeln!(out, "check completed with diagnostics:")?;
    }
    let rendered = format_diagnostics(&report.diagnostics, &report.files, options);
    writeln!(out, "{rendered}")
}

/// One entry per analysed null-conditional chain, in source order.
pub(super) fn print_navigation_to(
    report: &CheckReport,
    json: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut records: Vec<_> = report.navigation.iter().collect();
    records.sort_by_key(|record| (record.span.start, record.span.end));

    if !json && !records.is_empty() {
        writeln!(out, "null-conditional chains:")?;
    }
    for record in records {
        let location = report.files.line_col(record.span.file_id, record.span.start);
        let (line, column) = location.map_or((0, 0), |loc| (loc.line, loc.column));
        let lowered = record.lowered.as_ref().map(ToString::to_string);
        if json {
            let payload = json!({
                "kind": "navigation",
                "file": report.input.display().to_string(),
                "line": line,
                "column": column,
                "text": record.text,
                "result": record.result.to_string(),
                "lowered": lowered,
            });
            writeln!(out, "{payload}")?;
        } else {
            writeln!(out, "  {line}:{column} {} : {}", record.text, record.result)?;
            if let Some(lowered) = lowered {
                writeln!(out, "    {lowered}")?;
            }
        }
    }
    Ok(())
}
