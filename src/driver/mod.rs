use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::capture;
use crate::diagnostics::FileCache;
use crate::error::Result;
use crate::frontend::parser::parse_unit_in_file;
use crate::logging::LogLevel;
use crate::typeck::{TypeTable, check_unit};

mod logging;
mod report;

use self::logging::log_stage;
pub use self::report::CheckReport;

/// Knobs for one `check` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Fan declarations out across the rayon pool.
    pub parallel: bool,
    /// Emit a `pipeline` event after every stage.
    pub trace_pipeline: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            trace_pipeline: false,
        }
    }
}

/// Whether stage events should be emitted for a run at `level`.
///
/// `CHIC_TRACE_PIPELINE` overrides the level when set.
#[must_use]
pub fn resolve_trace_enabled(request_flag: bool, level: LogLevel) -> bool {
    if request_flag {
        return true;
    }
    if let Some(value) = env_flag_truthy("CHIC_TRACE_PIPELINE") {
        return value;
    }
    level >= LogLevel::Info
}

fn env_flag_truthy(name: &str) -> Option<bool> {
    env::var_os(name).map(|value| {
        let lower = value.to_string_lossy().trim().to_ascii_lowercase();
        !matches!(lower.as_str(), "0" | "false" | "off" | "no" | "disable")
    })
}

/// Coordinates the resolution passes over one source file.
#[derive(Debug, Clone, Default)]
pub struct CompilerDriver;

impl CompilerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read `path` and check it.
    ///
    /// # Errors
    ///
    /// Returns I/O failures reading the file and fatal parse errors.
    pub fn check_file(&self, path: &Path, options: &CheckOptions) -> Result<CheckReport> {
        let source = fs::read_to_string(path)?;
        self.check_source(path, &source, options)
    }

    /// Parse, resolve captures, build the type table and check every body.
    ///
    /// Semantic problems end up in [`CheckReport::diagnostics`]; only syntax
    /// errors abort the run.
    ///
    /// # Errors
    ///
    /// Returns a parse error, carrying its rendered source, when the unit has
    /// syntax errors.
    pub fn check_source(
        &self,
        path: &Path,
        source: &str,
        options: &CheckOptions,
    ) -> Result<CheckReport> {
        let trace = options.trace_pipeline;
        let check_start = Instant::now();
        if trace {
            tracing::info!(
                target: "pipeline",
                stage = "driver.check.start",
                command = "check",
                status = "start",
                path = %path.display(),
                parallel = options.parallel
            );
        }

        let mut files = FileCache::default();
        let file_id = files.add_file(path, source);

        let start = Instant::now();
        let parsed = parse_unit_in_file(source, file_id)
            .map_err(|err| err.with_file(path, source))?;
        log_stage(trace, "frontend.parse", path, start, parsed.diagnostics.len());

        let start = Instant::now();
        let captured = capture::resolve_unit(&parsed.unit, options.parallel);
        log_stage(trace, "resolve.capture", path, start, captured.diagnostics.len());

        let start = Instant::now();
        let (table, declaration_diagnostics) = TypeTable::build(&captured.unit);
        log_stage(trace, "typeck.declarations", path, start, declaration_diagnostics.len());

        let start = Instant::now();
        let bodies = check_unit(&captured.unit, &table, options.parallel);
        log_stage(trace, "typeck.bodies", path, start, bodies.diagnostics.len());

        let mut diagnostics = parsed.diagnostics;
        diagnostics.extend(captured.diagnostics);
        diagnostics.extend(declaration_diagnostics);
        diagnostics.extend(bodies.diagnostics);

        let report = CheckReport {
            input: PathBuf::from(path),
            files,
            unit: captured.unit,
            declarations: captured.types,
            navigation: bodies.navigation,
            lowered: bodies.lowered,
            diagnostics,
        };
        if trace {
            tracing::info!(
                target: "pipeline",
                stage = "driver.check.complete",
                command = "check",
                status = if report.has_errors() { "error" } else { "ok" },
                path = %path.display(),
                declarations = report.declarations.len(),
                chains = report.navigation.len(),
                diagnostics = report.diagnostics.len(),
                elapsed_ms = check_start.elapsed().as_millis() as u64
            );
        }
        Ok(report)
    }
}
