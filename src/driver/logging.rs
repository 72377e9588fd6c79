use std::path::Path;
use std::time::Instant;

use tracing::info;

pub(super) fn log_stage(
    trace_enabled: bool,
    stage: &str,
    path: &Path,
    start: Instant,
    diagnostics: usize,
) {
    if trace_enabled {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            target: "pipeline",
            stage = stage,
            command = "check",
            status = "ok",
            path = %path.display(),
            diagnostics,
            elapsed_ms
        );
    }
}
