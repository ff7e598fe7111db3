//! Invocation of the external alias analysis
//!
//! One blocking, out-of-process step that is expected to produce or refresh
//! the fact database before the resolver reads it. Failure of any kind means
//! "no additional facts" and is never fatal.

use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

/// Run the collaborator analysis command in `work_dir`, blocking until it
/// exits. Returns whether it completed successfully.
pub fn run_analysis(command: &str, work_dir: &Path) -> bool {
    info!(command, "invoking external alias analysis");
    match Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(work_dir)
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!(command, %status, "alias analysis exited nonzero; continuing without facts");
            false
        }
        Err(e) => {
            warn!(command, error = %e, "alias analysis could not be started; continuing without facts");
            false
        }
    }
}
