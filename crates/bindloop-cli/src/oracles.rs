//! Structure-prediction and sequence-design tools driven through rendered shell scripts.

pub mod colabfold;
pub mod mpnn;
pub mod template;

use bindloop::engine::error::OracleError;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

pub(crate) fn io_error(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> OracleError {
    let context = context.into();
    move |source| OracleError::Io { context, source }
}

/// Writes `script` to `<dir>/command.sh`, marks it executable and runs it to completion.
pub(crate) fn run_script(dir: &Path, script: &str, oracle: &'static str) -> Result<(), OracleError> {
    fs::create_dir_all(dir).map_err(io_error(format!("Failed to create {}", dir.display())))?;
    let script_path = dir.join("command.sh");
    fs::write(&script_path, script)
        .map_err(io_error(format!("Failed to write {}", script_path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))
            .map_err(io_error(format!("Failed to make {} executable", script_path.display())))?;
    }

    info!(script = %script_path.display(), "Running {}.", oracle);
    let status = Command::new(&script_path)
        .status()
        .map_err(io_error(format!("Failed to execute {}", script_path.display())))?;
    debug!(%status, "{} finished.", oracle);

    if !status.success() {
        return Err(OracleError::ExitStatus { oracle, status });
    }
    Ok(())
}
