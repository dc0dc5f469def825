//! Queries the local git working copy.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::error::DispatchError;

async fn run_git(dir: &Path, args: &[&str]) -> Result<String, DispatchError> {
    debug!("running git {args:?} in {}…", dir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|err| DispatchError::Git(format!("{args:?} could not be started: {err}")))?;

    if !output.status.success() {
        return Err(DispatchError::Git(format!(
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

/// Returns the name of the branch checked out in `dir`.
///
/// # Errors
///
/// Returns [`DispatchError::Git`] if `dir` is not a git working copy or no branch is checked out.
pub async fn current_branch(dir: &Path) -> Result<String, DispatchError> {
    run_git(dir, &["symbolic-ref", "--short", "HEAD"]).await
}
