use std::path::Path;

use tracing::debug;

use crate::{error::DispatchError, git};

/// Returns `git_ref` if given, or the branch checked out in the working copy at `root`.
///
/// # Errors
///
/// Returns [`DispatchError::Git`] if the branch lookup is needed and fails, for example on a detached `HEAD`.
pub async fn resolve_ref(git_ref: Option<String>, root: &Path) -> Result<String, DispatchError> {
    match git_ref {
        Some(git_ref) => Ok(git_ref),
        None => {
            let branch = git::current_branch(root).await?;
            debug!("using current branch {branch}");
            Ok(branch)
        }
    }
}
