use std::path::Path;

use tracing::{debug, info};

use crate::{
    error::DispatchError,
    workflow::{
        Repository, Workflow,
        api::WorkflowApi,
        filter_eligible,
    },
};

/// Fetches the workflows of a repository that can be dispatched from the working copy at `root`, sorted by name.
///
/// See: [`filter_eligible`]
///
/// # Errors
///
/// Returns an error if listing the workflows fails.
pub async fn fetch_workflows<A>(
    api: &A,
    repository: &Repository,
    root: &Path,
    concurrency: usize,
) -> Result<Vec<Workflow>, DispatchError>
where
    A: WorkflowApi + Sync,
{
    let workflows = api.list_workflows(repository).await?;
    let total = workflows.len();

    debug!("checking {total} workflows against {}…", root.display());
    let eligible = filter_eligible(workflows, root, concurrency).await;
    info!(
        "{} of {total} workflows of {repository} can be dispatched",
        eligible.len()
    );

    Ok(eligible)
}
