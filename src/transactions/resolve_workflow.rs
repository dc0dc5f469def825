use tracing::info;

use crate::{
    error::DispatchError,
    prompt::Prompt,
    workflow::{Workflow, find_workflow},
};

/// Resolves the workflow to dispatch, by `query` if given, or by asking through `prompt`.
///
/// See: [`find_workflow`]
///
/// # Errors
///
/// Returns [`DispatchError::WorkflowNotFound`] if nothing matches `query`, [`DispatchError::NoWorkflows`] if there is
/// nothing to choose from, or the error of the prompt.
pub async fn resolve_workflow<'a, P>(
    workflows: &'a [Workflow],
    query: Option<&str>,
    prompt: &P,
) -> Result<&'a Workflow, DispatchError>
where
    P: Prompt + Sync,
{
    let workflow = match query {
        Some(query) => find_workflow(workflows, query)
            .ok_or_else(|| DispatchError::WorkflowNotFound(query.to_owned()))?,
        None => {
            if workflows.is_empty() {
                return Err(DispatchError::NoWorkflows);
            }

            let names = workflows.iter().map(|workflow| workflow.name.clone()).collect();
            let index = prompt.select("Select a workflow to dispatch", names).await?;
            workflows.get(index).ok_or(DispatchError::NoWorkflows)?
        }
    };

    info!("resolved workflow {workflow}");
    Ok(workflow)
}
