use std::{collections::BTreeMap, path::PathBuf};

use tracing::{error, info};

use crate::{
    error::DispatchError,
    prompt::Prompt,
    transactions::{fetch_workflows, resolve_ref, resolve_workflow},
    workflow::{
        Repository,
        api::{DispatchRequest, WorkflowApi},
    },
};

/// Where and how a workflow is dispatched.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// The repository owning the workflows.
    pub repository: Repository,
    /// The root of the local working copy.
    pub root: PathBuf,
    /// Whether the user can be prompted.
    pub interactive: bool,
    /// The maximum number of concurrent workflow file checks.
    pub concurrency: usize,
}

/// What to dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// The name, id or file slug of the workflow. The user is prompted if absent.
    pub workflow: Option<String>,
    /// The branch, tag or commit to run on. The current branch is used if absent.
    pub git_ref: Option<String>,
    /// The inputs of the workflow.
    pub inputs: BTreeMap<String, String>,
}

/// Parses a workflow input in the `key=value` form.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidInput`] if there is no `=` or the key is empty.
pub fn parse_input(input: &str) -> Result<(String, String), DispatchError> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(DispatchError::InvalidInput(input.to_owned())),
    }
}

/// Dispatches a workflow with the GitHub token and the prompting mode from `config`, prompting in the terminal.
///
/// See: [`dispatch_workflow`]
///
/// # Errors
///
/// Returns [`DispatchError::MissingToken`] before any request if the token is not set, or any error of
/// [`dispatch_workflow`].
#[cfg(feature = "cli")]
pub async fn dispatch(
    config: &crate::env::Config,
    repository: Repository,
    root: PathBuf,
    options: DispatchOptions,
) -> Result<DispatchRequest, DispatchError> {
    use crate::{prompt::TerminalPrompt, workflow::api::GitHubClient};

    let api = GitHubClient::from_config(config)?;
    let context = DispatchContext {
        repository,
        root,
        interactive: config.interactive,
        concurrency: config.concurrency,
    };

    dispatch_workflow(&api, &TerminalPrompt, &context, options).await
}

/// Resolves a workflow and a reference, then dispatches the workflow on GitHub.
///
/// Nothing is created on GitHub before the final request, and nothing is retried.
///
/// # Errors
///
/// Returns [`DispatchError::NonInteractive`] before any request if no workflow is given and prompting is disabled,
/// [`DispatchError::Rejected`] if GitHub does not accept the dispatch, or the error of the failed stage.
pub async fn dispatch_workflow<A, P>(
    api: &A,
    prompt: &P,
    context: &DispatchContext,
    options: DispatchOptions,
) -> Result<DispatchRequest, DispatchError>
where
    A: WorkflowApi + Sync,
    P: Prompt + Sync,
{
    if options.workflow.is_none() && !context.interactive {
        return Err(DispatchError::NonInteractive);
    }

    let workflows = fetch_workflows(
        api,
        &context.repository,
        &context.root,
        context.concurrency,
    )
    .await?;
    let workflow = resolve_workflow(&workflows, options.workflow.as_deref(), prompt).await?;
    let git_ref = resolve_ref(options.git_ref, &context.root).await?;

    let request = DispatchRequest {
        workflow_id: workflow.id,
        git_ref,
        inputs: options.inputs,
    };
    let response = api.create_dispatch(&context.repository, &request).await?;

    if !response.is_accepted() {
        let serialized = serde_json::to_string_pretty(&response)
            .unwrap_or_else(|err| format!("{response:?} (not serializable: {err})"));
        error!("failed to dispatch workflow {workflow}:\n{serialized}");
        return Err(DispatchError::Rejected {
            status: response.status,
        });
    }

    info!(
        "successfully dispatched workflow {workflow} on {}",
        request.git_ref
    );
    Ok(request)
}
