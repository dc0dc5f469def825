//! Errors raised while dispatching a workflow.

use std::io;

use thiserror::Error;

/// Errors that can occur when dispatching a workflow.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The GitHub token is not set.
    #[error("GITHUB_TOKEN is required to dispatch workflows, create one at https://github.com/settings/tokens")]
    MissingToken,

    /// A workflow has to be selected, but prompting is disabled.
    #[error("a workflow name must be provided when running in a non-interactive environment")]
    NonInteractive,

    /// The repository is not in the `owner/name` form.
    #[error("invalid repository {0:?}, expected owner/name")]
    InvalidRepository(String),

    /// A workflow input is not in the `key=value` form.
    #[error("invalid workflow input {0:?}, expected key=value")]
    InvalidInput(String),

    /// No eligible workflow matches the given name or id.
    #[error("unable to find workflow with id or name: {0}")]
    WorkflowNotFound(String),

    /// There are no eligible workflows to choose from.
    #[error("no dispatchable workflows found")]
    NoWorkflows,

    /// GitHub answered the dispatch request with something other than `204 No Content`.
    #[error("failed to dispatch workflow: {status}")]
    Rejected {
        /// The status code of the response.
        status: u16,
    },

    /// A request to GitHub failed or its response could not be read.
    #[error("request to GitHub failed")]
    Http(#[from] reqwest::Error),

    /// A `git` command failed.
    #[error("git {0}")]
    Git(String),

    /// An I/O error.
    #[error("I/O error")]
    Io(#[from] io::Error),

    /// The interactive prompt failed.
    #[cfg(feature = "cli")]
    #[error("prompt failed")]
    Prompt(#[from] dialoguer::Error),

    /// A blocking task could not be joined.
    #[error("background task failed")]
    Join(#[from] tokio::task::JoinError),
}
