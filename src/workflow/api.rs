//! Workflow endpoints of GitHub REST API.

use std::{collections::BTreeMap, fmt::Debug};

use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    env::Config,
    error::DispatchError,
    static_lazy_lock,
    workflow::{Repository, Workflow, Workflows},
};

/// The page size used when listing workflows.
pub const PER_PAGE: u32 = 100;

static_lazy_lock! {
    /// The HTTP client shared by every request.
    HTTP: reqwest::Client = reqwest::Client::new();
}

/// The workflow endpoints needed to dispatch a workflow.
pub trait WorkflowApi {
    /// Lists every workflow of `repository`.
    fn list_workflows(
        &self,
        repository: &Repository,
    ) -> impl Future<Output = Result<Vec<Workflow>, DispatchError>> + Send;

    /// Creates a `workflow_dispatch` event for a workflow.
    ///
    /// The response is returned whatever its status is.
    fn create_dispatch(
        &self,
        repository: &Repository,
        request: &DispatchRequest,
    ) -> impl Future<Output = Result<DispatchResponse, DispatchError>> + Send;
}

/// A request to dispatch a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// The identifier of the workflow.
    pub workflow_id: u64,
    /// The branch, tag or commit to run the workflow on.
    pub git_ref: String,
    /// The inputs of the workflow.
    pub inputs: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    inputs: &'a BTreeMap<String, String>,
}

/// A response to a dispatch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResponse {
    /// The status code.
    pub status: u16,
    /// The requested URL.
    pub url: String,
    /// The response headers.
    pub headers: BTreeMap<String, String>,
    /// The response body.
    pub body: String,
}

impl DispatchResponse {
    /// Checks whether GitHub accepted the dispatch, which it signals with `204 No Content`.
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::NO_CONTENT.as_u16()
    }

    async fn read(response: Response) -> Result<Self, DispatchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(Self {
            status,
            url,
            headers,
            body,
        })
    }
}

/// A client for GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    api_url: String,
    token: String,
}

impl Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Creates a [`GitHubClient`] for an API base URL.
    pub fn new<U, T>(api_url: U, token: T) -> Self
    where
        U: Into<String>,
        T: Into<String>,
    {
        Self {
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    /// Creates a [`GitHubClient`] from a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingToken`] if the config holds no token.
    pub fn from_config(config: &Config) -> Result<Self, DispatchError> {
        Ok(Self::new(&config.api_url, config.github_token()?))
    }

    /// Builds a request for GitHub REST API.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        HTTP.request(method, url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .bearer_auth(&self.token)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header(
                header::USER_AGENT,
                concat!("workflow-dispatch/", env!("CARGO_PKG_VERSION")),
            )
    }

    fn workflows_url(&self, repository: &Repository) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows",
            self.api_url, repository.owner, repository.name
        )
    }
}

impl WorkflowApi for GitHubClient {
    async fn list_workflows(&self, repository: &Repository) -> Result<Vec<Workflow>, DispatchError> {
        let url = self.workflows_url(repository);
        debug!("fetching workflows from {url}…");

        let mut workflows = Vec::new();
        for page in 1_u32.. {
            let listing = self
                .request(Method::GET, &url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?
                .error_for_status()?
                .json::<Workflows>()
                .await?;

            let fetched = listing.workflows.len();
            workflows.extend(listing.workflows);
            if fetched < PER_PAGE as usize || workflows.len() >= listing.total_count as usize {
                break;
            }
        }

        match workflows.len() {
            1 => info!("fetched 1 workflow from {url}"),
            count => info!("fetched {count} workflows from {url}"),
        }
        Ok(workflows)
    }

    async fn create_dispatch(
        &self,
        repository: &Repository,
        request: &DispatchRequest,
    ) -> Result<DispatchResponse, DispatchError> {
        let url = format!(
            "{}/{}/dispatches",
            self.workflows_url(repository),
            request.workflow_id
        );
        debug!("dispatching {} on {} at {url}…", request.workflow_id, request.git_ref);

        let response = self
            .request(Method::POST, &url)
            .json(&DispatchBody {
                git_ref: &request.git_ref,
                inputs: &request.inputs,
            })
            .send()
            .await?;

        DispatchResponse::read(response).await
    }
}
