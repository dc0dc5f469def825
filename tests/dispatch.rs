use std::{collections::BTreeMap, fs, path::Path};

use parking_lot::Mutex;
use tempfile::TempDir;

use workflow_dispatch::{
    DispatchError,
    prompt::Prompt,
    transactions::{DispatchContext, DispatchOptions, dispatch_workflow, fetch_workflows},
    workflow::{
        Repository, Workflow, WorkflowState,
        api::{DispatchRequest, DispatchResponse, WorkflowApi},
    },
};

/// Serves a fixed listing and answers every dispatch with a fixed status, recording every call.
struct FakeApi {
    workflows: Vec<Workflow>,
    status: u16,
    listings: Mutex<u32>,
    dispatches: Mutex<Vec<DispatchRequest>>,
}

impl FakeApi {
    fn new(workflows: Vec<Workflow>, status: u16) -> Self {
        Self {
            workflows,
            status,
            listings: Mutex::new(0),
            dispatches: Mutex::new(Vec::new()),
        }
    }
}

impl WorkflowApi for FakeApi {
    async fn list_workflows(&self, _: &Repository) -> Result<Vec<Workflow>, DispatchError> {
        *self.listings.lock() += 1;
        Ok(self.workflows.clone())
    }

    async fn create_dispatch(
        &self,
        repository: &Repository,
        request: &DispatchRequest,
    ) -> Result<DispatchResponse, DispatchError> {
        self.dispatches.lock().push(request.clone());
        Ok(DispatchResponse {
            status: self.status,
            url: format!(
                "https://api.github.com/repos/{repository}/actions/workflows/{}/dispatches",
                request.workflow_id
            ),
            headers: BTreeMap::new(),
            body: if self.status == 204 {
                String::new()
            } else {
                r#"{"message":"Not Found"}"#.to_owned()
            },
        })
    }
}

/// Answers with a fixed index, recording the offered items.
struct FakePrompt {
    answer: usize,
    offered: Mutex<Option<Vec<String>>>,
}

impl FakePrompt {
    fn answering(answer: usize) -> Self {
        Self {
            answer,
            offered: Mutex::new(None),
        }
    }
}

impl Prompt for FakePrompt {
    async fn select(&self, _: &str, items: Vec<String>) -> Result<usize, DispatchError> {
        *self.offered.lock() = Some(items);
        Ok(self.answer)
    }
}

fn workflow(id: u64, name: &str, file: &str) -> Workflow {
    Workflow {
        id,
        name: name.to_owned(),
        path: format!(".github/workflows/{file}"),
        state: WorkflowState::Active,
    }
}

fn build_and_test() -> Vec<Workflow> {
    vec![
        workflow(2, "Test", "test.yml"),
        workflow(1, "Build", "build.yml"),
    ]
}

fn working_copy(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();
    for file in files {
        fs::write(
            dir.path().join(".github/workflows").join(file),
            "on: workflow_dispatch\n",
        )
        .unwrap();
    }
    dir
}

fn context(root: &Path, interactive: bool) -> DispatchContext {
    DispatchContext {
        repository: "expo/expo".parse().unwrap(),
        root: root.to_owned(),
        interactive,
        concurrency: 4,
    }
}

fn options(workflow: Option<&str>, git_ref: Option<&str>) -> DispatchOptions {
    DispatchOptions {
        workflow: workflow.map(str::to_owned),
        git_ref: git_ref.map(str::to_owned),
        inputs: BTreeMap::new(),
    }
}

#[tokio::test]
async fn lists_eligible_workflows_sorted() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);

    let workflows = fetch_workflows(&api, &"expo/expo".parse::<Repository>().unwrap(), root.path(), 4)
        .await
        .unwrap();

    let names: Vec<&str> = workflows.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Build", "Test"]);
}

#[tokio::test]
async fn dispatches_by_name() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);
    let prompt = FakePrompt::answering(0);

    let request = dispatch_workflow(
        &api,
        &prompt,
        &context(root.path(), true),
        options(Some("test"), Some("main")),
    )
    .await
    .unwrap();

    assert_eq!(request.workflow_id, 2);
    assert_eq!(request.git_ref, "main");
    assert_eq!(*api.dispatches.lock(), [request]);
    assert!(prompt.offered.lock().is_none());
}

#[tokio::test]
async fn dispatches_by_path_slug_with_inputs() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);
    let mut options = options(Some("BUILD"), Some("sdk-52"));
    options
        .inputs
        .insert("platform".to_owned(), "android".to_owned());

    let request = dispatch_workflow(
        &api,
        &FakePrompt::answering(0),
        &context(root.path(), true),
        options,
    )
    .await
    .unwrap();

    assert_eq!(request.workflow_id, 1);
    assert_eq!(request.inputs["platform"], "android");
}

#[tokio::test]
async fn rejected_dispatch_fails() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 404);

    let result = dispatch_workflow(
        &api,
        &FakePrompt::answering(0),
        &context(root.path(), true),
        options(Some("test"), Some("main")),
    )
    .await;

    assert!(matches!(
        result,
        Err(DispatchError::Rejected { status: 404 })
    ));
    assert_eq!(api.dispatches.lock().len(), 1);
}

#[tokio::test]
async fn unknown_workflow_is_not_found() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);

    let result = dispatch_workflow(
        &api,
        &FakePrompt::answering(0),
        &context(root.path(), true),
        options(Some("deploy"), Some("main")),
    )
    .await;

    match result {
        Err(DispatchError::WorkflowNotFound(query)) => assert_eq!(query, "deploy"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(api.dispatches.lock().is_empty());
}

#[tokio::test]
async fn workflow_missing_locally_is_not_found() {
    let root = working_copy(&["build.yml"]);
    let api = FakeApi::new(build_and_test(), 204);

    let result = dispatch_workflow(
        &api,
        &FakePrompt::answering(0),
        &context(root.path(), true),
        options(Some("test"), Some("main")),
    )
    .await;

    assert!(matches!(result, Err(DispatchError::WorkflowNotFound(_))));
    assert!(api.dispatches.lock().is_empty());
}

#[tokio::test]
async fn prompts_when_no_name_is_given() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);
    let prompt = FakePrompt::answering(1);

    let request = dispatch_workflow(
        &api,
        &prompt,
        &context(root.path(), true),
        options(None, Some("main")),
    )
    .await
    .unwrap();

    assert_eq!(request.workflow_id, 2);
    assert_eq!(
        prompt.offered.lock().as_deref(),
        Some(&["Build".to_owned(), "Test".to_owned()][..])
    );
}

#[tokio::test]
async fn non_interactive_without_name_fails_before_listing() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);
    let prompt = FakePrompt::answering(0);

    let result = dispatch_workflow(
        &api,
        &prompt,
        &context(root.path(), false),
        options(None, Some("main")),
    )
    .await;

    assert!(matches!(result, Err(DispatchError::NonInteractive)));
    assert_eq!(*api.listings.lock(), 0);
    assert!(prompt.offered.lock().is_none());
}

#[tokio::test]
async fn non_interactive_with_name_dispatches() {
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);

    let request = dispatch_workflow(
        &api,
        &FakePrompt::answering(0),
        &context(root.path(), false),
        options(Some("Build"), Some("main")),
    )
    .await
    .unwrap();

    assert_eq!(request.workflow_id, 1);
}

#[tokio::test]
async fn nothing_to_prompt_for() {
    let root = working_copy(&[]);
    let api = FakeApi::new(build_and_test(), 204);
    let prompt = FakePrompt::answering(0);

    let result = dispatch_workflow(
        &api,
        &prompt,
        &context(root.path(), true),
        options(None, Some("main")),
    )
    .await;

    assert!(matches!(result, Err(DispatchError::NoWorkflows)));
    assert!(prompt.offered.lock().is_none());
}

#[tokio::test]
async fn branch_lookup_failure_stops_before_dispatch() {
    // The temporary directory is not a git working copy.
    let root = working_copy(&["build.yml", "test.yml"]);
    let api = FakeApi::new(build_and_test(), 204);

    let result = dispatch_workflow(
        &api,
        &FakePrompt::answering(0),
        &context(root.path(), true),
        options(Some("test"), None),
    )
    .await;

    assert!(matches!(result, Err(DispatchError::Git(_))));
    assert!(api.dispatches.lock().is_empty());
}
