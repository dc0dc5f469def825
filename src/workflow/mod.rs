//! Data models of GitHub Actions workflows.

#![cfg(feature = "workflow")]

use std::{cmp::Ordering, fmt::Display, path::Path, str::FromStr};

use futures::{StreamExt as _, future, stream};
use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Deserialize;
use tracing::debug;

use crate::error::DispatchError;

pub mod api;

/// The directory GitHub reads workflow files from.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Represents a repository on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// The account owning the repository.
    pub owner: String,
    /// The name of the repository.
    pub name: String,
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for Repository {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(DispatchError::InvalidRepository(s.to_owned())),
        }
    }
}

/// Represents workflows from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct Workflows {
    /// The number of workflows across all pages.
    pub total_count: u32,
    /// The workflows of the current page.
    pub workflows: Vec<Workflow>,
}

/// Represents a GitHub Actions workflow from GitHub REST API.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Workflow {
    /// The unique identifier assigned by GitHub.
    pub id: u64,
    /// The name declared in the workflow file.
    #[serde(default)]
    pub name: String,
    /// The path of the workflow file relative to the repository root.
    #[serde(default)]
    pub path: String,
    /// Whether the workflow can run.
    pub state: WorkflowState,
}

/// The state of a [`Workflow`].
#[non_exhaustive]
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// The workflow can run.
    Active,
    /// The workflow file was removed.
    Deleted,
    /// The workflow belongs to a fork and is disabled there.
    DisabledFork,
    /// The workflow was disabled after a period without activity.
    DisabledInactivity,
    /// The workflow was disabled by a user.
    DisabledManually,
    /// A state this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} at {})", self.name, self.id, self.path)
    }
}

impl Workflow {
    /// Checks the remote part of eligibility: a name, a path and an active state.
    pub fn is_listable(&self) -> bool {
        !self.name.is_empty() && !self.path.is_empty() && self.state == WorkflowState::Active
    }

    /// Checks whether the workflow file exists under `root`. I/O errors count as absence.
    pub async fn exists_in(&self, root: &Path) -> bool {
        tokio::fs::try_exists(root.join(&self.path))
            .await
            .unwrap_or(false)
    }

    /// Matches a query against the name, the conventional path or the id, ignoring case.
    ///
    /// `query` must already be lowercase.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase() == query
            || self.path.to_lowercase() == format!("{WORKFLOWS_DIR}/{query}.yml")
            || query.parse::<u64>().is_ok_and(|id| id == self.id)
    }

    fn order(&self, other: &Self, collator: Option<&Collator>) -> Ordering {
        compare_names(collator, &self.name, &other.name)
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Keeps the eligible workflows and sorts them by name.
///
/// The existence of every workflow file is checked concurrently, with at most `concurrency` checks in flight.
pub async fn filter_eligible(
    workflows: Vec<Workflow>,
    root: &Path,
    concurrency: usize,
) -> Vec<Workflow> {
    let checks = workflows
        .into_iter()
        .filter(Workflow::is_listable)
        .map(|workflow| async move {
            if workflow.exists_in(root).await {
                Some(workflow)
            } else {
                debug!("skipping {workflow}: not found under {}", root.display());
                None
            }
        });

    let mut eligible: Vec<Workflow> = stream::iter(checks)
        .buffer_unordered(concurrency.max(1))
        .filter_map(future::ready)
        .collect()
        .await;

    let collator = name_collator();
    eligible.sort_by(|a, b| a.order(b, collator.as_ref()));
    eligible
}

/// Builds a root-locale collator at tertiary strength, so case only breaks ties and lowercase sorts first.
fn name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            debug!("collator unavailable, comparing lowercased names: {err}");
            None
        }
    }
}

fn compare_names(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        // Lowercase first on ties, like the collator.
        None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a)),
    }
}

/// Finds the first workflow matching `query`, ignoring case.
///
/// See: [`Workflow::matches`]
pub fn find_workflow<'a>(workflows: &'a [Workflow], query: &str) -> Option<&'a Workflow> {
    let query = query.to_lowercase();
    workflows.iter().find(|workflow| workflow.matches(&query))
}
