//! GitHub Actions workflow types and operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{InstallationClient, RepositoryRef};
use crate::error::ApiError;

/// GitHub Actions workflow definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    /// Path of the workflow file, e.g. `.github/workflows/ci.yml`
    pub path: String,
    #[serde(default)]
    pub state: String, // "active", "disabled_manually", "disabled_inactivity"
}

impl Workflow {
    /// A workflow matches when its path ends with `name` or its display name
    /// equals `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.path.ends_with(name) || self.name == name
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowList {
    #[serde(default)]
    workflows: Vec<Workflow>,
}

/// Request body for a `workflow_dispatch` trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerWorkflowRequest {
    #[serde(rename = "ref")]
    pub git_ref: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<std::collections::HashMap<String, String>>,
}

impl InstallationClient {
    /// List the repository's workflows in GitHub's listing order.
    pub async fn list_workflows(&self, repo: &RepositoryRef) -> Result<Vec<Workflow>, ApiError> {
        let path = format!(
            "repos/{}/{}/actions/workflows?per_page=100",
            repo.owner, repo.name
        );
        let request = self.authorized(Method::GET, &path).await?;
        let list: WorkflowList = self.client().send_json(request).await?;
        Ok(list.workflows)
    }

    /// Trigger a `workflow_dispatch` run on `git_ref`.
    ///
    /// GitHub answers 204 when the dispatch is accepted.
    pub async fn trigger_workflow(
        &self,
        repo: &RepositoryRef,
        workflow_id: u64,
        git_ref: &str,
    ) -> Result<bool, ApiError> {
        let path = format!(
            "repos/{}/{}/actions/workflows/{}/dispatches",
            repo.owner, repo.name, workflow_id
        );
        let request = self
            .authorized(Method::POST, &path)
            .await?
            .json(&TriggerWorkflowRequest {
                git_ref: git_ref.to_string(),
                inputs: None,
            });

        let response = self.client().send(request).await?;
        Ok(response.status() == reqwest::StatusCode::NO_CONTENT)
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
