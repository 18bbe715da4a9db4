//! Shared fixtures for command and event tests.

use async_trait::async_trait;
use slashbot_github::auth::InstallationId;
use slashbot_github::client::{
    CombinedStatus, CommitStatus, Issue, IssueUser, Label, MergePullRequestRequest, MergeResult,
    PullRequest, PullRequestBranch, Repository, RepositoryClientProvider, RepositoryOperations,
    RepositoryOwner, RepositoryRef, Workflow,
};
use slashbot_github::{ApiError, AuthError};
use std::sync::{Arc, Mutex};

/// Repository operations recorded by [`MockRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetRepository,
    GetPullRequest(u64),
    GetIssue(u64),
    ListWorkflows,
    TriggerWorkflow { workflow_id: u64, git_ref: String },
    GetCombinedStatus(String),
    MergePullRequest { number: u64, request: MergePullRequestRequest },
    CreateComment { number: u64, body: String },
}

/// In-memory repository recording every call.
pub struct MockRepository {
    pub calls: Mutex<Vec<Call>>,
    pub pull_request: Mutex<Option<PullRequest>>,
    pub issue: Mutex<Option<Issue>>,
    pub workflows: Mutex<Vec<Workflow>>,
    pub trigger_accepted: Mutex<bool>,
    pub combined_status: Mutex<CombinedStatus>,
    pub merge_result: Mutex<MergeResult>,
    pub fail_workflow_listing: Mutex<bool>,
    pub fail_comments: Mutex<bool>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            pull_request: Mutex::new(Some(pull_request(7))),
            issue: Mutex::new(Some(issue(12))),
            workflows: Mutex::new(vec![
                workflow(101, "Build", ".github/workflows/build.yml"),
                workflow(102, "CI", ".github/workflows/ci.yml"),
            ]),
            trigger_accepted: Mutex::new(true),
            combined_status: Mutex::new(combined_status("success")),
            merge_result: Mutex::new(MergeResult {
                merged: true,
                sha: Some("6dcb09b5".to_string()),
                message: "Pull Request successfully merged".to_string(),
            }),
            fail_workflow_listing: Mutex::new(false),
            fail_comments: Mutex::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies of all posted comments, in order.
    pub fn comments(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateComment { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn merge_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::MergePullRequest { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RepositoryOperations for MockRepository {
    async fn get_repository(&self, _repo: &RepositoryRef) -> Result<Repository, ApiError> {
        self.record(Call::GetRepository);
        Ok(repository())
    }

    async fn get_pull_request(
        &self,
        _repo: &RepositoryRef,
        number: u64,
    ) -> Result<PullRequest, ApiError> {
        self.record(Call::GetPullRequest(number));
        let mut pull_request = self
            .pull_request
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::NotFound)?;
        pull_request.number = number;
        Ok(pull_request)
    }

    async fn get_issue(&self, _repo: &RepositoryRef, number: u64) -> Result<Issue, ApiError> {
        self.record(Call::GetIssue(number));
        let mut issue = self.issue.lock().unwrap().clone().ok_or(ApiError::NotFound)?;
        issue.number = number;
        Ok(issue)
    }

    async fn list_workflows(&self, _repo: &RepositoryRef) -> Result<Vec<Workflow>, ApiError> {
        self.record(Call::ListWorkflows);
        if *self.fail_workflow_listing.lock().unwrap() {
            return Err(ApiError::HttpError {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(self.workflows.lock().unwrap().clone())
    }

    async fn trigger_workflow(
        &self,
        _repo: &RepositoryRef,
        workflow_id: u64,
        git_ref: &str,
    ) -> Result<bool, ApiError> {
        self.record(Call::TriggerWorkflow {
            workflow_id,
            git_ref: git_ref.to_string(),
        });
        Ok(*self.trigger_accepted.lock().unwrap())
    }

    async fn get_combined_status(
        &self,
        _repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CombinedStatus, ApiError> {
        self.record(Call::GetCombinedStatus(sha.to_string()));
        Ok(self.combined_status.lock().unwrap().clone())
    }

    async fn merge_pull_request(
        &self,
        _repo: &RepositoryRef,
        number: u64,
        request: &MergePullRequestRequest,
    ) -> Result<MergeResult, ApiError> {
        self.record(Call::MergePullRequest {
            number,
            request: request.clone(),
        });
        Ok(self.merge_result.lock().unwrap().clone())
    }

    async fn create_comment(
        &self,
        _repo: &RepositoryRef,
        issue_number: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        self.record(Call::CreateComment {
            number: issue_number,
            body: body.to_string(),
        });
        if *self.fail_comments.lock().unwrap() {
            return Err(ApiError::AuthorizationFailed);
        }
        Ok(())
    }
}

/// Client provider handing out one shared [`MockRepository`].
pub struct MockClientProvider {
    pub repository: Arc<MockRepository>,
    pub requested: Mutex<Vec<InstallationId>>,
    pub fail: bool,
}

impl MockClientProvider {
    pub fn new(repository: Arc<MockRepository>) -> Self {
        Self {
            repository,
            requested: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing(repository: Arc<MockRepository>) -> Self {
        Self {
            fail: true,
            ..Self::new(repository)
        }
    }

    pub fn requested(&self) -> Vec<InstallationId> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryClientProvider for MockClientProvider {
    async fn for_installation(
        &self,
        installation_id: InstallationId,
    ) -> Result<Arc<dyn RepositoryOperations>, AuthError> {
        self.requested.lock().unwrap().push(installation_id);
        if self.fail {
            return Err(AuthError::IdentityExchange {
                installation_id,
                source: ApiError::AuthenticationFailed,
            });
        }
        Ok(self.repository.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn repository() -> Repository {
    Repository {
        id: 1296269,
        name: "hello-world".to_string(),
        full_name: "octocat/hello-world".to_string(),
        owner: RepositoryOwner {
            login: "octocat".to_string(),
            id: 1,
        },
        private: false,
        default_branch: "main".to_string(),
        html_url: "https://github.com/octocat/hello-world".to_string(),
    }
}

pub fn pull_request(number: u64) -> PullRequest {
    PullRequest {
        number,
        title: "Add feature".to_string(),
        state: "open".to_string(),
        user: IssueUser {
            login: "alice".to_string(),
            id: 10,
            account_type: Some("User".to_string()),
        },
        head: PullRequestBranch {
            branch_ref: "feature".to_string(),
            sha: "deadbeef".to_string(),
        },
        draft: false,
        merged: false,
        mergeable: Some(true),
        changed_files: 3,
        additions: 40,
        deletions: 2,
        html_url: String::new(),
    }
}

pub fn issue(number: u64) -> Issue {
    Issue {
        number,
        title: "Crash on start".to_string(),
        body: None,
        state: "open".to_string(),
        user: IssueUser {
            login: "bob".to_string(),
            id: 2,
            account_type: Some("User".to_string()),
        },
        labels: vec![
            Label {
                name: "bug".to_string(),
                color: "d73a4a".to_string(),
            },
            Label {
                name: "p1".to_string(),
                color: String::new(),
            },
        ],
        comments: 4,
        html_url: String::new(),
    }
}

pub fn workflow(id: u64, name: &str, path: &str) -> Workflow {
    Workflow {
        id,
        name: name.to_string(),
        path: path.to_string(),
        state: "active".to_string(),
    }
}

pub fn combined_status(state: &str) -> CombinedStatus {
    CombinedStatus {
        state: state.to_string(),
        sha: "deadbeef".to_string(),
        statuses: vec![
            CommitStatus {
                context: "ci/build".to_string(),
                state: "success".to_string(),
                description: None,
            },
            CommitStatus {
                context: "ci/test".to_string(),
                state: state.to_string(),
                description: None,
            },
        ],
    }
}
