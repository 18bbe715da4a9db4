use super::*;
use crate::test_support::{issue, pull_request, repository, MockRepository};

#[test]
fn test_from_parts() {
    let pr = EventContext::from_parts(Some(pull_request(7)), None).unwrap();
    assert_eq!(pr.number(), Some(7));
    assert_eq!(pr.kind(), "PR");
    assert!(pr.pull_request().is_some());

    let issue_context = EventContext::from_parts(None, Some(issue(12))).unwrap();
    assert_eq!(issue_context.number(), Some(12));
    assert_eq!(issue_context.kind(), "issue");
    assert!(issue_context.pull_request().is_none());

    let none = EventContext::from_parts(None, None).unwrap();
    assert_eq!(none, EventContext::None);
    assert_eq!(none.number(), None);
}

#[test]
fn test_from_parts_rejects_both() {
    let result = EventContext::from_parts(Some(pull_request(7)), Some(issue(12)));

    assert!(matches!(result, Err(DispatchError::InvalidContext { .. })));
}

#[test]
fn test_settings_default_workflow() {
    assert_eq!(CommandSettings::default().default_workflow, "ci.yml");

    let parsed: CommandSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, CommandSettings::default());
}

#[test]
fn test_command_context_derives_repository_ref() {
    let repository = repository();
    let event = EventContext::None;
    let operations = MockRepository::new();
    let settings = CommandSettings::default();

    let ctx = CommandContext::new(&repository, &event, &operations, &settings);

    assert_eq!(ctx.repo, RepositoryRef::new("octocat", "hello-world"));
}
