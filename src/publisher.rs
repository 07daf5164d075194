use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::error::Error;

/// Why one publish step failed. `Item` failures are transient and the
/// run continues; the other two abort the remaining items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    Auth(String),
    ListNotFound(String),
    Item(String),
}

impl PublishError {
    /// Map a client-level error onto the publish classification.
    pub fn from_api(error: Error) -> Self {
        match error {
            Error::PublishAuthFailed(msg) => PublishError::Auth(msg),
            other => PublishError::Item(other.to_string()),
        }
    }
}

/// The two remote calls publishing needs. The production implementation
/// is the GraphQL client; tests substitute their own.
pub trait ListApi {
    fn resolve_problem_id(&self, problem: &str) -> Result<String, PublishError>;
    fn add_to_list(&self, list_id: &str, question_id: &str) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Added,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedItem {
    pub slug: String,
    pub outcome: PublishOutcome,
}

/// Outcome of a whole publish run. Every attempted item appears in
/// `items`; `aborted` is set when a persistent failure stopped the run
/// before all items were attempted.
#[derive(Debug)]
pub struct PublishReport {
    pub items: Vec<PublishedItem>,
    pub aborted: Option<PublishError>,
}

impl PublishReport {
    pub fn added(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == PublishOutcome::Added)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.added()
    }
}

/// Push the ranked slugs into the remote list, in order. Transient
/// per-item failures are logged and recorded; an auth failure or a
/// missing list stops the run.
pub fn publish(
    api: &dyn ListApi,
    list_id: &str,
    slugs: &[String],
    delay: Duration,
) -> PublishReport {
    let mut report = PublishReport {
        items: Vec::with_capacity(slugs.len()),
        aborted: None,
    };

    for (index, slug) in slugs.iter().enumerate() {
        match publish_one(api, list_id, slug) {
            Ok(()) => {
                report.items.push(PublishedItem {
                    slug: slug.clone(),
                    outcome: PublishOutcome::Added,
                });
            }
            Err(PublishError::Item(reason)) => {
                warn!("failed to add '{}': {}", slug, reason);
                report.items.push(PublishedItem {
                    slug: slug.clone(),
                    outcome: PublishOutcome::Failed(reason),
                });
            }
            Err(fatal) => {
                warn!("aborting publish at '{}': {:?}", slug, fatal);
                report.items.push(PublishedItem {
                    slug: slug.clone(),
                    outcome: PublishOutcome::Failed(match &fatal {
                        PublishError::Auth(msg) => msg.clone(),
                        PublishError::ListNotFound(list) => format!("list '{}' not found", list),
                        PublishError::Item(msg) => msg.clone(),
                    }),
                });
                report.aborted = Some(fatal);
                break;
            }
        }

        if index + 1 < slugs.len() && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    info!(
        "publish run finished: {} added, {} failed",
        report.added(),
        report.failed()
    );
    report
}

fn publish_one(api: &dyn ListApi, list_id: &str, slug: &str) -> Result<(), PublishError> {
    let question_id = api.resolve_problem_id(slug)?;
    api.add_to_list(list_id, &question_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeApi {
        // slugs whose add call fails transiently
        flaky: Vec<String>,
        // slug that trips an auth failure
        auth_fail_at: Option<String>,
        missing_list: Option<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Self {
            FakeApi {
                flaky: vec![],
                auth_fail_at: None,
                missing_list: None,
                calls: RefCell::new(vec![]),
            }
        }
    }

    impl ListApi for FakeApi {
        fn resolve_problem_id(&self, problem: &str) -> Result<String, PublishError> {
            Ok(format!("id-{}", problem))
        }

        fn add_to_list(&self, list_id: &str, question_id: &str) -> Result<(), PublishError> {
            self.calls.borrow_mut().push(question_id.to_string());

            if let Some(missing) = &self.missing_list {
                if list_id == missing {
                    return Err(PublishError::ListNotFound(list_id.to_string()));
                }
            }
            if let Some(bad) = &self.auth_fail_at {
                if question_id == format!("id-{}", bad) {
                    return Err(PublishError::Auth("session expired".to_string()));
                }
            }
            if self.flaky.iter().any(|s| question_id == format!("id-{}", s)) {
                return Err(PublishError::Item("rate limited".to_string()));
            }
            Ok(())
        }
    }

    fn slugs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_items_added_in_ranked_order() {
        let api = FakeApi::new();
        let report = publish(&api, "list", &slugs(&["a", "b", "c"]), Duration::ZERO);

        assert_eq!(report.added(), 3);
        assert_eq!(report.failed(), 0);
        assert!(report.aborted.is_none());
        assert_eq!(*api.calls.borrow(), vec!["id-a", "id-b", "id-c"]);
    }

    #[test]
    fn transient_failure_skips_and_continues() {
        let mut api = FakeApi::new();
        api.flaky = vec!["b".to_string()];
        let report = publish(&api, "list", &slugs(&["a", "b", "c"]), Duration::ZERO);

        assert_eq!(report.added(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.aborted.is_none());
        assert_eq!(report.items[1].slug, "b");
        assert_eq!(
            report.items[1].outcome,
            PublishOutcome::Failed("rate limited".to_string())
        );
        // The failed item is still followed by the rest.
        assert_eq!(report.items.len(), 3);
    }

    #[test]
    fn auth_failure_aborts_remaining_items() {
        let mut api = FakeApi::new();
        api.auth_fail_at = Some("b".to_string());
        let report = publish(&api, "list", &slugs(&["a", "b", "c"]), Duration::ZERO);

        assert_eq!(report.added(), 1);
        assert_eq!(report.items.len(), 2);
        assert!(matches!(report.aborted, Some(PublishError::Auth(_))));
        // "c" was never attempted.
        assert_eq!(*api.calls.borrow(), vec!["id-a", "id-b"]);
    }

    #[test]
    fn missing_list_aborts_immediately() {
        let mut api = FakeApi::new();
        api.missing_list = Some("gone".to_string());
        let report = publish(&api, "gone", &slugs(&["a", "b"]), Duration::ZERO);

        assert_eq!(report.added(), 0);
        assert_eq!(report.items.len(), 1);
        assert!(matches!(report.aborted, Some(PublishError::ListNotFound(_))));
    }

    #[test]
    fn every_attempted_item_is_recorded() {
        let mut api = FakeApi::new();
        api.flaky = vec!["a".to_string(), "c".to_string()];
        let report = publish(&api, "list", &slugs(&["a", "b", "c", "d"]), Duration::ZERO);

        let recorded: Vec<&str> = report.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(recorded, vec!["a", "b", "c", "d"]);
        assert_eq!(report.added(), 2);
        assert_eq!(report.failed(), 2);
    }

    #[test]
    fn empty_input_publishes_nothing() {
        let api = FakeApi::new();
        let report = publish(&api, "list", &[], Duration::ZERO);
        assert!(report.items.is_empty());
        assert!(report.aborted.is_none());
    }
}
