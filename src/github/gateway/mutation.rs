//! Write gateways: the live Octocrab implementation and the dry-run stand-in.
//!
//! Production mode is decided once, when the runner picks which of these two
//! gateways to hold, so classification code never checks the flag itself.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::error::TriageError;
use crate::github::locator::RepositoryLocator;

use super::MutationGateway;
use super::error_mapping::map_octocrab_error;

#[derive(Serialize)]
struct AddLabelsBody<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct CreateCommentBody<'a> {
    body: &'a str,
}

/// Closing then reopening restarts the pull request's checks.
const STATE_CHANGES: [(&str, &str); 2] = [
    ("closed", "close pull request"),
    ("open", "reopen pull request"),
];

#[derive(Serialize)]
struct UpdateStateBody {
    state: &'static str,
}

/// Octocrab-backed gateway that really labels, comments and reopens.
#[derive(Clone)]
pub struct OctocrabMutationGateway {
    client: Octocrab,
}

impl OctocrabMutationGateway {
    /// Creates a write gateway sharing an existing Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MutationGateway for OctocrabMutationGateway {
    async fn add_labels(
        &self,
        locator: &RepositoryLocator,
        number: u64,
        labels: &[String],
    ) -> Result<(), TriageError> {
        let _applied: serde_json::Value = self
            .client
            .post(
                locator.issue_labels_path(number),
                Some(&AddLabelsBody { labels }),
            )
            .await
            .map_err(|error| map_octocrab_error("add labels", &error))?;
        Ok(())
    }

    async fn add_comment(
        &self,
        locator: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), TriageError> {
        let _created: serde_json::Value = self
            .client
            .post(
                locator.issue_comments_path(number),
                Some(&CreateCommentBody { body }),
            )
            .await
            .map_err(|error| map_octocrab_error("add comment", &error))?;
        Ok(())
    }

    async fn close_reopen(
        &self,
        locator: &RepositoryLocator,
        number: u64,
    ) -> Result<(), TriageError> {
        for (state, operation) in STATE_CHANGES {
            let _updated: serde_json::Value = self
                .client
                .patch(locator.pull_path(number), Some(&UpdateStateBody { state }))
                .await
                .map_err(|error| map_octocrab_error(operation, &error))?;
        }
        Ok(())
    }
}

/// Write gateway used outside production runs; it records intent only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunMutations;

#[async_trait]
impl MutationGateway for DryRunMutations {
    async fn add_labels(
        &self,
        _locator: &RepositoryLocator,
        number: u64,
        labels: &[String],
    ) -> Result<(), TriageError> {
        tracing::info!(pr = number, ?labels, "dry run: would add labels");
        Ok(())
    }

    async fn add_comment(
        &self,
        _locator: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), TriageError> {
        tracing::info!(pr = number, chars = body.len(), "dry run: would add comment");
        Ok(())
    }

    async fn close_reopen(
        &self,
        _locator: &RepositoryLocator,
        number: u64,
    ) -> Result<(), TriageError> {
        tracing::info!(pr = number, "dry run: would close and reopen");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{DryRunMutations, OctocrabMutationGateway};
    use crate::error::TriageError;
    use crate::github::gateway::{MutationGateway, OctocrabGateway};
    use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

    fn live_gateway(
        runtime: &Runtime,
        server: &MockServer,
    ) -> (RepositoryLocator, OctocrabMutationGateway) {
        let locator = RepositoryLocator::parse(&format!("{}/owner/repo", server.uri()))
            .expect("should create repository locator");
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        let _guard = runtime.enter();
        let reader = OctocrabGateway::for_token(&token, &locator).expect("should create gateway");
        (locator, OctocrabMutationGateway::new(reader.client().clone()))
    }

    #[rstest]
    fn add_labels_posts_label_list() {
        let runtime = Runtime::new().expect("runtime should start");
        let server = runtime.block_on(MockServer::start());
        let (locator, gateway) = live_gateway(&runtime, &server);

        runtime.block_on(
            Mock::given(method("POST"))
                .and(path("/api/v3/repos/owner/repo/issues/42/labels"))
                .and(body_json(json!({ "labels": ["language: spanish"] })))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!([{ "name": "language: spanish" }])),
                )
                .expect(1)
                .mount(&server),
        );

        runtime
            .block_on(gateway.add_labels(&locator, 42, &["language: spanish".to_owned()]))
            .expect("labels should be added");
    }

    #[rstest]
    fn add_comment_surfaces_api_errors() {
        let runtime = Runtime::new().expect("runtime should start");
        let server = runtime.block_on(MockServer::start());
        let (locator, gateway) = live_gateway(&runtime, &server);

        runtime.block_on(
            Mock::given(method("POST"))
                .and(path("/api/v3/repos/owner/repo/issues/42/comments"))
                .respond_with(
                    ResponseTemplate::new(422)
                        .set_body_json(json!({ "message": "Validation Failed" })),
                )
                .mount(&server),
        );

        let error = runtime
            .block_on(gateway.add_comment(&locator, 42, "hello"))
            .expect_err("comment should fail");

        assert!(
            matches!(error, TriageError::Api { .. }),
            "expected Api, got {error:?}"
        );
    }

    #[rstest]
    fn close_reopen_closes_before_reopening() {
        let runtime = Runtime::new().expect("runtime should start");
        let server = runtime.block_on(MockServer::start());
        let (locator, gateway) = live_gateway(&runtime, &server);

        for state in ["closed", "open"] {
            runtime.block_on(
                Mock::given(method("PATCH"))
                    .and(path("/api/v3/repos/owner/repo/pulls/17"))
                    .and(body_json(json!({ "state": state })))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .set_body_json(json!({ "number": 17, "state": state })),
                    )
                    .expect(1)
                    .mount(&server),
            );
        }

        runtime
            .block_on(gateway.close_reopen(&locator, 17))
            .expect("pull request should be closed and reopened");

        let states: Vec<serde_json::Value> = runtime
            .block_on(server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(|request| {
                serde_json::from_slice::<serde_json::Value>(&request.body)
                    .expect("request body should be JSON")
            })
            .collect();
        assert_eq!(
            states,
            vec![json!({ "state": "closed" }), json!({ "state": "open" })]
        );
    }

    #[rstest]
    fn close_failure_skips_reopen() {
        let runtime = Runtime::new().expect("runtime should start");
        let server = runtime.block_on(MockServer::start());
        let (locator, gateway) = live_gateway(&runtime, &server);

        runtime.block_on(
            Mock::given(method("PATCH"))
                .and(body_json(json!({ "state": "closed" })))
                .respond_with(
                    ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
                )
                .mount(&server),
        );
        runtime.block_on(
            Mock::given(method("PATCH"))
                .and(body_json(json!({ "state": "open" })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(0)
                .mount(&server),
        );

        let error = runtime
            .block_on(gateway.close_reopen(&locator, 17))
            .expect_err("close should fail");

        assert!(
            matches!(error, TriageError::Api { .. }),
            "expected Api, got {error:?}"
        );
    }

    #[tokio::test]
    async fn dry_run_never_fails() {
        let locator = RepositoryLocator::from_owner_repo("octo", "repo")
            .expect("should create repository locator");
        let gateway = DryRunMutations;

        gateway
            .add_labels(&locator, 1, &["scope: guide".to_owned()])
            .await
            .expect("dry run labels should succeed");
        gateway
            .add_comment(&locator, 1, "body")
            .await
            .expect("dry run comment should succeed");
        gateway
            .close_reopen(&locator, 1)
            .await
            .expect("dry run close and reopen should succeed");
    }
}
