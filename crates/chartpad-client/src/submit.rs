//! Concurrent submission of assessment payloads.

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::gateway::FhirGateway;

/// What happened to one submitted resource.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub resource_type: String,
    pub result: Result<Value, ClientError>,
}

/// Per-resource outcomes of a submission round.
///
/// Submissions are independent: one failure neither cancels nor rolls back
/// the others, and nothing is retried automatically.
#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub outcomes: Vec<SubmissionOutcome>,
}

impl SubmissionReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Error strings for the failed submissions, for banner display.
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.result
                    .as_ref()
                    .err()
                    .map(|e| format!("{}: {e}", o.resource_type))
            })
            .collect()
    }
}

impl FhirGateway {
    /// POST each resource to its own type endpoint, all requests in flight
    /// at once, joined before returning.
    pub async fn submit(&self, resources: Vec<Value>) -> SubmissionReport {
        let posts = resources.into_iter().map(|resource| {
            let resource_type = resource
                .get("resourceType")
                .and_then(|v| v.as_str())
                .unwrap_or("Resource")
                .to_string();
            async move {
                let result = self.post_resource(&resource_type, &resource).await;
                SubmissionOutcome {
                    resource_type,
                    result,
                }
            }
        });

        let outcomes = join_all(posts).await;
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            warn!(failed, total = outcomes.len(), "submission partially failed");
        } else {
            info!(total = outcomes.len(), "submission complete");
        }

        SubmissionReport { outcomes }
    }

    async fn post_resource(
        &self,
        resource_type: &str,
        resource: &Value,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base_url(), resource_type);
        let resp = self.post_json(&url, resource).await?;
        crate::gateway::handle_response(resp).await
    }
}
