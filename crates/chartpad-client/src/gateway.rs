//! HTTP gateway to the external clinical-data server.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::ClientError;
use chartpad_core::Bundle;

const FHIR_JSON: &str = "application/fhir+json";
/// Page size used when walking observation history.
const HISTORY_PAGE_SIZE: usize = 100;

/// Result of a patient search: the matched resources and the server's
/// accurate total across all pages.
#[derive(Debug, Clone, Default)]
pub struct PatientSearch {
    pub resources: Vec<Value>,
    pub total: u64,
}

pub struct FhirGateway {
    http: reqwest::Client,
    base_url: String,
}

impl FhirGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gateway with a per-request timeout applied to every call.
    pub fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fhir_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http.request(method, url).header("Accept", FHIR_JSON)
    }

    /// Read a single patient resource.
    pub async fn patient(&self, id: &str) -> Result<Value, ClientError> {
        let url = self.fhir_url(&format!("Patient/{id}"));
        let resp = self.request(reqwest::Method::GET, &url).send().await?;
        handle_response(resp).await
    }

    /// Search patients, newest first, one page at a time.
    ///
    /// Phone-shaped search terms query the `phone` parameter; anything else
    /// queries `name`. `page` is zero-based.
    pub async fn search_patients(
        &self,
        term: &str,
        page: usize,
        page_size: usize,
    ) -> Result<PatientSearch, ClientError> {
        let mut params = vec![
            ("_sort".to_string(), "-_lastUpdated".to_string()),
            ("_count".to_string(), page_size.to_string()),
            ("_offset".to_string(), (page * page_size).to_string()),
            ("_total".to_string(), "accurate".to_string()),
        ];
        if !term.is_empty() {
            let key = if is_phone_like(term) { "phone" } else { "name" };
            params.push((key.to_string(), term.to_string()));
        }

        debug!(term, page, page_size, "searching patients");
        let url = self.fhir_url("Patient");
        let resp = self
            .request(reqwest::Method::GET, &url)
            .query(&params)
            .send()
            .await?;
        let body = handle_response(resp).await?;
        let bundle: Bundle = serde_json::from_value(body)?;

        Ok(PatientSearch {
            total: bundle.total(),
            resources: bundle.resources(),
        })
    }

    /// Create a patient resource; returns the server's copy.
    pub async fn create_patient(&self, resource: &Value) -> Result<Value, ClientError> {
        let url = self.fhir_url("Patient");
        let resp = self
            .request(reqwest::Method::POST, &url)
            .header("Content-Type", FHIR_JSON)
            .json(resource)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// Update a patient resource, forcing the path id into the payload.
    pub async fn update_patient(&self, id: &str, resource: &Value) -> Result<Value, ClientError> {
        let mut resource = resource.clone();
        resource["id"] = json!(id);

        let url = self.fhir_url(&format!("Patient/{id}"));
        let resp = self
            .request(reqwest::Method::PUT, &url)
            .header("Content-Type", FHIR_JSON)
            .json(&resource)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// Walk a searchset through its `next` links, one request at a time,
    /// collecting entry resources.
    ///
    /// A page failure is logged and terminates the walk; whatever was
    /// accumulated so far is returned. Callers treat partial history as
    /// usable, not fatal.
    pub async fn fetch_all_pages(&self, first_url: &str) -> Vec<Value> {
        let mut resources = Vec::new();
        let mut next_url = Some(first_url.to_string());

        while let Some(url) = next_url.take() {
            let page: Result<Bundle, ClientError> = async {
                let resp = self.request(reqwest::Method::GET, &url).send().await?;
                let body = handle_response(resp).await?;
                Ok(serde_json::from_value(body)?)
            }
            .await;

            match page {
                Ok(bundle) => {
                    resources.extend(bundle.resources());
                    next_url = bundle.next_link().map(str::to_string);
                }
                Err(error) => {
                    warn!(url, %error, "failed to fetch page, keeping partial results");
                    break;
                }
            }
        }

        resources
    }

    pub(crate) async fn post_json(
        &self,
        url: &str,
        resource: &Value,
    ) -> Result<reqwest::Response, ClientError> {
        Ok(self
            .request(reqwest::Method::POST, url)
            .header("Content-Type", FHIR_JSON)
            .json(resource)
            .send()
            .await?)
    }

    /// All historical observation resources for a patient.
    pub async fn observation_history(&self, patient_id: &str) -> Vec<Value> {
        let url = self.fhir_url(&format!(
            "Observation?patient={patient_id}&_count={HISTORY_PAGE_SIZE}"
        ));
        self.fetch_all_pages(&url).await
    }
}

/// Decide whether a search term looks like a phone number.
fn is_phone_like(term: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE
        .get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone pattern"))
        .is_match(term)
}

/// Check the status and decode the body, surfacing OperationOutcome
/// diagnostics from error responses when the server provides them.
pub(crate) async fn handle_response(resp: reqwest::Response) -> Result<Value, ClientError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && json.get("resourceType").and_then(|v| v.as_str()) == Some("OperationOutcome")
            && let Some(issues) = json.get("issue").and_then(|v| v.as_array())
        {
            let msgs: Vec<&str> = issues
                .iter()
                .filter_map(|i| i.get("diagnostics").and_then(|d| d.as_str()))
                .collect();
            if !msgs.is_empty() {
                return Err(ClientError::upstream(status.as_u16(), msgs.join("; ")));
            }
        }
        return Err(ClientError::upstream(status.as_u16(), body));
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}
