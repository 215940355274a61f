//! Gateway integration tests against a mocked clinical-data server.

use assert_json_diff::assert_json_include;
use chartpad_client::{ClientError, FhirGateway};
use chartpad_observations::AssessmentSession;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn patient_resource(id: &str, family: &str) -> serde_json::Value {
    json!({
        "resourceType": "Patient",
        "id": id,
        "name": [{ "use": "official", "family": family, "given": ["Test"] }]
    })
}

#[tokio::test]
async fn search_sends_paging_params_and_name_for_text_terms() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Patient"))
        .and(query_param("_sort", "-_lastUpdated"))
        .and(query_param("_count", "10"))
        .and(query_param("_offset", "20"))
        .and(query_param("_total", "accurate"))
        .and(query_param("name", "Williams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 21,
            "entry": [{ "resource": patient_resource("p21", "Williams") }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let search = gateway.search_patients("Williams", 2, 10).await.unwrap();
    assert_eq!(search.total, 21);
    assert_eq!(search.resources.len(), 1);
    assert_eq!(search.resources[0]["id"], "p21");
}

#[tokio::test]
async fn phone_shaped_terms_search_the_phone_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Patient"))
        .and(query_param("phone", "+1 555 0100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let search = gateway.search_patients("+1 555 0100", 0, 10).await.unwrap();
    assert_eq!(search.total, 0);
    assert!(search.resources.is_empty());
}

#[tokio::test]
async fn empty_search_term_sends_no_filter_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Patient"))
        .and(query_param("_offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    assert!(gateway.search_patients("", 0, 10).await.is_ok());
}

#[tokio::test]
async fn fetch_all_pages_walks_next_links_sequentially() {
    let server = MockServer::start().await;
    let page_two_url = format!("{}/Observation?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/Observation"))
        .and(query_param("patient", "pat-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "link": [{ "relation": "next", "url": page_two_url }],
            "entry": [{ "resource": { "resourceType": "Observation", "id": "o1" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Observation"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [{ "resource": { "resourceType": "Observation", "id": "o2" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let resources = gateway.observation_history("pat-1").await;
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["id"], "o1");
    assert_eq!(resources[1]["id"], "o2");
}

#[tokio::test]
async fn failed_page_keeps_partial_results() {
    let server = MockServer::start().await;
    let page_two_url = format!("{}/Observation?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/Observation"))
        .and(query_param("patient", "pat-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "link": [{ "relation": "next", "url": page_two_url }],
            "entry": [{ "resource": { "resourceType": "Observation", "id": "o1" } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Observation"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage down"))
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let resources = gateway.observation_history("pat-1").await;
    assert_eq!(resources.len(), 1);
}

#[tokio::test]
async fn history_fetch_feeds_the_assessment_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Observation"))
        .and(query_param("patient", "pat-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [
                { "resource": {
                    "resourceType": "Observation",
                    "code": { "text": "Temperature" },
                    "valueQuantity": { "value": 36.8, "unit": "°C" },
                    "effectiveDateTime": "2024-03-13T18:45:00Z"
                }},
                { "resource": {
                    "resourceType": "Observation",
                    "code": { "text": "Temperature" },
                    "valueQuantity": { "value": 37.2, "unit": "°C" },
                    "effectiveDateTime": "2024-03-12T09:30:00Z"
                }}
            ]
        })))
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let records = gateway.observation_history("pat-1").await;

    let mut session = AssessmentSession::from_catalog();
    session.merge_server_records(&records);

    let temperature = &session.entries()[0];
    assert_eq!(temperature.label, "Temperature");
    assert_eq!(temperature.value, "36.8");
    assert_eq!(temperature.history.len(), 2);
    // Fetched history is the baseline, not a pending change.
    assert!(session.changed().is_empty());
}

#[tokio::test]
async fn submission_fans_out_and_tolerates_partial_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Observation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "resourceType": "Observation", "id": "created-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/QuestionnaireResponse"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage down"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let report = gateway
        .submit(vec![
            json!({ "resourceType": "Observation", "status": "final" }),
            json!({ "resourceType": "QuestionnaireResponse", "status": "completed" }),
        ])
        .await;

    assert!(!report.all_succeeded());
    assert_eq!(report.outcomes.len(), 2);
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("QuestionnaireResponse"));
}

#[tokio::test]
async fn update_forces_the_path_id_into_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/Patient/pat-9"))
        .and(body_json(json!({
            "resourceType": "Patient",
            "id": "pat-9",
            "gender": "female"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(patient_resource("pat-9", "Williams")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let updated = gateway
        .update_patient("pat-9", &json!({ "resourceType": "Patient", "gender": "female" }))
        .await
        .unwrap();
    assert_json_include!(actual: updated, expected: json!({ "id": "pat-9" }));
}

#[tokio::test]
async fn create_returns_the_server_copy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Patient"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(patient_resource("pat-new", "Doe")),
        )
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let created = gateway
        .create_patient(&json!({ "resourceType": "Patient" }))
        .await
        .unwrap();
    assert_eq!(created["id"], "pat-new");
}

#[tokio::test]
async fn not_found_surfaces_operation_outcome_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Patient/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "resourceType": "OperationOutcome",
            "issue": [{
                "severity": "error",
                "code": "not-found",
                "diagnostics": "Patient/missing is not known"
            }]
        })))
        .mount(&server)
        .await;

    let gateway = FhirGateway::new(&server.uri());
    let err = gateway.patient("missing").await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::UpstreamStatus { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("Patient/missing is not known"));
        }
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}
