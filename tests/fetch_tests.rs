use httpmock::prelude::*;
use httpmock::Method::PATCH;
use rca_console::core::{
    error::ConsoleError,
    gateway::Gateway,
    session::Session,
    types::{IncidentUpdate, Severity},
};
use rca_console::pipeline::fetch::{
    fetch_incident_detail, fetch_incidents, hide_incident, update_incident,
};
use serde_json::json;

fn gateway(server: &MockServer) -> Gateway {
    let session = Session::default();
    session.set_token("tok");
    Gateway::with_client(reqwest::Client::new(), &server.base_url(), session)
}

#[tokio::test]
async fn list_is_normalized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!([
                {
                    "incident_id": "INC-1",
                    "alarm_title": "Disk full",
                    "severity": "critical",
                    "fired_at": "2025-12-01T15:00:00Z",
                    "resolved_at": "",
                    "created_at": "2025-12-01T15:00:05Z"
                },
                {
                    "incident_id": "INC-2",
                    "alarm_title": "Latency",
                    "severity": "WARNING",
                    "fired_at": "2025-12-01T14:00:00Z",
                    "resolved_at": "2025-12-01T14:30:00Z"
                }
            ]));
        })
        .await;

    let incidents = fetch_incidents(&gateway(&server)).await.unwrap();

    assert_eq!(incidents.len(), 2);
    assert_eq!(incidents[0].severity, Severity::Critical);
    assert_eq!(incidents[0].time, "2025-12-01T15:00:05Z");
    assert!(!incidents[0].is_resolved());
    assert_eq!(incidents[1].severity, Severity::Warning);
    assert_eq!(incidents[1].time, "2025-12-01T14:00:00Z");
    assert!(incidents[1].is_resolved());
}

#[tokio::test]
async fn null_fields_do_not_drop_the_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents");
            then.status(200).json_body(json!([
                {
                    "incident_id": "INC-1",
                    "alarm_title": "Disk full",
                    "severity": "critical",
                    "fired_at": "2025-12-01T15:00:00Z"
                },
                {
                    "incident_id": "INC-2",
                    "alarm_title": null,
                    "severity": null,
                    "fired_at": "2025-12-01T14:00:00Z",
                    "resolved_at": null
                }
            ]));
        })
        .await;

    let incidents = fetch_incidents(&gateway(&server)).await.unwrap();

    assert_eq!(incidents.len(), 2);
    assert_eq!(incidents[0].alarm_title, "Disk full");
    assert_eq!(incidents[1].incident_id, "INC-2");
    assert_eq!(incidents[1].alarm_title, "");
    assert_eq!(incidents[1].severity, Severity::Info);
    assert!(!incidents[1].is_resolved());
}

#[tokio::test]
async fn non_array_list_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let err = fetch_incidents(&gateway(&server)).await.unwrap_err();
    assert!(matches!(err, ConsoleError::MalformedResponse(_)));
}

#[tokio::test]
async fn server_error_is_network_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents");
            then.status(502);
        })
        .await;

    let err = fetch_incidents(&gateway(&server)).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Network(_)));
    assert_eq!(err.user_message(), "Failed to load data from the server.");
}

#[tokio::test]
async fn detail_is_unwrapped_from_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/INC-1");
            then.status(200).json_body(json!({
                "data": {
                    "incident_id": "INC-1",
                    "alarm_title": "Disk full",
                    "severity": "critical",
                    "fired_at": "2025-12-01T15:00:00Z",
                    "status": "investigating",
                    "analysis_summary": "Log volume filled up.",
                    "similar_incidents": [
                        { "incident_id": "INC-0", "alarm_title": "Disk full", "score": 92.5 }
                    ]
                }
            }));
        })
        .await;

    let detail = fetch_incident_detail(&gateway(&server), "INC-1")
        .await
        .unwrap();

    assert_eq!(detail.incident.incident_id, "INC-1");
    assert_eq!(detail.status, "investigating");
    assert_eq!(detail.analysis_summary, "Log volume filled up.");
    assert!(detail.analysis_detail.is_empty());
    assert_eq!(detail.similar_incidents.len(), 1);
    assert_eq!(detail.similar_incidents[0].score, Some(92.5));
}

#[tokio::test]
async fn detail_ids_are_percent_encoded() {
    let server = MockServer::start_async().await;
    let detail = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/a%2Fb");
            then.status(200).json_body(json!({
                "data": { "incident_id": "a/b", "alarm_title": "x", "severity": "info" }
            }));
        })
        .await;

    let result = fetch_incident_detail(&gateway(&server), "a/b").await.unwrap();
    detail.assert_hits_async(1).await;
    assert_eq!(result.incident.incident_id, "a/b");
}

#[tokio::test]
async fn update_sends_only_changed_fields() {
    let server = MockServer::start_async().await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/incidents/INC-1")
                .json_body(json!({ "alarm_title": "Disk full on db-1", "severity": "warning" }));
            then.status(200).json_body(json!({ "ok": true }));
        })
        .await;

    let update = IncidentUpdate {
        alarm_title: Some("Disk full on db-1".into()),
        severity: Some(Severity::Warning),
        ..IncidentUpdate::default()
    };
    update_incident(&gateway(&server), "INC-1", &update)
        .await
        .unwrap();
    put.assert_hits_async(1).await;
}

#[tokio::test]
async fn rejected_update_is_validation_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/incidents/INC-1");
            then.status(422).body("status not allowed");
        })
        .await;

    let update = IncidentUpdate {
        status: Some("bogus".into()),
        ..IncidentUpdate::default()
    };
    let err = update_incident(&gateway(&server), "INC-1", &update)
        .await
        .unwrap_err();
    match err {
        ConsoleError::Validation(msg) => assert!(msg.contains("status not allowed")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn empty_update_never_reaches_server() {
    let server = MockServer::start_async().await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/incidents/INC-1");
            then.status(200);
        })
        .await;

    let err = update_incident(&gateway(&server), "INC-1", &IncidentUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    put.assert_hits_async(0).await;
}

#[tokio::test]
async fn hide_patches_hide_endpoint() {
    let server = MockServer::start_async().await;
    let hide = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/api/v1/incidents/INC-1/hide");
            then.status(204);
        })
        .await;

    hide_incident(&gateway(&server), "INC-1").await.unwrap();
    hide.assert_hits_async(1).await;
}
