use reqwest::{Method, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::core::{
    error::ConsoleError,
    gateway::Gateway,
    types::{Incident, IncidentDetail, IncidentUpdate},
};
use crate::pipeline::normalizer::{normalize_detail, normalize_incidents, RawDetail, RawIncident};

pub const INCIDENTS_PATH: &str = "/api/v1/incidents";

#[derive(Deserialize)]
struct DetailEnvelope {
    data: RawDetail,
}

pub fn incident_path(id: &str) -> String {
    format!("{}/{}", INCIDENTS_PATH, urlencoding::encode(id))
}

/// Full incident list. The endpoint must answer with a bare JSON array.
pub async fn fetch_incidents(gw: &Gateway) -> Result<Vec<Incident>, ConsoleError> {
    let resp = expect_success(gw.request(Method::GET, INCIDENTS_PATH, None).await?)?;
    let body: Value = resp.json().await.map_err(ConsoleError::from)?;
    if !body.is_array() {
        tracing::warn!("incident list is not an array: {}", shape_of(&body));
        return Err(ConsoleError::MalformedResponse(format!(
            "expected array of incidents, got {}",
            shape_of(&body)
        )));
    }
    let raw: Vec<RawIncident> = serde_json::from_value(body).map_err(|e| {
        tracing::warn!("incident list element unreadable: {}", e);
        ConsoleError::from(e)
    })?;
    tracing::debug!("fetched {} incidents", raw.len());
    Ok(normalize_incidents(raw))
}

pub async fn fetch_incident_detail(gw: &Gateway, id: &str) -> Result<IncidentDetail, ConsoleError> {
    let resp = expect_success(gw.request(Method::GET, &incident_path(id), None).await?)?;
    let body: Value = resp.json().await.map_err(ConsoleError::from)?;
    let envelope: DetailEnvelope = serde_json::from_value(body).map_err(|e| {
        tracing::warn!("detail for {} unreadable: {}", id, e);
        ConsoleError::from(e)
    })?;
    Ok(normalize_detail(envelope.data))
}

pub async fn update_incident(
    gw: &Gateway,
    id: &str,
    update: &IncidentUpdate,
) -> Result<(), ConsoleError> {
    validate_update(update)?;
    let body = serde_json::to_value(update)?;
    let resp = gw.request(Method::PUT, &incident_path(id), Some(&body)).await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        tracing::warn!("update of {} rejected with {}: {}", id, status, text);
        return Err(ConsoleError::Validation(if text.trim().is_empty() {
            format!("server answered {}", status)
        } else {
            format!("server answered {}: {}", status, text.trim())
        }));
    }
    tracing::info!("incident {} updated", id);
    Ok(())
}

/// Removes the incident from the list view on the server side.
pub async fn hide_incident(gw: &Gateway, id: &str) -> Result<(), ConsoleError> {
    let path = format!("{}/hide", incident_path(id));
    expect_success(gw.request(Method::PATCH, &path, None).await?)?;
    tracing::info!("incident {} hidden", id);
    Ok(())
}

pub fn validate_update(update: &IncidentUpdate) -> Result<(), ConsoleError> {
    if update.is_empty() {
        return Err(ConsoleError::Validation("nothing to update".into()));
    }
    if let Some(title) = &update.alarm_title {
        if title.trim().is_empty() {
            return Err(ConsoleError::Validation("alarm title cannot be empty".into()));
        }
    }
    Ok(())
}

fn expect_success(resp: Response) -> Result<Response, ConsoleError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ConsoleError::Network(format!(
            "{} answered {}",
            resp.url().path(),
            resp.status()
        )))
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_encoded_in_paths() {
        assert_eq!(incident_path("INC-1"), "/api/v1/incidents/INC-1");
        assert_eq!(incident_path("a/b c"), "/api/v1/incidents/a%2Fb%20c");
    }

    #[test]
    fn blank_title_fails_validation() {
        let update = IncidentUpdate {
            alarm_title: Some("   ".into()),
            ..IncidentUpdate::default()
        };
        assert!(matches!(
            validate_update(&update),
            Err(ConsoleError::Validation(_))
        ));
        assert!(validate_update(&IncidentUpdate::default()).is_err());
    }
}
