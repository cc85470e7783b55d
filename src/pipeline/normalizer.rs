use serde::Deserialize;

use crate::core::time::local_now_display;
use crate::core::types::{Incident, IncidentDetail, Severity, SimilarIncident};

/// Incident as it arrives on the wire. The backend has used several names for
/// the event time, so all of them are accepted here.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawIncident {
    pub incident_id: String,
    #[serde(default)]
    pub alarm_title: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub fired_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDetail {
    #[serde(flatten)]
    pub base: RawIncident,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub analysis_summary: Option<String>,
    #[serde(default)]
    pub analysis_detail: Option<String>,
    #[serde(default)]
    pub similar_incidents: Option<Vec<SimilarIncident>>,
}

pub fn normalize_incidents(raw: Vec<RawIncident>) -> Vec<Incident> {
    raw.into_iter().map(normalize_incident).collect()
}

pub fn normalize_incident(raw: RawIncident) -> Incident {
    let time = canonical_time(&raw).unwrap_or_else(local_now_display);
    Incident {
        incident_id: raw.incident_id,
        alarm_title: raw.alarm_title.unwrap_or_default(),
        severity: raw.severity.unwrap_or_default(),
        fired_at: non_blank(raw.fired_at),
        resolved_at: non_blank(raw.resolved_at),
        time,
    }
}

pub fn normalize_detail(raw: RawDetail) -> IncidentDetail {
    IncidentDetail {
        incident: normalize_incident(raw.base),
        status: raw.status.unwrap_or_default(),
        analysis_summary: raw.analysis_summary.unwrap_or_default(),
        analysis_detail: raw.analysis_detail.unwrap_or_default(),
        similar_incidents: raw.similar_incidents.unwrap_or_default(),
    }
}

// created_at > timestamp > time > start_time > fired_at
fn canonical_time(raw: &RawIncident) -> Option<String> {
    [
        &raw.created_at,
        &raw.timestamp,
        &raw.time,
        &raw.start_time,
        &raw.fired_at,
    ]
    .into_iter()
    .flatten()
    .find(|v| !v.trim().is_empty())
    .cloned()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
