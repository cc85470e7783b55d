use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::parse(&value).unwrap_or_default()
    }
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "Info"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// One alerting event as listed by the backend, after time normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub incident_id: String,
    #[serde(default)]
    pub alarm_title: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub fired_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    /// Canonical display time folded from the server's time fields.
    #[serde(default)]
    pub time: String,
}

impl Incident {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    /// Badge label: resolved incidents show "Resolved" instead of severity.
    pub fn display_severity(&self) -> String {
        if self.is_resolved() {
            "Resolved".to_string()
        } else {
            self.severity.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarIncident {
    pub incident_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alarm_title: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentDetail {
    #[serde(flatten)]
    pub incident: Incident,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub analysis_summary: String,
    #[serde(default)]
    pub analysis_detail: String,
    #[serde(default)]
    pub similar_incidents: Vec<SimilarIncident>,
}

impl IncidentDetail {
    /// Applies a saved edit to the local copy.
    pub fn merge(&mut self, update: &IncidentUpdate) {
        if let Some(title) = &update.alarm_title {
            self.incident.alarm_title = title.clone();
        }
        if let Some(severity) = update.severity {
            self.incident.severity = severity;
        }
        if let Some(status) = &update.status {
            self.status = status.clone();
        }
        if let Some(summary) = &update.analysis_summary {
            self.analysis_summary = summary.clone();
        }
        if let Some(detail) = &update.analysis_detail {
            self.analysis_detail = detail.clone();
        }
    }
}

/// Partial body for `PUT /api/v1/incidents/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct IncidentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_detail: Option<String>,
}

impl IncidentUpdate {
    pub fn is_empty(&self) -> bool {
        self.alarm_title.is_none()
            && self.severity.is_none()
            && self.status.is_none()
            && self.analysis_summary.is_none()
            && self.analysis_detail.is_none()
    }

    /// Fields of `form` that differ from `detail`.
    pub fn diff(detail: &IncidentDetail, form: &IncidentDetail) -> Self {
        fn changed(old: &str, new: &str) -> Option<String> {
            (old != new).then(|| new.to_string())
        }
        Self {
            alarm_title: changed(&detail.incident.alarm_title, &form.incident.alarm_title),
            severity: (detail.incident.severity != form.incident.severity)
                .then_some(form.incident.severity),
            status: changed(&detail.status, &form.status),
            analysis_summary: changed(&detail.analysis_summary, &form.analysis_summary),
            analysis_detail: changed(&detail.analysis_detail, &form.analysis_detail),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(default)]
    pub allow_signup: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub id: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Jsonl,
    Markdown,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_incident_tolerates_null_title() {
        let similar: SimilarIncident = serde_json::from_value(serde_json::json!({
            "incident_id": "INC-2",
            "alarm_title": null,
            "score": 80.0
        }))
        .unwrap();
        assert_eq!(similar.alarm_title, "");
        assert_eq!(similar.score, Some(80.0));
    }

    #[test]
    fn unknown_severity_reads_as_info() {
        let sev: Severity = serde_json::from_value(serde_json::json!("page-me")).unwrap();
        assert_eq!(sev, Severity::Info);
    }
}
