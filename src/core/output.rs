use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::core::error::ConsoleError;
use crate::core::time::format_timestamp;
use crate::core::types::{Incident, IncidentDetail, OutputFormat};

pub fn write_incidents(
    incidents: &[Incident],
    format: OutputFormat,
    path: &Path,
) -> Result<(), ConsoleError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_incidents(incidents, format)?)?;
    Ok(())
}

pub fn render_incidents(incidents: &[Incident], format: OutputFormat) -> Result<String, ConsoleError> {
    match format {
        OutputFormat::Table => Ok(render_table(incidents)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(incidents)?),
        OutputFormat::Jsonl => render_jsonl(incidents),
        OutputFormat::Markdown => Ok(render_markdown(incidents)),
    }
}

fn render_jsonl(incidents: &[Incident]) -> Result<String, ConsoleError> {
    let mut lines = String::new();
    for incident in incidents {
        lines.push_str(&serde_json::to_string(incident)?);
        lines.push('\n');
    }
    Ok(lines)
}

fn render_table(incidents: &[Incident]) -> String {
    if incidents.is_empty() {
        return "No incidents match the current filters.\n".to_string();
    }
    let id_width = incidents
        .iter()
        .map(|i| i.incident_id.len())
        .max()
        .unwrap_or(2)
        .max(2);
    let mut out = format!(
        "{:<id_width$}  {:<19}  {:<19}  {:<8}  {}\n",
        "ID", "FIRED", "RESOLVED", "SEVERITY", "TITLE"
    );
    for incident in incidents {
        out.push_str(&format!(
            "{:<id_width$}  {:<19}  {:<19}  {:<8}  {}\n",
            incident.incident_id,
            format_timestamp(incident.fired_at.as_deref()),
            resolved_label(incident),
            incident.display_severity(),
            incident.alarm_title
        ));
    }
    out
}

fn render_markdown(incidents: &[Incident]) -> String {
    let mut out = String::new();
    out.push_str("# RCA Incidents\n\n");
    out.push_str(&format!("Generated: {}\n\n", Utc::now().to_rfc3339()));
    if incidents.is_empty() {
        out.push_str("_No incidents match the current filters._\n");
        return out;
    }
    out.push_str("| id | fired | resolved | severity | title |\n");
    out.push_str("|----|-------|----------|----------|-------|\n");
    for incident in incidents {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            incident.incident_id,
            format_timestamp(incident.fired_at.as_deref()),
            resolved_label(incident),
            incident.display_severity(),
            incident.alarm_title.replace('|', "\\|")
        ));
    }
    out
}

/// Plain-text rendering of one incident for `show`.
pub fn render_detail(detail: &IncidentDetail) -> String {
    let incident = &detail.incident;
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", incident.incident_id, incident.alarm_title));
    out.push_str(&format!(
        "Severity: {} | Status: {}\n",
        incident.display_severity(),
        if detail.status.is_empty() { "-" } else { &detail.status }
    ));
    out.push_str(&format!(
        "Fired: {} | Resolved: {}\n\n",
        format_timestamp(incident.fired_at.as_deref()),
        resolved_label(incident)
    ));
    out.push_str("## Summary\n");
    out.push_str(non_empty_or(&detail.analysis_summary, "No summary available."));
    out.push_str("\n\n## Detailed analysis\n");
    out.push_str(non_empty_or(&detail.analysis_detail, "No detailed analysis available."));
    out.push_str("\n\n## Similar incidents\n");
    if detail.similar_incidents.is_empty() {
        out.push_str("None\n");
    }
    for similar in &detail.similar_incidents {
        match similar.score {
            Some(score) => out.push_str(&format!(
                "- {} {} ({}% similar)\n",
                similar.incident_id, similar.alarm_title, score
            )),
            None => out.push_str(&format!("- {} {}\n", similar.incident_id, similar.alarm_title)),
        }
    }
    out
}

pub fn resolved_label(incident: &Incident) -> String {
    match &incident.resolved_at {
        Some(at) => format_timestamp(Some(at)),
        None => "Ongoing".to_string(),
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Severity;

    fn incident(id: &str, resolved: Option<&str>) -> Incident {
        Incident {
            incident_id: id.to_string(),
            alarm_title: "Pod Restart | api".to_string(),
            severity: Severity::Critical,
            fired_at: Some("2025-12-01T15:00:00.123Z".to_string()),
            resolved_at: resolved.map(String::from),
            time: "2025-12-01T15:00:00.123Z".to_string(),
        }
    }

    #[test]
    fn table_marks_open_and_resolved() {
        let out = render_table(&[incident("INC-1", None), incident("INC-2", Some("2025-12-01T16:00:00Z"))]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].contains("Ongoing") && lines[1].contains("Critical"));
        assert!(!lines[2].contains("Ongoing") && lines[2].contains("2025-12-01 16:00:00Z"));
    }

    #[test]
    fn empty_list_renders_no_results_state() {
        assert!(render_table(&[]).contains("No incidents"));
        assert!(render_markdown(&[]).contains("_No incidents"));
    }

    #[test]
    fn markdown_escapes_pipes() {
        let out = render_markdown(&[incident("INC-1", None)]);
        assert!(out.contains("Pod Restart \\| api"));
    }

    #[test]
    fn json_output_reads_back() {
        let out = render_incidents(&[incident("INC-1", None)], OutputFormat::Json).unwrap();
        let parsed: Vec<Incident> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0].incident_id, "INC-1");
    }

    #[test]
    fn jsonl_has_one_line_per_incident() {
        let out = render_incidents(&[incident("a", None), incident("b", None)], OutputFormat::Jsonl).unwrap();
        assert_eq!(out.lines().count(), 2);
    }
}
