use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::core::time::parse_timestamp;
use crate::core::types::Incident;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    LastHour,
    Last6Hours,
    Last24Hours,
    Last7Days,
    Last30Days,
    AllTime,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::LastHour,
        TimeRange::Last6Hours,
        TimeRange::Last24Hours,
        TimeRange::Last7Days,
        TimeRange::Last30Days,
        TimeRange::AllTime,
    ];

    /// Unrecognized labels select everything.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Last 1 hours" => TimeRange::LastHour,
            "Last 6 hours" => TimeRange::Last6Hours,
            "Last 24 hours" => TimeRange::Last24Hours,
            "Last 7 days" => TimeRange::Last7Days,
            "Last 30 days" => TimeRange::Last30Days,
            _ => TimeRange::AllTime,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::LastHour => "Last 1 hours",
            TimeRange::Last6Hours => "Last 6 hours",
            TimeRange::Last24Hours => "Last 24 hours",
            TimeRange::Last7Days => "Last 7 days",
            TimeRange::Last30Days => "Last 30 days",
            TimeRange::AllTime => "All time",
        }
    }

    pub fn window(&self) -> Option<Duration> {
        match self {
            TimeRange::LastHour => Some(Duration::hours(1)),
            TimeRange::Last6Hours => Some(Duration::hours(6)),
            TimeRange::Last24Hours => Some(Duration::hours(24)),
            TimeRange::Last7Days => Some(Duration::days(7)),
            TimeRange::Last30Days => Some(Duration::days(30)),
            TimeRange::AllTime => None,
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.window() {
            Some(window) => now - window,
            None => DateTime::<Utc>::default(),
        }
    }

    pub fn next(&self) -> Self {
        let pos = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Ongoing,
    Resolved,
}

impl StatusFilter {
    pub fn matches(&self, incident: &Incident) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Ongoing => !incident.is_resolved(),
            StatusFilter::Resolved => incident.is_resolved(),
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Ongoing,
            StatusFilter::Ongoing => StatusFilter::Resolved,
            StatusFilter::Resolved => StatusFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Ongoing => "ongoing",
            StatusFilter::Resolved => "resolved",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "ongoing" => Ok(StatusFilter::Ongoing),
            "resolved" => Ok(StatusFilter::Resolved),
            other => Err(format!("unknown status filter: {}", other)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incidents fired at or after the range cutoff, matching `status`, most
/// recent first. Records without a parseable `fired_at` are dropped. Equal
/// timestamps keep their input order.
pub fn filter_incidents(
    incidents: &[Incident],
    range: TimeRange,
    status: StatusFilter,
    now: DateTime<Utc>,
) -> Vec<Incident> {
    let cutoff = range.cutoff(now);
    let mut kept: Vec<(DateTime<Utc>, &Incident)> = incidents
        .iter()
        .filter_map(|incident| {
            let fired = incident.fired_at.as_deref().and_then(parse_timestamp)?;
            (fired >= cutoff && status.matches(incident)).then_some((fired, incident))
        })
        .collect();
    kept.sort_by(|a, b| b.0.cmp(&a.0));
    kept.into_iter().map(|(_, incident)| incident.clone()).collect()
}
