use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Display format used when the server gives no usable time field.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

pub fn now_utc() -> DateTime<Utc> {
    if let Ok(value) = std::env::var("RCA_FIXED_TIME") {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
            return dt.with_timezone(&Utc);
        }
    }
    Utc::now()
}

pub fn local_now_display() -> String {
    now_utc().with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// Parses a server timestamp. Offset-less values are read as local time.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(trimmed, fmt).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// `2025-12-01T15:00:00.123Z` -> `2025-12-01 15:00:00Z`; absent -> `-`.
pub fn format_timestamp(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => {
            let replaced = v.replacen('T', " ", 1);
            match replaced.split_once('.') {
                Some((head, _)) => head.to_string(),
                None => replaced,
            }
        }
        _ => "-".to_string(),
    }
}
