use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::cli::flags::{Cli, RangeArg, SeverityArg, StatusArg};
use crate::config::{apply_overrides, load_config, AppConfig};
use crate::core::types::IncidentUpdate;
use crate::pipeline::filter::{StatusFilter, TimeRange};

/// Resolved settings for a CLI run: config file, environment and flags merged.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub app: AppConfig,
    pub log_file: PathBuf,
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub range: TimeRange,
    pub status: StatusFilter,
    pub page: usize,
    pub page_size: usize,
}

pub fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let app = load_config(cli.config.as_deref()).context("loading configuration")?;
    let app = apply_overrides(app, cli.base_url.as_deref());
    if let Some(url) = &cli.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("--base-url must be an http(s) URL: {}", url));
        }
    }
    Ok(RunConfig {
        app,
        log_file: PathBuf::from(&cli.log_file),
        verbose: cli.verbose,
    })
}

pub fn resolve_list_options(
    cfg: &AppConfig,
    range: Option<RangeArg>,
    status: StatusArg,
    page: usize,
    page_size: Option<usize>,
) -> Result<ListOptions> {
    if page == 0 {
        return Err(anyhow!("--page starts at 1"));
    }
    let page_size = page_size.unwrap_or(cfg.page_size);
    if page_size == 0 {
        return Err(anyhow!("--page-size must be at least 1"));
    }
    Ok(ListOptions {
        range: range
            .map(TimeRange::from)
            .unwrap_or_else(|| TimeRange::from_label(&cfg.default_time_range)),
        status: status.into(),
        page,
        page_size,
    })
}

/// Builds the partial update sent by `update`. Only given flags are included.
pub fn build_update(
    title: Option<String>,
    severity: Option<SeverityArg>,
    status: Option<String>,
    summary: Option<String>,
    detail_file: Option<&Path>,
) -> Result<IncidentUpdate> {
    let analysis_detail = match detail_file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => None,
    };
    let update = IncidentUpdate {
        alarm_title: title,
        severity: severity.map(Into::into),
        status,
        analysis_summary: summary,
        analysis_detail,
    };
    if update.is_empty() {
        return Err(anyhow!(
            "nothing to update; pass at least one of --title --severity --status --summary --detail-file"
        ));
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Severity;

    #[test]
    fn list_options_fall_back_to_config() {
        let cfg = AppConfig {
            page_size: 7,
            default_time_range: "Last 7 days".into(),
            ..AppConfig::default()
        };
        let opts = resolve_list_options(&cfg, None, StatusArg::Resolved, 2, None).unwrap();
        assert_eq!(opts.range, TimeRange::Last7Days);
        assert_eq!(opts.status, StatusFilter::Resolved);
        assert_eq!(opts.page_size, 7);

        let opts = resolve_list_options(&cfg, Some(RangeArg::Hour), StatusArg::All, 1, Some(3))
            .unwrap();
        assert_eq!(opts.range, TimeRange::LastHour);
        assert_eq!(opts.page_size, 3);
    }

    #[test]
    fn zero_page_is_rejected() {
        let cfg = AppConfig::default();
        assert!(resolve_list_options(&cfg, None, StatusArg::All, 0, None).is_err());
        assert!(resolve_list_options(&cfg, None, StatusArg::All, 1, Some(0)).is_err());
    }

    #[test]
    fn update_needs_a_field() {
        assert!(build_update(None, None, None, None, None).is_err());
        let update = build_update(None, Some(SeverityArg::Critical), None, None, None).unwrap();
        assert_eq!(update.severity, Some(Severity::Critical));
        assert!(update.alarm_title.is_none());
    }

    #[test]
    fn detail_file_is_read() {
        let path = std::env::temp_dir().join(format!("rca-detail-{}.md", std::process::id()));
        fs::write(&path, "root cause: disk full").unwrap();
        let update = build_update(None, None, None, None, Some(&path)).unwrap();
        assert_eq!(update.analysis_detail.as_deref(), Some("root cause: disk full"));
        let _ = fs::remove_file(&path);
    }
}
