use anyhow::{Context, Result};

use crate::cli::config::{build_update, resolve_list_options, ListOptions, RunConfig};
use crate::cli::flags::{Cli, Command, LoginArgs};
use crate::core::{
    auth,
    gateway::Gateway,
    output::{render_detail, render_incidents, write_incidents},
    session::Session,
    time::now_utc,
    types::{Incident, OutputFormat},
};
use crate::pipeline::{
    fetch::{fetch_incident_detail, fetch_incidents, hide_incident, update_incident},
    filter::filter_incidents,
    paginate::{paginate, total_pages},
};
use crate::ui::tui::run_dashboard;

pub async fn run(cli: Cli, cfg: RunConfig) -> Result<()> {
    let gateway = Gateway::new(&cfg.app, Session::default()).context("building HTTP client")?;
    tracing::debug!("using API at {}", gateway.base_url());

    match cli.command {
        Command::Dashboard => run_dashboard(gateway, &cfg.app).await,
        Command::List {
            login,
            range,
            status,
            page,
            page_size,
            format,
            output,
        } => {
            let opts = resolve_list_options(&cfg.app, range, status, page, page_size)?;
            sign_in(&gateway, &login).await?;
            let incidents = fetch_incidents(&gateway)
                .await
                .context("fetching incidents")?;
            let (items, pages) = list_page(&incidents, &opts);
            tracing::info!(
                "{} of {} incidents on page {}/{} ({}, {})",
                items.len(),
                incidents.len(),
                opts.page,
                pages,
                opts.range,
                opts.status
            );
            let format: OutputFormat = format.into();
            match output {
                Some(path) => {
                    write_incidents(&items, format, &path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!("incidents written to {}", path.display());
                }
                None => print!("{}", render_incidents(&items, format)?),
            }
            Ok(())
        }
        Command::Show { id, login } => {
            sign_in(&gateway, &login).await?;
            let detail = fetch_incident_detail(&gateway, &id)
                .await
                .with_context(|| format!("fetching incident {}", id))?;
            print!("{}", render_detail(&detail));
            Ok(())
        }
        Command::Update {
            id,
            login,
            title,
            severity,
            status,
            summary,
            detail_file,
        } => {
            let update = build_update(title, severity, status, summary, detail_file.as_deref())?;
            sign_in(&gateway, &login).await?;
            update_incident(&gateway, &id, &update)
                .await
                .with_context(|| format!("updating incident {}", id))?;
            println!("Incident {} updated.", id);
            Ok(())
        }
        Command::Hide { id, login } => {
            sign_in(&gateway, &login).await?;
            hide_incident(&gateway, &id)
                .await
                .with_context(|| format!("hiding incident {}", id))?;
            println!("Incident {} hidden.", id);
            Ok(())
        }
        Command::AuthConfig => {
            let config = auth::fetch_auth_config(&gateway).await;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn sign_in(gateway: &Gateway, login: &LoginArgs) -> Result<()> {
    auth::login(gateway, &login.user, &login.password)
        .await
        .with_context(|| format!("signing in as {}", login.user))?;
    Ok(())
}

/// Filter, sort and slice one page of the list. Returns the page and the page count.
fn list_page(incidents: &[Incident], opts: &ListOptions) -> (Vec<Incident>, usize) {
    let visible = filter_incidents(incidents, opts.range, opts.status, now_utc());
    let pages = total_pages(visible.len(), opts.page_size);
    let items = paginate(&visible, opts.page, opts.page_size).to_vec();
    (items, pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Severity;
    use crate::pipeline::filter::{StatusFilter, TimeRange};
    use chrono::Duration;

    fn incident(id: &str, minutes_ago: i64, resolved: bool) -> Incident {
        let fired = (now_utc() - Duration::minutes(minutes_ago)).to_rfc3339();
        Incident {
            incident_id: id.into(),
            alarm_title: id.into(),
            severity: Severity::Warning,
            fired_at: Some(fired.clone()),
            resolved_at: resolved.then(|| fired.clone()),
            time: fired,
        }
    }

    #[test]
    fn list_page_filters_then_slices() {
        let incidents = vec![
            incident("a", 30, false),
            incident("b", 120, true),
            incident("c", 10, false),
            incident("d", 20, false),
        ];
        let opts = ListOptions {
            range: TimeRange::LastHour,
            status: StatusFilter::All,
            page: 2,
            page_size: 2,
        };
        let (items, pages) = list_page(&incidents, &opts);
        assert_eq!(pages, 2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].incident_id, "a");
    }
}
