use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::types::{OutputFormat, Severity};
use crate::pipeline::filter::{StatusFilter, TimeRange};

#[derive(Parser, Debug)]
#[command(
    name = "rca-console",
    version,
    about = "Terminal console for root-cause-analysis incident reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML). Default: config/rca-console.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// API base URL; overrides config file and RCA_API_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Increase verbosity (info, debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log file path
    #[arg(long, default_value = "data/rca-console.log", global = true)]
    pub log_file: String,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account id used to sign in
    #[arg(long, env = "RCA_USER")]
    pub user: String,

    /// Account password
    #[arg(long, env = "RCA_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive incident dashboard
    Dashboard,
    /// Print the filtered incident list
    List {
        #[command(flatten)]
        login: LoginArgs,
        /// Time window (defaults to config default_time_range)
        #[arg(long, value_enum)]
        range: Option<RangeArg>,
        /// Resolution status filter
        #[arg(long, value_enum, default_value = "all")]
        status: StatusArg,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Items per page (defaults to config page_size)
        #[arg(long)]
        page_size: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormatArg,
        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show one incident report
    Show {
        id: String,
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Edit fields of an incident report
    Update {
        id: String,
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum)]
        severity: Option<SeverityArg>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        /// File whose contents replace the detailed analysis
        #[arg(long)]
        detail_file: Option<PathBuf>,
    },
    /// Hide an incident report from the list
    Hide {
        id: String,
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Print whether the server allows sign-up
    AuthConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RangeArg {
    #[value(name = "1h")]
    Hour,
    #[value(name = "6h")]
    SixHours,
    #[value(name = "24h")]
    Day,
    #[value(name = "7d")]
    Week,
    #[value(name = "30d")]
    Month,
    All,
}

impl From<RangeArg> for TimeRange {
    fn from(value: RangeArg) -> Self {
        match value {
            RangeArg::Hour => TimeRange::LastHour,
            RangeArg::SixHours => TimeRange::Last6Hours,
            RangeArg::Day => TimeRange::Last24Hours,
            RangeArg::Week => TimeRange::Last7Days,
            RangeArg::Month => TimeRange::Last30Days,
            RangeArg::All => TimeRange::AllTime,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatusArg {
    All,
    Ongoing,
    Resolved,
}

impl From<StatusArg> for StatusFilter {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::All => StatusFilter::All,
            StatusArg::Ongoing => StatusFilter::Ongoing,
            StatusArg::Resolved => StatusFilter::Resolved,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SeverityArg {
    Info,
    Warning,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Table,
    Json,
    Jsonl,
    #[value(alias = "md")]
    Markdown,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Jsonl => OutputFormat::Jsonl,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

impl Command {
    /// Commands that own the terminal must not log to stdout.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Command::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_flags_parse() {
        let cli = Cli::try_parse_from([
            "rca-console",
            "list",
            "--user",
            "ops",
            "--password",
            "pw",
            "--range",
            "1h",
            "--status",
            "ongoing",
            "--format",
            "md",
        ])
        .unwrap();
        match cli.command {
            Command::List {
                range,
                status,
                format,
                page,
                ..
            } => {
                assert_eq!(TimeRange::from(range.unwrap()), TimeRange::LastHour);
                assert_eq!(StatusFilter::from(status), StatusFilter::Ongoing);
                assert_eq!(OutputFormat::from(format), OutputFormat::Markdown);
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rca-console",
            "auth-config",
            "--base-url",
            "http://rca.local",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://rca.local"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.command.is_interactive());
    }
}
