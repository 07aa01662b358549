use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use costgrid_common::{DriverUpdate, parse_month};

#[derive(Parser, Debug)]
#[command(
    name = "costgrid",
    version,
    about = "Driver-based budget planning: cost grids, bridge charts and department reports"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recalculate and print the monthly cost grid.
    Grid(GridArgs),
    /// Print the budget bridge (waterfall) layout.
    Bridge(BridgeArgs),
    /// Export the department summary as CSV.
    Departments(DepartmentsArgs),
    /// Print dashboard KPIs, drivers and the scenario impact estimate.
    Kpis(KpisArgs),
    /// Validate scenario manifests.
    Lint(LintArgs),
    /// Print the scenario manifest JSON schema.
    Schema,
}

#[derive(Args, Debug, Default)]
pub struct ScenarioSource {
    /// Scenario manifest (YAML). Built-in planning data when omitted.
    #[arg(long = "scenario", value_name = "FILE")]
    pub scenario: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    #[command(flatten)]
    pub source: ScenarioSource,

    /// Driver update, e.g. `headcount=20` or `travel=high`. May be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<DriverUpdate>,

    /// Manual cell edit, e.g. `c4:mar=75,000` or `c3:12=0`. May be repeated.
    #[arg(long = "edit", value_name = "ID:MONTH=VALUE")]
    pub edit: Vec<CellEdit>,

    /// Restore the scenario's cost rows before applying edits.
    #[arg(long)]
    pub reset: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct BridgeArgs {
    #[command(flatten)]
    pub source: ScenarioSource,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct DepartmentsArgs {
    #[command(flatten)]
    pub source: ScenarioSource,

    /// Write to this file instead of stdout.
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Terminate records with CRLF.
    #[arg(long)]
    pub crlf: bool,
}

#[derive(Args, Debug)]
pub struct KpisArgs {
    #[command(flatten)]
    pub source: ScenarioSource,

    /// Driver update applied before the figures are computed. May be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<DriverUpdate>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Manifest files to validate.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// `ID:MONTH=VALUE` as given on the command line. The value is kept as raw
/// text; the grid applies its own lenient number parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellEdit {
    pub item_id: String,
    pub month: usize,
    pub raw: String,
}

impl FromStr for CellEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, raw) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ID:MONTH=VALUE, found `{s}`"))?;
        let (item_id, month) = target
            .split_once(':')
            .ok_or_else(|| format!("expected ID:MONTH before `=`, found `{target}`"))?;
        let item_id = item_id.trim();
        if item_id.is_empty() {
            return Err(format!("missing cost item id in `{s}`"));
        }
        let month = parse_month(month).map_err(|err| err.to_string())?;
        Ok(Self {
            item_id: item_id.to_string(),
            month,
            raw: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cell_edit_accepts_month_names_and_numbers() {
        let edit: CellEdit = "c4:Mar=75,000".parse().unwrap();
        assert_eq!(edit.item_id, "c4");
        assert_eq!(edit.month, 2);
        assert_eq!(edit.raw, "75,000");

        let edit: CellEdit = "c3:12=".parse().unwrap();
        assert_eq!(edit.month, 11);
        assert_eq!(edit.raw, "");
    }

    #[test]
    fn cell_edit_rejects_malformed_input() {
        assert!("c4=1".parse::<CellEdit>().is_err());
        assert!("c4:13=1".parse::<CellEdit>().is_err());
        assert!(":jan=1".parse::<CellEdit>().is_err());
        assert!("c4:jan".parse::<CellEdit>().is_err());
    }

    #[test]
    fn grid_args_parse_driver_updates() {
        let cli = Cli::try_parse_from([
            "costgrid",
            "-vv",
            "grid",
            "--set",
            "headcount=20",
            "--set",
            "travel=high",
            "--edit",
            "c5:jan=1",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Grid(args) = cli.command else {
            panic!("expected grid");
        };
        assert_eq!(args.set.len(), 2);
        assert_eq!(args.set[0], DriverUpdate::Headcount(20));
        assert_eq!(args.edit.len(), 1);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
