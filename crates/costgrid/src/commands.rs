use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use costgrid::render;
use costgrid_engine::{Action, BudgetState, EditOutcome};
use costgrid_report::{
    CsvExportOptions, CsvNewline, DashboardKpis, write_departments_csv,
    write_departments_csv_to_path,
};
use costgrid_scenario::{
    Manifest, ScenarioBundle, ScenarioError, generate_schema_json_pretty,
};
use serde_json::json;

use crate::cli::{
    BridgeArgs, CellEdit, DepartmentsArgs, GridArgs, KpisArgs, LintArgs, OutputFormat,
    ScenarioSource,
};

fn load_bundle(source: &ScenarioSource) -> Result<ScenarioBundle> {
    let Some(path) = source.scenario.as_deref() else {
        return Ok(ScenarioBundle::seeded());
    };
    tracing::info!(path = %path.display(), "loading scenario");
    Manifest::load(path)
        .and_then(|manifest| manifest.into_bundle())
        .map_err(|err| describe_scenario_error(path, err))
}

fn describe_scenario_error(path: &Path, err: ScenarioError) -> anyhow::Error {
    match err {
        ScenarioError::Validation(validation) => {
            let details: Vec<String> = validation
                .issues()
                .iter()
                .map(|issue| format!("  {issue}"))
                .collect();
            anyhow::anyhow!(
                "{}: {validation}\n{}",
                path.display(),
                details.join("\n")
            )
        }
        other => anyhow::Error::new(other)
            .context(format!("failed to load scenario {}", path.display())),
    }
}

fn apply_edit(state: BudgetState, edit: CellEdit) -> BudgetState {
    let item = edit.item_id.clone();
    let month = edit.month;
    let (next, outcome) = state.apply_with_outcome(Action::EditCell {
        item_id: edit.item_id,
        month: edit.month,
        raw: edit.raw,
    });
    match outcome {
        Some(EditOutcome::Locked) => {
            tracing::warn!(item = %item, "row is locked, edit ignored")
        }
        Some(EditOutcome::UnknownItem) => {
            tracing::warn!(item = %item, "no such cost item, edit ignored")
        }
        Some(EditOutcome::MonthOutOfRange) => {
            tracing::warn!(item = %item, month, "month out of range, edit ignored")
        }
        Some(EditOutcome::Applied { .. }) | None => {}
    }
    next
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn run_grid(args: GridArgs) -> Result<()> {
    let bundle = load_bundle(&args.source)?;
    let mut state = bundle
        .state
        .apply_all(args.set.into_iter().map(Action::SetDriver));
    if args.reset {
        state = state.apply(Action::ResetGrid);
    }
    state = args.edit.into_iter().fold(state, apply_edit);

    let summary = state.summary();
    match args.format {
        OutputFormat::Text => print!("{}", render::grid_table(&summary)),
        OutputFormat::Json => print_json(&json!({
            "scenario": state.scenario(),
            "currency": state.currency(),
            "drivers": state.drivers(),
            "grid": summary,
        }))?,
    }
    Ok(())
}

pub fn run_bridge(args: BridgeArgs) -> Result<()> {
    let bundle = load_bundle(&args.source)?;
    let bars = bundle.state.bridge();
    match args.format {
        OutputFormat::Text => print!("{}", render::bridge_table(&bars)),
        OutputFormat::Json => print_json(&bars)?,
    }
    Ok(())
}

pub fn run_departments(args: DepartmentsArgs) -> Result<()> {
    let bundle = load_bundle(&args.source)?;
    let opts = CsvExportOptions {
        newline: if args.crlf {
            CsvNewline::Crlf
        } else {
            CsvNewline::Lf
        },
        ..CsvExportOptions::default()
    };
    match args.out {
        Some(path) => {
            write_departments_csv_to_path(&bundle.departments, &path, &opts)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), rows = bundle.departments.len(), "department CSV exported");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_departments_csv(&mut handle, &bundle.departments, &opts)
                .context("failed to write department CSV")?;
            handle.flush()?;
        }
    }
    Ok(())
}

pub fn run_kpis(args: KpisArgs) -> Result<()> {
    let bundle = load_bundle(&args.source)?;
    let state = bundle
        .state
        .apply_all(args.set.into_iter().map(Action::SetDriver));
    let kpis = DashboardKpis::compute(&bundle.departments, &state.summary());
    let impact = state.impact();
    match args.format {
        OutputFormat::Text => print!("{}", render::kpi_panel(&kpis, state.drivers(), &impact)),
        OutputFormat::Json => print_json(&json!({
            "kpis": kpis,
            "drivers": state.drivers(),
            "impact": impact,
            "impact_label": impact.label(),
        }))?,
    }
    Ok(())
}

pub fn run_lint(args: LintArgs) -> Result<()> {
    let mut failed = 0usize;
    for path in &args.files {
        let outcome = Manifest::load(path).and_then(|manifest| Ok(manifest.validate()?));
        match outcome {
            Ok(()) => println!("ok      {}", path.display()),
            Err(ScenarioError::Validation(err)) => {
                failed += 1;
                println!("invalid {} ({} issue(s))", path.display(), err.issues().len());
                for issue in err.issues() {
                    println!("  {issue}");
                }
            }
            Err(err) => {
                failed += 1;
                println!("error   {}: {err}", path.display());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} manifest(s) failed validation", args.files.len());
    }
    Ok(())
}

pub fn run_schema() -> Result<()> {
    let schema = generate_schema_json_pretty().context("failed to render manifest schema")?;
    println!("{schema}");
    Ok(())
}
