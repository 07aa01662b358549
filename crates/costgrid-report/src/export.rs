//! Department summary export.
//!
//! One header row followed by one record per department, in registry order:
//!
//! ```text
//! "Department","Head","Status","Total Budget","Last Year Actuals","YoY Change (%)"
//! "Human Resources","Alice Wong","Submitted",2500000,2300000,8.7
//! ```
//!
//! Text fields are always double-quoted, even when they look like numbers,
//! and numeric fields never are. The
//! YoY column carries one decimal place and is left empty when a department
//! has no prior-year actuals.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use costgrid_common::format_fixed;

use crate::department::{Department, DepartmentRegistry};
use crate::error::ReportError;

pub const HEADER: [&str; 6] = [
    "Department",
    "Head",
    "Status",
    "Total Budget",
    "Last Year Actuals",
    "YoY Change (%)",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvNewline {
    #[default]
    Lf,
    Crlf,
}

#[derive(Clone, Debug)]
pub struct CsvExportOptions {
    /// Field delimiter as a single byte.
    pub delimiter: u8,
    pub newline: CsvNewline,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            newline: CsvNewline::Lf,
        }
    }
}

fn csv_terminator(nl: CsvNewline) -> csv::Terminator {
    match nl {
        CsvNewline::Lf => csv::Terminator::Any(b'\n'),
        CsvNewline::Crlf => csv::Terminator::CRLF,
    }
}

/// Double-quote a text field, doubling embedded quotes.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn department_record(dept: &Department) -> [String; 6] {
    [
        quoted(&dept.name),
        quoted(&dept.head),
        quoted(dept.status.as_str()),
        dept.total_budget.to_string(),
        dept.last_year_actuals.to_string(),
        dept.yoy_change_pct()
            .map(|pct| format_fixed(pct, 1))
            .unwrap_or_default(),
    ]
}

/// Write the header and one record per department.
pub fn write_departments_csv<W: Write>(
    writer: W,
    departments: &DepartmentRegistry,
    opts: &CsvExportOptions,
) -> Result<(), ReportError> {
    let mut wb = csv::WriterBuilder::new();
    wb.delimiter(opts.delimiter)
        .terminator(csv_terminator(opts.newline))
        .quote_style(csv::QuoteStyle::Never);
    let mut wtr = wb.from_writer(writer);

    // Quoting is decided per column, so fields arrive already quoted.
    wtr.write_record(HEADER.map(quoted))?;
    for dept in departments.iter() {
        wtr.write_record(department_record(dept))?;
    }
    wtr.flush()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = departments.len(), "department CSV written");
    Ok(())
}

pub fn departments_to_csv_string(
    departments: &DepartmentRegistry,
    opts: &CsvExportOptions,
) -> Result<String, ReportError> {
    let mut buf: Vec<u8> = Vec::new();
    write_departments_csv(&mut buf, departments, opts)?;
    Ok(String::from_utf8(buf)?)
}

pub fn write_departments_csv_to_path(
    departments: &DepartmentRegistry,
    path: impl AsRef<Path>,
    opts: &CsvExportOptions,
) -> Result<(), ReportError> {
    let file = File::create(path.as_ref())?;
    write_departments_csv(file, departments, opts)
}
