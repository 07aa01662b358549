//! Department-level reporting for costgrid: the budget status registry,
//! headline dashboard figures and the department summary CSV.

pub mod department;
pub mod error;
pub mod export;
pub mod kpi;

pub use department::{
    BudgetStatus, Department, DepartmentRegistry, HIGH_GROWTH_THRESHOLD_PCT, seed_departments,
};
pub use error::ReportError;
pub use export::{
    CsvExportOptions, CsvNewline, HEADER, departments_to_csv_string, write_departments_csv,
    write_departments_csv_to_path,
};
pub use kpi::DashboardKpis;
