//! Report building and the report views: the interactive reports page, the
//! printable document, and the CSV export. All three endpoints take the same
//! query string so they describe the same report.

mod core;
mod export;
mod page;
mod print;

pub use core::{Report, ReportQuery, ReportType};
pub use export::export_report_csv;
pub use page::get_reports_page;
pub use print::get_report_print_page;
