pub mod csv;
pub mod table;

pub use csv::{save_csv, write_csv};
pub use table::{format_total, print_report, render_table};
