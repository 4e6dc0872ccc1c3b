use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Table};

use crate::billing::report::CONSOLE_TABLE_HEADERS;
use crate::billing::Report;

/// Condensed console table: function, region, daily and monthly cost
pub fn render_table(report: &Report) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_header(CONSOLE_TABLE_HEADERS);

    for row in &report.rows {
        let [function, region, daily, monthly] = row.console_cells();
        table.add_row(vec![
            Cell::new(function),
            Cell::new(region),
            Cell::new(daily).set_alignment(CellAlignment::Right),
            Cell::new(monthly).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

pub fn format_total(report: &Report) -> String {
    format!(
        "Total monthly cost estimation: ${:.3}",
        report.total_monthly_cost
    )
}

/// Print the table followed by the total line
pub fn print_report(report: &Report) {
    println!("{}", render_table(report));
    println!("{}", format_total(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{PricingTable, UsageRecord};

    fn report() -> Report {
        Report::from_records(
            &PricingTable::default(),
            vec![
                UsageRecord::new("idle", "us-east-1", 128, 0.0, 0.0).unwrap(),
                UsageRecord::new("busy", "eu-west-1", 512, 250.0, 1000.0).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_render_table() {
        let rendered = render_table(&report()).to_string();

        assert!(rendered.contains("Monthly Cost Estimation ($)"));
        assert!(rendered.contains("busy"));
        assert!(rendered.contains("0.081"));
        assert!(rendered.contains("N/A"));
        // Highest cost first
        assert!(rendered.find("busy").unwrap() < rendered.find("idle").unwrap());
    }

    #[test]
    fn test_format_total() {
        assert_eq!(
            format_total(&report()),
            "Total monthly cost estimation: $0.081"
        );
    }
}
