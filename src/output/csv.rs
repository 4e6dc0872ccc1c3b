use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::billing::report::TABLE_HEADERS;
use crate::billing::Report;

/// Write the header line and every row, comma separated
pub fn write_csv<W: Write>(report: &Report, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", TABLE_HEADERS.join(","))?;
    for row in &report.rows {
        writeln!(writer, "{}", row.cells().join(","))?;
    }
    writer.flush()
}

/// Write the full report to `path`, replacing any existing file
pub fn save_csv<P: AsRef<Path>>(report: &Report, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(report, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{PricingTable, UsageRecord};

    #[test]
    fn test_save_csv() {
        let report = Report::from_records(
            &PricingTable::default(),
            vec![
                UsageRecord::new("idle", "us-east-1", 128, 0.0, 7.0).unwrap(),
                UsageRecord::new("busy", "eu-west-1", 512, 250.0, 1000.0).unwrap(),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costs.csv");
        save_csv(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Function,Region,Memory (MB),Average Running Duration in the Last Day (ms),\
             Number of Invocations in the Last Day,Cost in the Last Day ($),\
             Monthly Cost Estimation ($)"
        );
        assert_eq!(lines[1], "busy,eu-west-1,512,250,1000,0.003,0.081");
        assert_eq!(lines[2], "idle,us-east-1,128,N/A,N/A,N/A,N/A");
    }
}
