//! Output formatting module

use std::io::Write;

use fleetdesk_domain::model::{
    MergeReport, UploadReport, VehicleColumn, VehicleRecord, VehicleView,
};
use fleetdesk_types::{OutputFormat, Result};

/// Vehicle details card shown after a lookup
pub fn output_vehicle(out: &mut dyn Write, format: OutputFormat, vehicle: &VehicleRecord) -> Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(vehicle)?)?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Vehicle Details")?;
    writeln!(out, "===============")?;
    for column in VehicleColumn::ALL {
        let value = vehicle.get(column);
        writeln!(
            out,
            "{:<28} {}",
            format!("{}:", column.header()),
            if value.is_empty() { "N/A" } else { value }
        )?;
    }
    Ok(())
}

/// Editable grid with row indices for `set`
pub fn output_view(out: &mut dyn Write, format: OutputFormat, view: &VehicleView) -> Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(view)?)?;
        return Ok(());
    }

    let mut widths: Vec<usize> = view
        .columns()
        .iter()
        .map(|c| c.header().chars().count())
        .collect();
    for row in view.rows() {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let index_width = view.len().saturating_sub(1).to_string().len().max(1);

    let mut line = format!("{:>w$}", "#", w = index_width);
    for (column, width) in view.columns().iter().zip(&widths) {
        line.push_str(&format!("  {:<w$}", column.header(), w = *width));
    }
    writeln!(out, "{}", line.trim_end())?;

    let rule_len = index_width + widths.iter().map(|w| w + 2).sum::<usize>();
    writeln!(out, "{}", "-".repeat(rule_len))?;

    for (idx, row) in view.rows().iter().enumerate() {
        let mut line = format!("{:>w$}", idx, w = index_width);
        for (cell, width) in row.cells.iter().zip(&widths) {
            line.push_str(&format!("  {:<w$}", cell, w = *width));
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    writeln!(out, "({} rows)", view.len())?;
    Ok(())
}

pub fn output_merge_report(out: &mut dyn Write, format: OutputFormat, report: &MergeReport) -> Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
    } else {
        writeln!(
            out,
            "All changes saved successfully! ({} updated, {} added)",
            report.updated, report.appended
        )?;
    }
    Ok(())
}

/// Result of an upload, naming any columns that were not stored
pub fn output_upload_report(out: &mut dyn Write, format: OutputFormat, report: &UploadReport) -> Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
        return Ok(());
    }

    writeln!(out, "Vehicle data updated successfully! ({} rows)", report.rows)?;
    if !report.dropped_columns.is_empty() {
        writeln!(
            out,
            "Warning: columns not stored: {}",
            report.dropped_columns.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_domain::model::VehicleTable;

    fn render_table(view: &VehicleView) -> String {
        let mut out = Vec::new();
        output_view(&mut out, OutputFormat::Table, view).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_view_table_layout() {
        let table = VehicleTable::new(vec![
            VehicleRecord::with_number("TN01AB1234"),
            VehicleRecord::with_number("KA05"),
        ]);
        let view = table.project(&[VehicleColumn::VehicleNumber, VehicleColumn::Container]);

        let text = render_table(&view);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "#  Vehicle Number  Container");
        assert_eq!(lines[2], "0  TN01AB1234");
        assert_eq!(lines[3], "1  KA05");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_vehicle_card_marks_missing_values() {
        let mut out = Vec::new();
        output_vehicle(&mut out, OutputFormat::Table, &VehicleRecord::with_number("TN01")).unwrap();
        let text = String::from_utf8(out).unwrap();
        let line = |label: &str| {
            text.lines()
                .find(|l| l.starts_with(label))
                .map(|l| l[label.len()..].trim().to_string())
        };
        assert_eq!(line("Vehicle Number:").as_deref(), Some("TN01"));
        assert_eq!(line("FC Validity:").as_deref(), Some("N/A"));
    }

    #[test]
    fn test_upload_report_names_dropped_columns() {
        let report = UploadReport {
            rows: 4,
            dropped_columns: vec!["Owner".to_string(), "Notes".to_string()],
        };
        let mut out = Vec::new();
        output_upload_report(&mut out, OutputFormat::Table, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Vehicle data updated successfully! (4 rows)\nWarning: columns not stored: Owner, Notes\n"
        );
    }

    #[test]
    fn test_vehicle_json() {
        let mut out = Vec::new();
        output_vehicle(&mut out, OutputFormat::Json, &VehicleRecord::with_number("TN01")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["Vehicle Number"], "TN01");
    }
}
