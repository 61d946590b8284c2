//! Excel export of the vehicle table

use rust_xlsxwriter::{Workbook, Worksheet};

use fleetdesk_domain::model::{VehicleColumn, VehicleTable};
use fleetdesk_types::{Error, Result};

/// A cell as it will be written to the sheet
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Blank,
    Number(f64),
    Text(String),
}

impl SheetCell {
    fn from_value(value: &str) -> Self {
        if value.is_empty() {
            SheetCell::Blank
        } else if let Some(n) = numeric_value(value) {
            SheetCell::Number(n)
        } else {
            SheetCell::Text(value.to_string())
        }
    }
}

/// Spreadsheets keep 15 significant digits
const MAX_SIGNIFICANT_DIGITS: usize = 15;

/// Plain decimal numbers that read back as the same text. Values like "007",
/// "1e3", "1.50" or long account numbers stay text so the sheet shows exactly
/// what the table holds.
fn numeric_value(value: &str) -> Option<f64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || (int_part.len() > 1 && int_part.starts_with('0')) {
        return None;
    }
    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return None;
        }
    }

    let significant = digits
        .chars()
        .filter(|c| *c != '.')
        .collect::<String>();
    if significant.trim_matches('0').len() > MAX_SIGNIFICANT_DIGITS {
        return None;
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.to_string() == value)
}

/// Header row followed by one row per record, in table order
pub fn sheet_cells(table: &VehicleTable) -> Vec<Vec<SheetCell>> {
    let mut grid = Vec::with_capacity(table.len() + 1);
    grid.push(
        VehicleColumn::ALL
            .iter()
            .map(|c| SheetCell::Text(c.header().to_string()))
            .collect(),
    );
    for record in table.rows() {
        grid.push(
            VehicleColumn::ALL
                .iter()
                .map(|c| SheetCell::from_value(record.get(*c)))
                .collect(),
        );
    }
    grid
}

fn write_sheet(sheet: &mut Worksheet, table: &VehicleTable) -> Result<()> {
    for (row_idx, row) in sheet_cells(table).iter().enumerate() {
        let row_num = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            match cell {
                SheetCell::Blank => {}
                SheetCell::Number(n) => {
                    sheet
                        .write_number(row_num, col, *n)
                        .map_err(|e| Error::Excel(e.to_string()))?;
                }
                SheetCell::Text(s) => {
                    sheet
                        .write_string(row_num, col, s)
                        .map_err(|e| Error::Excel(e.to_string()))?;
                }
            }
        }
    }
    Ok(())
}

fn build_workbook(table: &VehicleTable) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_sheet(sheet, table)?;
    Ok(workbook)
}

/// Full table as an in-memory `.xlsx` file
pub fn export_to_buffer(table: &VehicleTable) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| Error::Excel(e.to_string()))?;
    tracing::info!(rows = table.len(), bytes = buffer.len(), "exported vehicle table");
    Ok(buffer)
}
