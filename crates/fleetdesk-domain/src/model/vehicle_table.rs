//! In-memory vehicle table and the editable view projected from it

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use fleetdesk_types::{Error, Result};

use super::vehicle::{VehicleColumn, VehicleRecord};

/// Ordered set of vehicle records
///
/// An in-memory copy of the persisted table. It goes stale as soon as the file
/// changes and must be reloaded or saved explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTable {
    rows: Vec<VehicleRecord>,
}

impl VehicleTable {
    pub fn new(rows: Vec<VehicleRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[VehicleRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<VehicleRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose `column` contains `pattern`, ignoring case
    ///
    /// The match is unanchored. An empty pattern keeps every row.
    pub fn filter(&self, pattern: &str, column: VehicleColumn) -> VehicleTable {
        if pattern.is_empty() {
            return self.clone();
        }
        let needle = pattern.to_lowercase();
        let rows = self
            .rows
            .iter()
            .filter(|r| r.get(column).to_lowercase().contains(&needle))
            .cloned()
            .collect();
        VehicleTable { rows }
    }

    /// First row matching `pattern` on the vehicle number
    pub fn find_first(&self, pattern: &str) -> Option<&VehicleRecord> {
        let needle = pattern.to_lowercase();
        self.rows
            .iter()
            .find(|r| r.vehicle_number.to_lowercase().contains(&needle))
    }

    /// Keep only `columns`, in the order given, preserving row order
    pub fn project(&self, columns: &[VehicleColumn]) -> VehicleView {
        let rows = self
            .rows
            .iter()
            .map(|r| ViewRow {
                key: Some(r.vehicle_number.clone()),
                cells: columns.iter().map(|c| r.get(*c).to_string()).collect(),
            })
            .collect();
        VehicleView {
            columns: columns.to_vec(),
            rows,
        }
    }

    /// Fold an edited view back into this table
    ///
    /// Rows are paired by the vehicle number they carried when the view was
    /// projected: the k-th edited row with key K updates the k-th row of this
    /// table with key K. Blank cells leave the target field untouched. Rows
    /// without a counterpart are appended, unless every cell is blank.
    pub fn merge_edits(&mut self, edited: &VehicleView) -> MergeReport {
        let mut slots: HashMap<String, VecDeque<usize>> = HashMap::new();
        for (idx, row) in self.rows.iter().enumerate() {
            slots
                .entry(row.vehicle_number.clone())
                .or_default()
                .push_back(idx);
        }

        let mut report = MergeReport::default();
        for row in &edited.rows {
            let target = row
                .key
                .as_deref()
                .and_then(|k| slots.get_mut(k))
                .and_then(|q| q.pop_front());

            match target {
                Some(idx) => {
                    let record = &mut self.rows[idx];
                    let before = record.clone();
                    row.apply_to(&edited.columns, record);
                    if *record != before {
                        report.updated += 1;
                    }
                }
                None => {
                    if row.is_blank() {
                        continue;
                    }
                    let mut record = VehicleRecord::default();
                    row.apply_to(&edited.columns, &mut record);
                    self.rows.push(record);
                    report.appended += 1;
                }
            }
        }

        tracing::debug!(
            updated = report.updated,
            appended = report.appended,
            "merged edited rows"
        );
        report
    }

    /// Full copy for one level of rollback
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.clone())
    }

    /// Replace the contents with a previously taken snapshot
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.rows.clone_from(&snapshot.0.rows);
    }
}

/// Checkpoint of a whole table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(VehicleTable);

impl Snapshot {
    pub fn table(&self) -> &VehicleTable {
        &self.0
    }
}

/// Outcome of [`VehicleTable::merge_edits`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub updated: usize,
    pub appended: usize,
}

/// Outcome of replacing the stored table with an uploaded file
///
/// `dropped_columns` lists uploaded headers outside the vehicle schema; their
/// values were not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub rows: usize,
    pub dropped_columns: Vec<String>,
}

/// Editable grid: a projection of the table onto selected columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleView {
    columns: Vec<VehicleColumn>,
    rows: Vec<ViewRow>,
}

/// One grid row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    /// Vehicle number at projection time; `None` for rows added in the grid
    pub key: Option<String>,
    pub cells: Vec<String>,
}

impl ViewRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }

    fn apply_to(&self, columns: &[VehicleColumn], record: &mut VehicleRecord) {
        for (column, cell) in columns.iter().zip(&self.cells) {
            if !cell.trim().is_empty() {
                record.set(*column, cell.clone());
            }
        }
    }
}

impl VehicleView {
    pub fn columns(&self) -> &[VehicleColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Edit one cell of the grid
    pub fn set_cell(&mut self, row: usize, column: VehicleColumn, value: &str) -> Result<()> {
        let col_idx = self.column_index(column)?;
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or_else(|| Error::InvalidInput(format!("row {} out of range (0..{})", row, len)))?;
        target.cells[col_idx] = value.to_string();
        Ok(())
    }

    /// Append a new grid row; the vehicle number column must be displayed
    pub fn add_row(&mut self, vehicle_number: &str) -> Result<usize> {
        let col_idx = self.column_index(VehicleColumn::VehicleNumber)?;
        let mut cells = vec![String::new(); self.columns.len()];
        cells[col_idx] = vehicle_number.to_string();
        self.rows.push(ViewRow { key: None, cells });
        Ok(self.rows.len() - 1)
    }

    fn column_index(&self, column: VehicleColumn) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .ok_or_else(|| Error::InvalidInput(format!("column '{}' is not displayed", column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: &str, year: &str, container: &str) -> VehicleRecord {
        VehicleRecord {
            vehicle_number: number.to_string(),
            registration_year: year.to_string(),
            fc_validity: "2026-03-31".to_string(),
            service_interval_km: "10000".to_string(),
            container_type: "Dry".to_string(),
            container: container.to_string(),
        }
    }

    fn sample_table() -> VehicleTable {
        VehicleTable::new(vec![
            record("TN01AB1234", "2018", "20ft"),
            record("KA05CD5678", "2020", "40ft"),
            record("TN09XY0001", "2015", "20ft"),
        ])
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let table = sample_table();
        let hits = table.filter("tn01", VehicleColumn::VehicleNumber);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.rows()[0].vehicle_number, "TN01AB1234");

        let hits = table.filter("1234", VehicleColumn::VehicleNumber);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_filter_empty_pattern_returns_everything_in_order() {
        let table = sample_table();
        assert_eq!(table.filter("", VehicleColumn::VehicleNumber), table);
    }

    #[test]
    fn test_filter_other_column() {
        let table = sample_table();
        let hits = table.filter("20FT", VehicleColumn::Container);
        let numbers: Vec<_> = hits.rows().iter().map(|r| r.vehicle_number.as_str()).collect();
        assert_eq!(numbers, vec!["TN01AB1234", "TN09XY0001"]);
    }

    #[test]
    fn test_project_keeps_requested_columns_and_row_order() {
        let view = sample_table().project(&[VehicleColumn::Container, VehicleColumn::VehicleNumber]);
        assert_eq!(view.columns(), &[VehicleColumn::Container, VehicleColumn::VehicleNumber]);
        assert_eq!(view.len(), 3);
        assert_eq!(view.rows()[1].cells, vec!["40ft", "KA05CD5678"]);
        assert_eq!(view.rows()[2].key.as_deref(), Some("TN09XY0001"));
    }

    #[test]
    fn test_merge_by_vehicle_number_survives_filtering() {
        let mut table = sample_table();
        let mut view = table
            .filter("tn09", VehicleColumn::VehicleNumber)
            .project(&[VehicleColumn::VehicleNumber, VehicleColumn::Container]);
        view.set_cell(0, VehicleColumn::Container, "45ft").unwrap();

        let report = table.merge_edits(&view);

        assert_eq!(report, MergeReport { updated: 1, appended: 0 });
        // Positional alignment would have written row 0 instead.
        assert_eq!(table.rows()[0].container, "20ft");
        assert_eq!(table.rows()[2].container, "45ft");
    }

    #[test]
    fn test_merge_can_rename_vehicle_number() {
        let mut table = sample_table();
        let mut view = table.project(&[VehicleColumn::VehicleNumber]);
        view.set_cell(1, VehicleColumn::VehicleNumber, "KA05CD9999").unwrap();

        table.merge_edits(&view);

        assert_eq!(table.rows()[1].vehicle_number, "KA05CD9999");
        assert_eq!(table.rows()[1].container, "40ft");
    }

    #[test]
    fn test_merge_pairs_duplicate_keys_in_order() {
        let mut table = VehicleTable::new(vec![
            record("DUP1", "2001", "a"),
            record("DUP1", "2002", "b"),
        ]);
        let mut view = table.project(&[VehicleColumn::Container]);
        view.set_cell(1, VehicleColumn::Container, "z").unwrap();

        table.merge_edits(&view);

        assert_eq!(table.rows()[0].container, "a");
        assert_eq!(table.rows()[1].container, "z");
    }

    #[test]
    fn test_merge_blank_cells_do_not_overwrite() {
        let mut table = sample_table();
        let mut view = table.project(&[VehicleColumn::RegistrationYear]);
        view.set_cell(0, VehicleColumn::RegistrationYear, "").unwrap();

        let report = table.merge_edits(&view);

        assert_eq!(report.updated, 0);
        assert_eq!(table.rows()[0].registration_year, "2018");
    }

    #[test]
    fn test_merge_appends_added_rows() {
        let mut table = sample_table();
        let mut view = table.project(&[VehicleColumn::VehicleNumber, VehicleColumn::Container]);
        let idx = view.add_row("MH12NEW001").unwrap();
        view.set_cell(idx, VehicleColumn::Container, "40ft").unwrap();
        view.add_row("").unwrap();

        let report = table.merge_edits(&view);

        assert_eq!(report, MergeReport { updated: 0, appended: 1 });
        assert_eq!(table.len(), 4);
        let added = &table.rows()[3];
        assert_eq!(added.vehicle_number, "MH12NEW001");
        assert_eq!(added.container, "40ft");
        assert_eq!(added.registration_year, "");
    }

    #[test]
    fn test_add_row_requires_vehicle_number_column() {
        let mut view = sample_table().project(&[VehicleColumn::Container]);
        assert!(matches!(view.add_row("X"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_set_cell_rejects_bad_row_and_hidden_column() {
        let mut view = sample_table().project(&[VehicleColumn::Container]);
        assert!(view.set_cell(7, VehicleColumn::Container, "x").is_err());
        assert!(view.set_cell(0, VehicleColumn::FcValidity, "x").is_err());
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut table = sample_table();
        let original = table.clone();
        let snapshot = table.snapshot();

        let mut view = table.project(&VehicleColumn::ALL);
        view.set_cell(0, VehicleColumn::FcValidity, "2030-01-01").unwrap();
        view.add_row("NEW").unwrap();
        table.merge_edits(&view);
        assert_ne!(table, original);

        table.restore(&snapshot);
        assert_eq!(table, original);
        assert_eq!(snapshot.table(), &original);
    }
}
