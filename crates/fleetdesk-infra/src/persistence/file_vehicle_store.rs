//! File-based vehicle table store

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use fleetdesk_domain::model::{UploadReport, VehicleTable};
use fleetdesk_domain::repository::VehicleRecordRepository;
use fleetdesk_types::{Error, Result};

use crate::vehicle_csv::{read_vehicle_table, read_vehicle_upload, write_vehicle_table};

/// Vehicle table kept in a single CSV file
///
/// Holds no cached copy: every reload reads the file again.
pub struct FileVehicleStore {
    csv_path: PathBuf,
}

impl FileVehicleStore {
    pub fn new(csv_path: PathBuf) -> Self {
        Self { csv_path }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

impl VehicleRecordRepository for FileVehicleStore {
    fn reload(&self) -> Result<VehicleTable> {
        let file = match File::open(&self.csv_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingFile(self.csv_path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let table = read_vehicle_table(BufReader::new(file))?;
        tracing::debug!(rows = table.len(), path = %self.csv_path.display(), "loaded vehicle table");
        Ok(table)
    }

    fn save(&self, table: &VehicleTable) -> Result<()> {
        if let Some(parent) = self.csv_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.csv_path)?;
        write_vehicle_table(BufWriter::new(file), table)?;
        tracing::info!(rows = table.len(), path = %self.csv_path.display(), "saved vehicle table");
        Ok(())
    }

    fn replace_from_reader(&self, reader: &mut dyn Read) -> Result<(VehicleTable, UploadReport)> {
        // Parse fully before touching the stored file.
        let (table, dropped_columns) = read_vehicle_upload(reader)?;
        self.save(&table)?;
        if !dropped_columns.is_empty() {
            tracing::warn!(
                columns = ?dropped_columns,
                "upload columns outside the vehicle schema were not stored"
            );
        }
        tracing::info!(rows = table.len(), "vehicle table replaced by upload");

        let report = UploadReport {
            rows: table.len(),
            dropped_columns,
        };
        Ok((table, report))
    }
}
