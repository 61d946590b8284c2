//! CSV codec for the vehicle table
//!
//! Header row = column names, one record per row. Columns are matched by
//! header name, so their order in the file does not matter.

use std::io::{Read, Write};

use fleetdesk_domain::model::{VehicleColumn, VehicleRecord, VehicleTable};
use fleetdesk_types::{Error, Result};

/// Parse a vehicle table, checking that every schema column is present
pub fn read_vehicle_table<R: Read>(reader: R) -> Result<VehicleTable> {
    let (table, extra) = read_vehicle_upload(reader)?;
    if !extra.is_empty() {
        tracing::warn!(columns = ?extra, "ignoring columns outside the vehicle schema");
    }
    Ok(table)
}

/// Like [`read_vehicle_table`], also returning the headers that were skipped
pub fn read_vehicle_upload<R: Read>(reader: R) -> Result<(VehicleTable, Vec<String>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let extra = validate_headers(&headers)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<VehicleRecord>() {
        rows.push(result?);
    }

    Ok((VehicleTable::new(rows), extra))
}

/// Headers outside the schema, in file order
fn validate_headers(headers: &csv::StringRecord) -> Result<Vec<String>> {
    for column in VehicleColumn::ALL {
        if !headers.iter().any(|h| h == column.header()) {
            return Err(Error::MissingColumn(column.header().to_string()));
        }
    }

    Ok(headers
        .iter()
        .filter(|h| VehicleColumn::from_header(h).is_none())
        .map(str::to_string)
        .collect())
}

/// Write the table with a header row, even when it has no records
pub fn write_vehicle_table<W: Write>(writer: W, table: &VehicleTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(VehicleColumn::ALL.map(VehicleColumn::header))?;
    for record in table.rows() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
