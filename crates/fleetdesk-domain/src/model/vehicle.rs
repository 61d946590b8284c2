//! Vehicle record and its column schema

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use fleetdesk_types::Error;

/// One row of the vehicle table
///
/// All fields are opaque strings; the table is stored and edited as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "Vehicle Number")]
    pub vehicle_number: String,
    #[serde(rename = "Registration Year")]
    pub registration_year: String,
    #[serde(rename = "FC Validity")]
    pub fc_validity: String,
    #[serde(rename = "Service Required Every (KM)")]
    pub service_interval_km: String,
    #[serde(rename = "Container Type")]
    pub container_type: String,
    #[serde(rename = "Container")]
    pub container: String,
}

impl VehicleRecord {
    /// Empty record carrying only a vehicle number
    pub fn with_number(vehicle_number: impl Into<String>) -> Self {
        Self {
            vehicle_number: vehicle_number.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, column: VehicleColumn) -> &str {
        match column {
            VehicleColumn::VehicleNumber => &self.vehicle_number,
            VehicleColumn::RegistrationYear => &self.registration_year,
            VehicleColumn::FcValidity => &self.fc_validity,
            VehicleColumn::ServiceIntervalKm => &self.service_interval_km,
            VehicleColumn::ContainerType => &self.container_type,
            VehicleColumn::Container => &self.container,
        }
    }

    pub fn set(&mut self, column: VehicleColumn, value: impl Into<String>) {
        let slot = match column {
            VehicleColumn::VehicleNumber => &mut self.vehicle_number,
            VehicleColumn::RegistrationYear => &mut self.registration_year,
            VehicleColumn::FcValidity => &mut self.fc_validity,
            VehicleColumn::ServiceIntervalKm => &mut self.service_interval_km,
            VehicleColumn::ContainerType => &mut self.container_type,
            VehicleColumn::Container => &mut self.container,
        };
        *slot = value.into();
    }
}

/// Columns of the vehicle table, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleColumn {
    VehicleNumber,
    RegistrationYear,
    FcValidity,
    ServiceIntervalKm,
    ContainerType,
    Container,
}

impl VehicleColumn {
    pub const ALL: [VehicleColumn; 6] = [
        VehicleColumn::VehicleNumber,
        VehicleColumn::RegistrationYear,
        VehicleColumn::FcValidity,
        VehicleColumn::ServiceIntervalKm,
        VehicleColumn::ContainerType,
        VehicleColumn::Container,
    ];

    /// Header name as it appears in the CSV file
    pub fn header(self) -> &'static str {
        match self {
            VehicleColumn::VehicleNumber => "Vehicle Number",
            VehicleColumn::RegistrationYear => "Registration Year",
            VehicleColumn::FcValidity => "FC Validity",
            VehicleColumn::ServiceIntervalKm => "Service Required Every (KM)",
            VehicleColumn::ContainerType => "Container Type",
            VehicleColumn::Container => "Container",
        }
    }

    /// Short key used on the command line
    pub fn key(self) -> &'static str {
        match self {
            VehicleColumn::VehicleNumber => "vehicle_number",
            VehicleColumn::RegistrationYear => "registration_year",
            VehicleColumn::FcValidity => "fc_validity",
            VehicleColumn::ServiceIntervalKm => "service_interval_km",
            VehicleColumn::ContainerType => "container_type",
            VehicleColumn::Container => "container",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Parse a comma-separated column list
    pub fn parse_list(list: &str) -> Result<Vec<Self>, Error> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<VehicleColumn>())
            .collect()
    }
}

impl FromStr for VehicleColumn {
    type Err = Error;

    /// Accepts the CSV header (any case) or the snake_case key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s || c.header().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidInput(format!("unknown column '{}'", s)))
    }
}

impl fmt::Display for VehicleColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_parse_accepts_header_and_key() {
        assert_eq!(
            "fc_validity".parse::<VehicleColumn>().unwrap(),
            VehicleColumn::FcValidity
        );
        assert_eq!(
            "service required every (km)".parse::<VehicleColumn>().unwrap(),
            VehicleColumn::ServiceIntervalKm
        );
        assert!("colour".parse::<VehicleColumn>().is_err());
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let cols = VehicleColumn::parse_list("container, vehicle_number").unwrap();
        assert_eq!(
            cols,
            vec![VehicleColumn::Container, VehicleColumn::VehicleNumber]
        );
    }

    #[test]
    fn test_get_set_roundtrip_each_column() {
        let mut record = VehicleRecord::default();
        for (i, col) in VehicleColumn::ALL.into_iter().enumerate() {
            record.set(col, format!("v{}", i));
        }
        assert_eq!(record.get(VehicleColumn::VehicleNumber), "v0");
        assert_eq!(record.get(VehicleColumn::Container), "v5");
    }

    #[test]
    fn test_serde_uses_csv_headers() {
        let record = VehicleRecord::with_number("TN01AB1234");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Vehicle Number"], "TN01AB1234");
        assert!(json.get("Service Required Every (KM)").is_some());
    }
}
