use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::format::format_date;
use crate::model::entry::FuelEntry;
use crate::model::settings::Settings;
use crate::model::vehicle::Vehicle;

const ENTRY_HEADERS: [&str; 9] = [
    "Date",
    "Vehicle",
    "Fuel Type",
    "Amount (L/gal)",
    "Price per Unit",
    "Total Cost",
    "Odometer",
    "Full Tank",
    "Notes",
];

const VEHICLE_HEADERS: [&str; 8] = [
    "Name",
    "Make",
    "Model",
    "Year",
    "Type",
    "Vehicle Class",
    "Initial Odometer",
    "Tank Capacity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Entries,
    Vehicles,
    All,
}

/// Full backup document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportData {
    pub vehicles: Vec<Vehicle>,
    pub entries: Vec<FuelEntry>,
    pub settings: Settings,
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Flushing CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?.trim_end().to_string())
}

pub fn entries_to_csv(entries: &[FuelEntry], vehicles: &[Vehicle]) -> Result<String> {
    entries_to_csv_in(entries, vehicles, &Local)
}

/// Entries as CSV with dates rendered in `tz`.
pub fn entries_to_csv_in<Tz: TimeZone>(
    entries: &[FuelEntry],
    vehicles: &[Vehicle],
    tz: &Tz,
) -> Result<String>
where
    Tz::Offset: std::fmt::Display,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ENTRY_HEADERS)?;

    for entry in entries {
        let vehicle_name = vehicles
            .iter()
            .find(|v| v.id == entry.vehicle_id)
            .map(|v| v.name.as_str())
            .unwrap_or("Unknown");
        writer.write_record([
            format_date(&entry.date.with_timezone(tz)),
            vehicle_name.to_string(),
            entry.fuel_type.map(|f| f.as_str()).unwrap_or("regular").to_string(),
            format!("{:.2}", entry.amount),
            format!("{:.2}", entry.price),
            format!("{:.2}", entry.total_cost),
            entry.odometer.to_string(),
            if entry.is_full { "Yes" } else { "No" }.to_string(),
            entry.notes.clone().unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

pub fn vehicles_to_csv(vehicles: &[Vehicle]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(VEHICLE_HEADERS)?;

    for vehicle in vehicles {
        writer.write_record([
            vehicle.name.clone(),
            vehicle.make.clone(),
            vehicle.model.clone(),
            vehicle.year.to_string(),
            vehicle.vehicle_type.as_str().to_string(),
            vehicle.vehicle_class.map(|c| c.as_str()).unwrap_or("").to_string(),
            vehicle.initial_odometer.to_string(),
            vehicle.tank_capacity.map(|t| t.to_string()).unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

pub fn export_json(
    vehicles: &[Vehicle],
    entries: &[FuelEntry],
    settings: &Settings,
) -> Result<String> {
    let data = ExportData {
        vehicles: vehicles.to_vec(),
        entries: entries.to_vec(),
        settings: settings.clone(),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

/// Reads a backup produced by [`export_json`].
pub fn parse_backup(content: &str) -> Result<ExportData> {
    serde_json::from_str(content).context("Parsing backup")
}

fn stamp() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Writes a CSV export into `dir` and returns its path.
pub fn write_csv_export(
    dir: &Path,
    kind: ExportKind,
    entries: &[FuelEntry],
    vehicles: &[Vehicle],
) -> Result<PathBuf> {
    let (content, file_name) = match kind {
        ExportKind::Entries => (
            entries_to_csv(entries, vehicles)?,
            format!("fuelmate_entries_{}.csv", stamp()),
        ),
        ExportKind::Vehicles => (
            vehicles_to_csv(vehicles)?,
            format!("fuelmate_vehicles_{}.csv", stamp()),
        ),
        ExportKind::All => (
            format!(
                "=== FUEL ENTRIES ===\n{}\n\n=== VEHICLES ===\n{}",
                entries_to_csv(entries, vehicles)?,
                vehicles_to_csv(vehicles)?
            ),
            format!("fuelmate_export_{}.csv", stamp()),
        ),
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, content).with_context(|| format!("Writing {}", path.display()))?;
    log::info!("Exported {:?} to {}", kind, path.display());
    Ok(path)
}

pub fn write_json_backup(
    dir: &Path,
    vehicles: &[Vehicle],
    entries: &[FuelEntry],
    settings: &Settings,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("fuelmate_backup_{}.json", stamp()));
    fs::write(&path, export_json(vehicles, entries, settings)?)
        .with_context(|| format!("Writing {}", path.display()))?;
    log::info!("Wrote backup to {}", path.display());
    Ok(path)
}
