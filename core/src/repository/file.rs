use std::path::PathBuf;

use anyhow::Result;
use uuid::Uuid;

use crate::model::entry::FuelEntry;
use crate::model::expense::Expense;
use crate::model::vehicle::Vehicle;
use crate::repository::store::{data_dir, JsonStore};
use crate::repository::traits::{ExpenseRepository, FuelEntryRepository, VehicleRepository};

const VEHICLES_FILE_NAME: &str = "vehicles.json";
const FUEL_ENTRIES_FILE_NAME: &str = "fuel_entries.json";
const EXPENSES_FILE_NAME: &str = "expenses.json";

#[derive(Clone)]
pub struct FileVehicleRepository {
    store: JsonStore<Vehicle>,
}

impl FileVehicleRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir(base_dir)?;
        Ok(Self {
            store: JsonStore::open(&dir, VEHICLES_FILE_NAME)?,
        })
    }
}

impl VehicleRepository for FileVehicleRepository {
    fn create(&self, vehicle: Vehicle) -> Result<Vehicle> {
        self.store.create(vehicle)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Vehicle>> {
        self.store.get(id)
    }

    fn list(&self) -> Result<Vec<Vehicle>> {
        self.store.read_all()
    }

    fn update(&self, vehicle: &Vehicle) -> Result<()> {
        self.store.update(vehicle)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        self.store.delete(id)
    }
}

#[derive(Clone)]
pub struct FileFuelEntryRepository {
    store: JsonStore<FuelEntry>,
}

impl FileFuelEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir(base_dir)?;
        Ok(Self {
            store: JsonStore::open(&dir, FUEL_ENTRIES_FILE_NAME)?,
        })
    }
}

impl FuelEntryRepository for FileFuelEntryRepository {
    fn create(&self, entry: FuelEntry) -> Result<FuelEntry> {
        self.store.create(entry)
    }

    fn get(&self, id: &Uuid) -> Result<Option<FuelEntry>> {
        self.store.get(id)
    }

    fn list(&self) -> Result<Vec<FuelEntry>> {
        self.store.read_all()
    }

    fn update(&self, entry: &FuelEntry) -> Result<()> {
        self.store.update(entry)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        self.store.delete(id)
    }

    fn delete_by_vehicle(&self, vehicle_id: &Uuid) -> Result<usize> {
        self.store.delete_where(|e| e.vehicle_id == *vehicle_id)
    }
}

#[derive(Clone)]
pub struct FileExpenseRepository {
    store: JsonStore<Expense>,
}

impl FileExpenseRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir(base_dir)?;
        Ok(Self {
            store: JsonStore::open(&dir, EXPENSES_FILE_NAME)?,
        })
    }
}

impl ExpenseRepository for FileExpenseRepository {
    fn create(&self, expense: Expense) -> Result<Expense> {
        self.store.create(expense)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Expense>> {
        self.store.get(id)
    }

    fn list(&self) -> Result<Vec<Expense>> {
        self.store.read_all()
    }

    fn update(&self, expense: &Expense) -> Result<()> {
        self.store.update(expense)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        self.store.delete(id)
    }

    fn delete_by_vehicle(&self, vehicle_id: &Uuid) -> Result<usize> {
        self.store.delete_where(|e| e.vehicle_id == *vehicle_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vehicle::VehicleType;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn entry(vehicle_id: Uuid, odometer: f64) -> FuelEntry {
        let date = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
        FuelEntry::new(vehicle_id, date, 25.0, 102.5, odometer, true)
    }

    #[test]
    fn test_files_are_created_empty() {
        let dir = TempDir::new().unwrap();
        let repo = FileVehicleRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(dir.path().join(VEHICLES_FILE_NAME).exists());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_entry_crud_roundtrip_through_disk() {
        let dir = TempDir::new().unwrap();
        let repo = FileFuelEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let vehicle_id = Uuid::new_v4();

        let created = repo.create(entry(vehicle_id, 1000.0)).unwrap();
        repo.create(entry(Uuid::new_v4(), 50.0)).unwrap();

        // A second handle sees what the first one wrote.
        let reopened = FileFuelEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let loaded = reopened.get(&created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(reopened.list_by_vehicle(&vehicle_id).unwrap().len(), 1);

        let mut edited = loaded.clone();
        edited.notes = Some("highway trip".to_string());
        reopened.update(&edited).unwrap();
        assert_eq!(
            repo.get(&created.id).unwrap().unwrap().notes.as_deref(),
            Some("highway trip")
        );

        repo.delete(&created.id).unwrap();
        assert!(repo.get(&created.id).unwrap().is_none());
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let dir = TempDir::new().unwrap();
        let repo = FileFuelEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let ghost = entry(Uuid::new_v4(), 1.0);

        assert!(repo.update(&ghost).is_err());
        assert!(repo.delete(&ghost.id).is_err());
    }

    #[test]
    fn test_delete_by_vehicle() {
        let dir = TempDir::new().unwrap();
        let repo = FileExpenseRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let vehicles = FileVehicleRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let car = vehicles
            .create(Vehicle::new("Civic".to_string(), VehicleType::Petrol, 0.0))
            .unwrap();
        let date = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
        for amount in [10.0, 20.0] {
            repo.create(Expense::new(
                car.id,
                crate::model::expense::ExpenseType::Tax,
                amount,
                date,
                String::new(),
            ))
            .unwrap();
        }

        assert_eq!(repo.delete_by_vehicle(&car.id).unwrap(), 2);
        assert_eq!(repo.delete_by_vehicle(&car.id).unwrap(), 0);
        assert!(repo.list().unwrap().is_empty());
    }
}
