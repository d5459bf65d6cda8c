use anyhow::Result;
use uuid::Uuid;

use crate::model::entry::FuelEntry;
use crate::model::expense::Expense;
use crate::model::settings::Settings;
use crate::model::vehicle::Vehicle;

pub trait VehicleRepository {
    fn create(&self, vehicle: Vehicle) -> Result<Vehicle>;
    fn get(&self, id: &Uuid) -> Result<Option<Vehicle>>;
    fn list(&self) -> Result<Vec<Vehicle>>;
    fn update(&self, vehicle: &Vehicle) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}

pub trait FuelEntryRepository {
    fn create(&self, entry: FuelEntry) -> Result<FuelEntry>;
    fn get(&self, id: &Uuid) -> Result<Option<FuelEntry>>;
    fn list(&self) -> Result<Vec<FuelEntry>>;
    fn update(&self, entry: &FuelEntry) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;

    /// Entries of one vehicle in storage order.
    fn list_by_vehicle(&self, vehicle_id: &Uuid) -> Result<Vec<FuelEntry>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.vehicle_id == *vehicle_id)
            .collect())
    }

    fn delete_by_vehicle(&self, vehicle_id: &Uuid) -> Result<usize> {
        let doomed = self.list_by_vehicle(vehicle_id)?;
        for entry in &doomed {
            self.delete(&entry.id)?;
        }
        Ok(doomed.len())
    }
}

pub trait ExpenseRepository {
    fn create(&self, expense: Expense) -> Result<Expense>;
    fn get(&self, id: &Uuid) -> Result<Option<Expense>>;
    fn list(&self) -> Result<Vec<Expense>>;
    fn update(&self, expense: &Expense) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;

    fn list_by_vehicle(&self, vehicle_id: &Uuid) -> Result<Vec<Expense>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.vehicle_id == *vehicle_id)
            .collect())
    }

    fn delete_by_vehicle(&self, vehicle_id: &Uuid) -> Result<usize> {
        let doomed = self.list_by_vehicle(vehicle_id)?;
        for expense in &doomed {
            self.delete(&expense.id)?;
        }
        Ok(doomed.len())
    }
}

pub trait SettingsRepository {
    /// Falls back to `Settings::default()` when nothing was saved yet.
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

impl<T: VehicleRepository + ?Sized> VehicleRepository for &T {
    fn create(&self, vehicle: Vehicle) -> Result<Vehicle> {
        (**self).create(vehicle)
    }
    fn get(&self, id: &Uuid) -> Result<Option<Vehicle>> {
        (**self).get(id)
    }
    fn list(&self) -> Result<Vec<Vehicle>> {
        (**self).list()
    }
    fn update(&self, vehicle: &Vehicle) -> Result<()> {
        (**self).update(vehicle)
    }
    fn delete(&self, id: &Uuid) -> Result<()> {
        (**self).delete(id)
    }
}

impl<T: FuelEntryRepository + ?Sized> FuelEntryRepository for &T {
    fn create(&self, entry: FuelEntry) -> Result<FuelEntry> {
        (**self).create(entry)
    }
    fn get(&self, id: &Uuid) -> Result<Option<FuelEntry>> {
        (**self).get(id)
    }
    fn list(&self) -> Result<Vec<FuelEntry>> {
        (**self).list()
    }
    fn update(&self, entry: &FuelEntry) -> Result<()> {
        (**self).update(entry)
    }
    fn delete(&self, id: &Uuid) -> Result<()> {
        (**self).delete(id)
    }
    fn list_by_vehicle(&self, vehicle_id: &Uuid) -> Result<Vec<FuelEntry>> {
        (**self).list_by_vehicle(vehicle_id)
    }
    fn delete_by_vehicle(&self, vehicle_id: &Uuid) -> Result<usize> {
        (**self).delete_by_vehicle(vehicle_id)
    }
}

impl<T: ExpenseRepository + ?Sized> ExpenseRepository for &T {
    fn create(&self, expense: Expense) -> Result<Expense> {
        (**self).create(expense)
    }
    fn get(&self, id: &Uuid) -> Result<Option<Expense>> {
        (**self).get(id)
    }
    fn list(&self) -> Result<Vec<Expense>> {
        (**self).list()
    }
    fn update(&self, expense: &Expense) -> Result<()> {
        (**self).update(expense)
    }
    fn delete(&self, id: &Uuid) -> Result<()> {
        (**self).delete(id)
    }
    fn list_by_vehicle(&self, vehicle_id: &Uuid) -> Result<Vec<Expense>> {
        (**self).list_by_vehicle(vehicle_id)
    }
    fn delete_by_vehicle(&self, vehicle_id: &Uuid) -> Result<usize> {
        (**self).delete_by_vehicle(vehicle_id)
    }
}

impl<T: SettingsRepository + ?Sized> SettingsRepository for &T {
    fn load(&self) -> Result<Settings> {
        (**self).load()
    }
    fn save(&self, settings: &Settings) -> Result<()> {
        (**self).save(settings)
    }
}
