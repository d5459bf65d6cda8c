use anyhow::{anyhow, bail, Result};
use log::info;
use uuid::Uuid;

use crate::model::vehicle::Vehicle;
use crate::time::now_millis;
use crate::repository::{
    ExpenseRepository, FuelEntryRepository, SettingsRepository, VehicleRepository,
};

/// Minimum length of an id prefix accepted by [`VehicleService::find_vehicle`].
const MIN_ID_PREFIX: usize = 4;

pub struct VehicleService<V, E, X, S>
where
    V: VehicleRepository,
    E: FuelEntryRepository,
    X: ExpenseRepository,
    S: SettingsRepository,
{
    vehicles: V,
    entries: E,
    expenses: X,
    settings: S,
}

impl<V, E, X, S> VehicleService<V, E, X, S>
where
    V: VehicleRepository,
    E: FuelEntryRepository,
    X: ExpenseRepository,
    S: SettingsRepository,
{
    pub fn new(vehicles: V, entries: E, expenses: X, settings: S) -> Self {
        Self {
            vehicles,
            entries,
            expenses,
            settings,
        }
    }

    pub fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle> {
        if vehicle.name.trim().is_empty() {
            bail!("Vehicle name is required");
        }
        if !(vehicle.initial_odometer.is_finite() && vehicle.initial_odometer >= 0.0) {
            bail!("Enter a valid initial odometer reading: {}", vehicle.initial_odometer);
        }
        let created = self.vehicles.create(vehicle)?;
        info!("Added vehicle {} ({})", created.name, created.id);

        let mut settings = self.settings.load()?;
        if settings.selected_vehicle_id.is_none() {
            settings.selected_vehicle_id = Some(created.id);
            self.settings.save(&settings)?;
        }
        Ok(created)
    }

    pub fn get_vehicle(&self, id: &Uuid) -> Result<Vehicle> {
        self.vehicles
            .get(id)?
            .ok_or_else(|| anyhow!("Vehicle with ID {} not found", id))
    }

    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.vehicles.list()
    }

    pub fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let mut updated = vehicle.clone();
        updated.updated_at = now_millis();
        self.vehicles.update(&updated)?;
        Ok(updated)
    }

    /// Deletes the vehicle with its fuel entries and expenses.
    pub fn delete_vehicle(&self, id: &Uuid) -> Result<()> {
        self.vehicles.delete(id)?;
        let entries = self.entries.delete_by_vehicle(id)?;
        let expenses = self.expenses.delete_by_vehicle(id)?;
        info!(
            "Deleted vehicle {} with {} fuel entries and {} expenses",
            id, entries, expenses
        );

        let mut settings = self.settings.load()?;
        if settings.selected_vehicle_id == Some(*id) {
            settings.selected_vehicle_id = self.vehicles.list()?.first().map(|v| v.id);
            self.settings.save(&settings)?;
        }
        Ok(())
    }

    pub fn select_vehicle(&self, id: &Uuid) -> Result<()> {
        self.get_vehicle(id)?;
        let mut settings = self.settings.load()?;
        settings.selected_vehicle_id = Some(*id);
        self.settings.save(&settings)
    }

    pub fn selected_vehicle(&self) -> Result<Option<Vehicle>> {
        match self.settings.load()?.selected_vehicle_id {
            Some(id) => self.vehicles.get(&id),
            None => Ok(None),
        }
    }

    /// Resolves a vehicle from user input: full id, id prefix, or name (prefix).
    pub fn find_vehicle(&self, key: &str) -> Result<Vehicle> {
        let key = key.trim();
        let vehicles = self.vehicles.list()?;

        // 1. Exact id or name
        if let Some(v) = vehicles
            .iter()
            .find(|v| v.id.to_string() == key || v.name.eq_ignore_ascii_case(key))
        {
            return Ok(v.clone());
        }

        // 2. Prefix match
        let needle = key.to_lowercase();
        let matches: Vec<&Vehicle> = vehicles
            .iter()
            .filter(|v| {
                (key.len() >= MIN_ID_PREFIX && v.id.to_string().starts_with(&needle))
                    || v.name.to_lowercase().starts_with(&needle)
            })
            .collect();

        match matches.len() {
            1 => Ok(matches[0].clone()),
            0 => Err(anyhow!("Unknown vehicle: '{}'", key)),
            _ => Err(anyhow!(
                "Ambiguous vehicle: '{}' matches {:?}",
                key,
                matches.iter().map(|v| v.name.as_str()).collect::<Vec<_>>()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::FuelEntry;
    use crate::model::expense::{Expense, ExpenseType};
    use crate::model::vehicle::VehicleType;
    use crate::repository::{InMemoryRepository, InMemorySettingsRepository};
    use chrono::Utc;

    struct Fixture {
        vehicles: InMemoryRepository<Vehicle>,
        entries: InMemoryRepository<FuelEntry>,
        expenses: InMemoryRepository<Expense>,
        settings: InMemorySettingsRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                vehicles: InMemoryRepository::new(),
                entries: InMemoryRepository::new(),
                expenses: InMemoryRepository::new(),
                settings: InMemorySettingsRepository::default(),
            }
        }

        fn service(
            &self,
        ) -> VehicleService<
            &InMemoryRepository<Vehicle>,
            &InMemoryRepository<FuelEntry>,
            &InMemoryRepository<Expense>,
            &InMemorySettingsRepository,
        > {
            VehicleService::new(&self.vehicles, &self.entries, &self.expenses, &self.settings)
        }
    }

    fn vehicle(name: &str) -> Vehicle {
        Vehicle::new(name.to_string(), VehicleType::Petrol, 1000.0)
    }

    #[test]
    fn test_first_vehicle_is_selected() {
        let fx = Fixture::new();
        let service = fx.service();
        let first = service.add_vehicle(vehicle("Civic")).unwrap();
        service.add_vehicle(vehicle("Jazz")).unwrap();

        assert_eq!(service.selected_vehicle().unwrap().unwrap().id, first.id);
    }

    #[test]
    fn test_add_vehicle_validation() {
        let fx = Fixture::new();
        let service = fx.service();
        assert!(service.add_vehicle(vehicle("  ")).is_err());
        let mut negative = vehicle("Civic");
        negative.initial_odometer = -5.0;
        assert!(service.add_vehicle(negative).is_err());
        let mut endless = vehicle("Jazz");
        endless.initial_odometer = f64::INFINITY;
        assert!(service.add_vehicle(endless).is_err());
        assert!(service.list_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_delete_cascades_and_moves_selection() {
        let fx = Fixture::new();
        let service = fx.service();
        let civic = service.add_vehicle(vehicle("Civic")).unwrap();
        let jazz = service.add_vehicle(vehicle("Jazz")).unwrap();

        let date = Utc::now();
        fx.entries
            .create(FuelEntry::new(civic.id, date, 20.0, 100.0, 1200.0, true))
            .unwrap();
        fx.entries
            .create(FuelEntry::new(jazz.id, date, 20.0, 100.0, 1200.0, true))
            .unwrap();
        fx.expenses
            .create(Expense::new(civic.id, ExpenseType::Insurance, 500.0, date, String::new()))
            .unwrap();

        service.delete_vehicle(&civic.id).unwrap();

        assert_eq!(fx.entries.list().unwrap().len(), 1);
        assert!(fx.expenses.list().unwrap().is_empty());
        assert_eq!(service.selected_vehicle().unwrap().unwrap().id, jazz.id);

        service.delete_vehicle(&jazz.id).unwrap();
        assert!(service.selected_vehicle().unwrap().is_none());
        assert!(service.delete_vehicle(&jazz.id).is_err());
    }

    #[test]
    fn test_find_vehicle() {
        let fx = Fixture::new();
        let service = fx.service();
        let civic = service.add_vehicle(vehicle("Civic")).unwrap();
        service.add_vehicle(vehicle("City")).unwrap();
        service.add_vehicle(vehicle("Jazz")).unwrap();

        assert_eq!(service.find_vehicle("civic").unwrap().id, civic.id);
        assert_eq!(service.find_vehicle("j").unwrap().name, "Jazz");
        assert_eq!(service.find_vehicle(&civic.id.to_string()).unwrap().id, civic.id);
        assert_eq!(service.find_vehicle(&civic.id.to_string()[..8]).unwrap().id, civic.id);
        assert!(service.find_vehicle("ci").is_err()); // Civic, City
        assert!(service.find_vehicle("tesla").is_err());
    }

    #[test]
    fn test_select_unknown_vehicle_fails() {
        let fx = Fixture::new();
        let service = fx.service();
        assert!(service.select_vehicle(&Uuid::new_v4()).is_err());
    }
}
