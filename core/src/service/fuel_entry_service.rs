use anyhow::{anyhow, bail, Result};
use log::{info, warn};
use uuid::Uuid;

use crate::model::entry::FuelEntry;
use crate::model::settings::{DistanceUnit, VolumeUnit};
use crate::repository::{FuelEntryRepository, VehicleRepository};
use crate::resolver::{latest_entry, previous_entry};
use crate::service::dto::FuelEntryDto;
use crate::time::now_millis;

pub struct FuelEntryService<E: FuelEntryRepository, V: VehicleRepository> {
    entries: E,
    vehicles: V,
}

impl<E: FuelEntryRepository, V: VehicleRepository> FuelEntryService<E, V> {
    pub fn new(entries: E, vehicles: V) -> Self {
        Self { entries, vehicles }
    }

    /// Validates and stores a new entry. Amount and price must be positive and the
    /// odometer must move past both the initial reading and the latest entry.
    pub fn add_entry(&self, entry: FuelEntry) -> Result<FuelEntry> {
        let vehicle = self
            .vehicles
            .get(&entry.vehicle_id)?
            .ok_or_else(|| {
                anyhow!("Please select a vehicle: {} does not exist", entry.vehicle_id)
            })?;

        if !(entry.amount.is_finite() && entry.amount > 0.0) {
            bail!("Enter a valid amount: {}", entry.amount);
        }
        if !(entry.price.is_finite() && entry.price > 0.0) {
            bail!("Enter a valid price: {}", entry.price);
        }
        if !(entry.odometer.is_finite() && entry.odometer >= 0.0) {
            bail!("Enter a valid odometer reading: {}", entry.odometer);
        }
        if entry.odometer < vehicle.initial_odometer {
            bail!(
                "Odometer reading {} is below the vehicle's initial reading {}",
                entry.odometer,
                vehicle.initial_odometer
            );
        }

        let existing = self.entries.list_by_vehicle(&entry.vehicle_id)?;
        if let Some(latest) = latest_entry(&entry.vehicle_id, &existing) {
            if entry.odometer <= latest.odometer {
                warn!(
                    "Rejected entry for {}: odometer {} <= {}",
                    vehicle.name, entry.odometer, latest.odometer
                );
                bail!(
                    "Odometer reading must be greater than the previous entry ({})",
                    latest.odometer
                );
            }
        }

        let created = self.entries.create(entry)?;
        info!("Added fuel entry {} for {}", created.id, vehicle.name);
        Ok(created)
    }

    pub fn get_entry(&self, id: &Uuid) -> Result<FuelEntry> {
        self.entries
            .get(id)?
            .ok_or_else(|| anyhow!("Fuel entry with ID {} not found", id))
    }

    /// Saves edits to an existing entry, re-deriving its total cost.
    pub fn update_entry(&self, entry: &FuelEntry) -> Result<FuelEntry> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(entry.amount) || !positive(entry.price) {
            bail!("Amount and price must be greater than zero");
        }
        let mut updated = entry.clone();
        updated.recompute_total();
        updated.updated_at = now_millis();
        self.entries.update(&updated)?;
        info!("Updated fuel entry {}", updated.id);
        Ok(updated)
    }

    pub fn delete_entry(&self, id: &Uuid) -> Result<()> {
        self.entries.delete(id)?;
        info!("Deleted fuel entry {}", id);
        Ok(())
    }

    /// The vehicle's entries, newest first, each with its derived figures.
    pub fn entries_for_vehicle(
        &self,
        vehicle_id: &Uuid,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
    ) -> Result<Vec<FuelEntryDto>> {
        let entries = self.entries.list_by_vehicle(vehicle_id)?;
        let mut dtos: Vec<FuelEntryDto> = entries
            .iter()
            .map(|e| {
                let previous = previous_entry(vehicle_id, &entries, &e.id);
                FuelEntryDto::from_entity(e.clone(), previous, distance_unit, volume_unit)
            })
            .collect();
        dtos.sort_by(|a, b| b.entry.date.cmp(&a.entry.date));
        Ok(dtos)
    }

    pub fn entry_details(
        &self,
        id: &Uuid,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
    ) -> Result<FuelEntryDto> {
        let entry = self.get_entry(id)?;
        let siblings = self.entries.list_by_vehicle(&entry.vehicle_id)?;
        let previous = previous_entry(&entry.vehicle_id, &siblings, &entry.id);
        Ok(FuelEntryDto::from_entity(entry, previous, distance_unit, volume_unit))
    }

    /// Odometer of the most recent entry, or the vehicle's initial reading.
    pub fn last_odometer(&self, vehicle_id: &Uuid) -> Result<Option<f64>> {
        let entries = self.entries.list_by_vehicle(vehicle_id)?;
        if let Some(latest) = latest_entry(vehicle_id, &entries) {
            return Ok(Some(latest.odometer));
        }
        Ok(self.vehicles.get(vehicle_id)?.map(|v| v.initial_odometer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vehicle::{Vehicle, VehicleType};
    use crate::repository::InMemoryRepository;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap()
    }

    fn setup() -> (InMemoryRepository<FuelEntry>, InMemoryRepository<Vehicle>, Vehicle) {
        let vehicles: InMemoryRepository<Vehicle> = InMemoryRepository::new();
        let car = vehicles
            .create(Vehicle::new("Swift".to_string(), VehicleType::Petrol, 4000.0))
            .unwrap();
        (InMemoryRepository::new(), vehicles, car)
    }

    #[test]
    fn test_add_entry_validates_odometer() {
        let (entries, vehicles, car) = setup();
        let service = FuelEntryService::new(&entries, &vehicles);

        service
            .add_entry(FuelEntry::new(car.id, date(5), 30.0, 100.0, 5000.0, true))
            .unwrap();

        let same = service.add_entry(FuelEntry::new(car.id, date(20), 32.0, 100.0, 5000.0, true));
        assert!(same.is_err());
        let below_initial = FuelEntry::new(car.id, date(1), 32.0, 100.0, 3500.0, true);
        assert!(service.add_entry(below_initial).is_err());

        service
            .add_entry(FuelEntry::new(car.id, date(20), 32.0, 100.0, 5400.0, true))
            .unwrap();
        assert_eq!(entries.list().unwrap().len(), 2);
    }

    #[test]
    fn test_add_entry_rejects_non_finite_numbers() {
        let (entries, vehicles, car) = setup();
        let service = FuelEntryService::new(&entries, &vehicles);

        let endless = FuelEntry::new(car.id, date(5), 30.0, 100.0, f64::INFINITY, true);
        assert!(service.add_entry(endless).is_err());
        let nan_odo = FuelEntry::new(car.id, date(5), 30.0, 100.0, f64::NAN, true);
        assert!(service.add_entry(nan_odo).is_err());
        let huge_amount = FuelEntry::new(car.id, date(5), f64::INFINITY, 100.0, 5000.0, true);
        assert!(service.add_entry(huge_amount).is_err());
        let huge_price = FuelEntry::new(car.id, date(5), 30.0, f64::INFINITY, 5000.0, true);
        assert!(service.add_entry(huge_price).is_err());
        assert!(entries.list().unwrap().is_empty());

        // Later fills are still accepted
        service
            .add_entry(FuelEntry::new(car.id, date(6), 30.0, 100.0, 5000.0, true))
            .unwrap();
        let mut edited = entries.list().unwrap()[0].clone();
        edited.price = f64::INFINITY;
        assert!(service.update_entry(&edited).is_err());
    }

    #[test]
    fn test_add_entry_rejects_bad_input() {
        let (entries, vehicles, car) = setup();
        let service = FuelEntryService::new(&entries, &vehicles);

        let zero_amount = FuelEntry::new(car.id, date(5), 0.0, 100.0, 5000.0, true);
        assert!(service.add_entry(zero_amount).is_err());
        let negative_price = FuelEntry::new(car.id, date(5), 10.0, -1.0, 5000.0, true);
        assert!(service.add_entry(negative_price).is_err());
        let unknown_vehicle = FuelEntry::new(Uuid::new_v4(), date(5), 10.0, 1.0, 5000.0, true);
        assert!(service.add_entry(unknown_vehicle).is_err());
        assert!(entries.list().unwrap().is_empty());
    }

    #[test]
    fn test_entries_for_vehicle_derives_figures() {
        let (entries, vehicles, car) = setup();
        let service = FuelEntryService::new(&entries, &vehicles);
        service
            .add_entry(FuelEntry::new(car.id, date(5), 30.0, 100.0, 5000.0, true))
            .unwrap();
        service
            .add_entry(FuelEntry::new(car.id, date(20), 32.0, 100.0, 5400.0, true))
            .unwrap();

        let dtos = service
            .entries_for_vehicle(&car.id, DistanceUnit::Km, VolumeUnit::L)
            .unwrap();
        assert_eq!(dtos.len(), 2);
        assert_eq!(dtos[0].entry.odometer, 5400.0);
        assert_eq!(dtos[0].distance, Some(400.0));
        assert_eq!(dtos[0].efficiency, Some(12.5));
        assert_eq!(dtos[0].cost_per_distance, Some(8.0));
        assert_eq!(dtos[1].efficiency, None);

        let details = service
            .entry_details(&dtos[0].entry.id, DistanceUnit::Km, VolumeUnit::L)
            .unwrap();
        assert_eq!(details, dtos[0]);
    }

    #[test]
    fn test_update_entry_recomputes_total() {
        let (entries, vehicles, car) = setup();
        let service = FuelEntryService::new(&entries, &vehicles);
        let created = service
            .add_entry(FuelEntry::new(car.id, date(5), 30.0, 100.0, 5000.0, true))
            .unwrap();

        let mut edited = created.clone();
        edited.price = 110.0;
        let saved = service.update_entry(&edited).unwrap();
        assert_eq!(saved.total_cost, 3300.0);
        assert_eq!(service.get_entry(&created.id).unwrap().total_cost, 3300.0);
    }

    #[test]
    fn test_last_odometer_falls_back_to_initial() {
        let (entries, vehicles, car) = setup();
        let service = FuelEntryService::new(&entries, &vehicles);
        assert_eq!(service.last_odometer(&car.id).unwrap(), Some(4000.0));

        service
            .add_entry(FuelEntry::new(car.id, date(5), 30.0, 100.0, 5000.0, true))
            .unwrap();
        assert_eq!(service.last_odometer(&car.id).unwrap(), Some(5000.0));

        service.delete_entry(&entries.list().unwrap()[0].id).unwrap();
        assert_eq!(service.last_odometer(&car.id).unwrap(), Some(4000.0));
        assert_eq!(service.last_odometer(&Uuid::new_v4()).unwrap(), None);
    }
}
