use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::efficiency::{average_efficiency, fuel_efficiency};
use crate::model::entry::FuelEntry;
use crate::model::settings::{DistanceUnit, VolumeUnit};
use crate::model::vehicle::Vehicle;
use crate::repository::{ExpenseRepository, FuelEntryRepository, VehicleRepository};
use crate::resolver::{latest_entry, previous_entry};
use crate::units::round2;

/// Everything the vehicle overview shows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub vehicle: Vehicle,
    pub entry_count: usize,
    pub latest_entry: Option<FuelEntry>,
    pub latest_efficiency: Option<f64>,
    pub average_efficiency: Option<f64>,
    pub total_spent: f64,
    pub total_fuel: f64,
    pub distance_driven: f64,
    pub expense_total: f64,
}

pub struct VehicleSummaryUseCase<'a, V, E, X>
where
    V: VehicleRepository,
    E: FuelEntryRepository,
    X: ExpenseRepository,
{
    vehicles: &'a V,
    entries: &'a E,
    expenses: &'a X,
}

impl<'a, V, E, X> VehicleSummaryUseCase<'a, V, E, X>
where
    V: VehicleRepository,
    E: FuelEntryRepository,
    X: ExpenseRepository,
{
    pub fn new(vehicles: &'a V, entries: &'a E, expenses: &'a X) -> Self {
        Self {
            vehicles,
            entries,
            expenses,
        }
    }

    pub fn summary(
        &self,
        vehicle_id: &Uuid,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
    ) -> Result<VehicleSummary> {
        let vehicle = self
            .vehicles
            .get(vehicle_id)?
            .ok_or_else(|| anyhow!("Vehicle with ID {} not found", vehicle_id))?;
        let entries = self.entries.list_by_vehicle(vehicle_id)?;

        let latest = latest_entry(vehicle_id, &entries);
        let latest_efficiency = latest.and_then(|l| {
            let previous = previous_entry(vehicle_id, &entries, &l.id);
            fuel_efficiency(l, previous, distance_unit, volume_unit)
        });
        let distance_driven = latest
            .map(|l| (l.odometer - vehicle.initial_odometer).max(0.0))
            .unwrap_or(0.0);

        let total_spent: f64 = entries.iter().map(|e| e.total_cost).sum();
        let total_fuel: f64 = entries.iter().map(|e| e.amount).sum();
        let expense_total: f64 = self
            .expenses
            .list_by_vehicle(vehicle_id)?
            .iter()
            .map(|e| e.amount)
            .sum();

        Ok(VehicleSummary {
            entry_count: entries.len(),
            latest_entry: latest.cloned(),
            latest_efficiency,
            average_efficiency: average_efficiency(
                &entries,
                vehicle_id,
                distance_unit,
                volume_unit,
            ),
            total_spent: round2(total_spent),
            total_fuel: round2(total_fuel),
            distance_driven: round2(distance_driven),
            expense_total: round2(expense_total),
            vehicle,
        })
    }
}
