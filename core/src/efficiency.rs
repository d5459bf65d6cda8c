use log::debug;
use uuid::Uuid;

use crate::model::entry::FuelEntry;
use crate::model::settings::{DistanceUnit, VolumeUnit};
use crate::model::stats::EfficiencyPoint;
use crate::resolver::entries_for_vehicle;
use crate::units::{correct_efficiency, round2};

/// Odometer delta between two full fills, or `None` when the pair cannot be trusted.
fn full_fill_distance(current: &FuelEntry, previous: Option<&FuelEntry>) -> Option<f64> {
    let previous = previous?;
    if !current.is_full || !previous.is_full {
        return None;
    }
    let distance = current.odometer - previous.odometer;
    // NaN fails this check too, so corrupted readings degrade to None.
    if distance > 0.0 {
        Some(distance)
    } else {
        debug!(
            "Skipping entry {}: non-positive distance {} since {}",
            current.id, distance, previous.id
        );
        None
    }
}

/// Distance per unit of fuel between two consecutive full fills.
pub fn fuel_efficiency(
    current: &FuelEntry,
    previous: Option<&FuelEntry>,
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
) -> Option<f64> {
    let distance = full_fill_distance(current, previous)?;
    let volume = current.amount;
    if !(volume > 0.0) {
        return None;
    }
    Some(round2(correct_efficiency(distance / volume, distance_unit, volume_unit)))
}

/// Money spent per unit of distance between two consecutive full fills.
///
/// Odometer readings are assumed to already be in `distance_unit`; the unit only
/// decides the label shown next to the value.
pub fn cost_per_distance(
    current: &FuelEntry,
    previous: Option<&FuelEntry>,
    _distance_unit: DistanceUnit,
) -> Option<f64> {
    let distance = full_fill_distance(current, previous)?;
    Some(round2(current.total_cost / distance))
}

/// Lifetime efficiency of a vehicle: total distance over total fuel across
/// consecutive full fills. Partial fills are dropped before pairing.
pub fn average_efficiency(
    entries: &[FuelEntry],
    vehicle_id: &Uuid,
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
) -> Option<f64> {
    let full_fills: Vec<&FuelEntry> = entries_for_vehicle(vehicle_id, entries)
        .into_iter()
        .filter(|e| e.is_full)
        .collect();
    if full_fills.len() < 2 {
        return None;
    }

    let mut total_distance = 0.0;
    let mut total_volume = 0.0;
    for pair in full_fills.windows(2) {
        let distance = pair[1].odometer - pair[0].odometer;
        if distance > 0.0 {
            total_distance += distance;
            total_volume += pair[1].amount;
        }
    }

    if !(total_distance > 0.0) || !(total_volume > 0.0) {
        return None;
    }
    Some(round2(correct_efficiency(
        total_distance / total_volume,
        distance_unit,
        volume_unit,
    )))
}

/// Efficiency and cost for every entry of the vehicle that has a qualifying predecessor,
/// oldest first.
pub fn efficiency_history(
    entries: &[FuelEntry],
    vehicle_id: &Uuid,
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
) -> Vec<EfficiencyPoint> {
    let sorted = entries_for_vehicle(vehicle_id, entries);
    sorted
        .windows(2)
        .filter_map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            let efficiency = fuel_efficiency(current, Some(previous), distance_unit, volume_unit)?;
            let cost = cost_per_distance(current, Some(previous), distance_unit)?;
            Some(EfficiencyPoint {
                date: current.date,
                efficiency,
                cost,
            })
        })
        .collect()
}
