use serde::{Deserialize, Serialize};

use crate::efficiency::{cost_per_distance, fuel_efficiency};
use crate::model::entry::FuelEntry;
use crate::model::settings::{DistanceUnit, VolumeUnit};

/// A fuel entry together with the figures derived against its predecessor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntryDto {
    #[serde(flatten)]
    pub entry: FuelEntry,

    // Derived, never persisted
    pub distance: Option<f64>, // since the previous entry, fill status ignored
    pub efficiency: Option<f64>,
    pub cost_per_distance: Option<f64>,
}

impl FuelEntryDto {
    pub fn from_entity(
        entry: FuelEntry,
        previous: Option<&FuelEntry>,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
    ) -> Self {
        let distance = previous
            .map(|p| entry.odometer - p.odometer)
            .filter(|d| *d > 0.0);
        let efficiency = fuel_efficiency(&entry, previous, distance_unit, volume_unit);
        let cost_per_distance = cost_per_distance(&entry, previous, distance_unit);
        Self {
            entry,
            distance,
            efficiency,
            cost_per_distance,
        }
    }
}
