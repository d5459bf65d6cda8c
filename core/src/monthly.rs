use std::collections::HashMap;

use chrono::{Datelike, Local, TimeZone, Utc};
use log::debug;

use crate::model::entry::FuelEntry;
use crate::model::settings::{DistanceUnit, VolumeUnit};
use crate::model::stats::MonthlyStat;
use crate::units::{correct_efficiency, round2};

/// Monthly rollup of one vehicle's entries, bucketed in the local time zone.
pub fn monthly_stats(
    vehicle_entries: &[FuelEntry],
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
) -> Vec<MonthlyStat> {
    monthly_stats_in(vehicle_entries, distance_unit, volume_unit, &Local)
}

/// Monthly rollup of one vehicle's entries, most recent month first.
///
/// Unlike the pairwise calculators, partial fills count here. Each entry's distance is
/// measured against its chronological predecessor in the whole history, so the first
/// fill of a month reaches back into the previous month.
pub fn monthly_stats_in<Tz: TimeZone>(
    vehicle_entries: &[FuelEntry],
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
    tz: &Tz,
) -> Vec<MonthlyStat> {
    let mut sorted: Vec<&FuelEntry> = vehicle_entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut buckets: HashMap<(i32, u32), MonthlyStat> = HashMap::new();

    for (i, entry) in sorted.iter().enumerate() {
        let local = entry.date.with_timezone(tz);
        let key = (local.year(), local.month());
        let stat = buckets.entry(key).or_insert_with(|| {
            let start = tz
                .with_ymd_and_hms(key.0, key.1, 1, 0, 0, 0)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(entry.date);
            MonthlyStat::new(key.0, key.1, start)
        });

        stat.total_cost += entry.total_cost;
        stat.total_fuel += entry.amount;

        if let Some(predecessor) = sorted.get(i + 1) {
            let distance = entry.odometer - predecessor.odometer;
            if predecessor.vehicle_id == entry.vehicle_id && distance > 0.0 {
                stat.total_distance += distance;
            } else {
                debug!("Entry {} adds no distance to {:?}", entry.id, key);
            }
        }
    }

    let mut keys: Vec<_> = buckets.keys().cloned().collect();
    keys.sort_by(|a, b| b.cmp(a));

    keys.into_iter()
        .filter_map(|key| buckets.remove(&key))
        .map(|stat| finalize(stat, distance_unit, volume_unit))
        .collect()
}

fn finalize(
    mut stat: MonthlyStat,
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
) -> MonthlyStat {
    if stat.total_distance > 0.0 && stat.total_fuel > 0.0 {
        let raw = stat.total_distance / stat.total_fuel;
        stat.efficiency = Some(round2(correct_efficiency(raw, distance_unit, volume_unit)));
    }
    if stat.total_distance > 0.0 {
        stat.cost_per_distance = Some(round2(stat.total_cost / stat.total_distance));
    }
    stat.total_cost = round2(stat.total_cost);
    stat.total_fuel = round2(stat.total_fuel);
    stat.total_distance = round2(stat.total_distance);
    stat
}
