use std::collections::HashMap;

use uuid::Uuid;

use crate::model::entry::FuelEntry;

/// The vehicle's entries ordered newest first.
///
/// The sort is stable, so entries sharing a date keep their insertion order.
fn newest_first<'a>(vehicle_id: &Uuid, entries: &'a [FuelEntry]) -> Vec<&'a FuelEntry> {
    let mut vehicle_entries: Vec<&FuelEntry> = entries
        .iter()
        .filter(|e| e.vehicle_id == *vehicle_id)
        .collect();
    vehicle_entries.sort_by(|a, b| b.date.cmp(&a.date));
    vehicle_entries
}

/// The vehicle's entries in chronological order. The input slice is left untouched.
pub fn entries_for_vehicle<'a>(vehicle_id: &Uuid, entries: &'a [FuelEntry]) -> Vec<&'a FuelEntry> {
    let mut vehicle_entries: Vec<&FuelEntry> = entries
        .iter()
        .filter(|e| e.vehicle_id == *vehicle_id)
        .collect();
    vehicle_entries.sort_by(|a, b| a.date.cmp(&b.date));
    vehicle_entries
}

pub fn latest_entry<'a>(vehicle_id: &Uuid, entries: &'a [FuelEntry]) -> Option<&'a FuelEntry> {
    newest_first(vehicle_id, entries).into_iter().next()
}

/// The entry recorded immediately before `current_id` for the same vehicle.
///
/// Returns `None` when `current_id` is the oldest entry or does not belong to the vehicle.
pub fn previous_entry<'a>(
    vehicle_id: &Uuid,
    entries: &'a [FuelEntry],
    current_id: &Uuid,
) -> Option<&'a FuelEntry> {
    let sorted = newest_first(vehicle_id, entries);
    let pos = sorted.iter().position(|e| e.id == *current_id)?;
    sorted.get(pos + 1).copied()
}

/// Positions into the indexed slice for one vehicle.
///
/// Both orders come from a stable sort of insertion order, so entries sharing a date
/// line up exactly as the free functions return them.
#[derive(Default)]
struct Positions {
    newest_first: Vec<usize>,
    oldest_first: Vec<usize>,
}

/// Per-vehicle index over a borrowed entry slice.
///
/// Answers the same queries as the free functions without re-filtering and
/// re-sorting on every call. Rebuild it whenever the underlying collection changes.
pub struct EntryIndex<'a> {
    entries: &'a [FuelEntry],
    by_vehicle: HashMap<Uuid, Positions>,
}

impl<'a> EntryIndex<'a> {
    pub fn build(entries: &'a [FuelEntry]) -> Self {
        let mut by_vehicle: HashMap<Uuid, Positions> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            let positions = by_vehicle.entry(entry.vehicle_id).or_default();
            positions.newest_first.push(i);
            positions.oldest_first.push(i);
        }
        for positions in by_vehicle.values_mut() {
            positions
                .newest_first
                .sort_by(|&a, &b| entries[b].date.cmp(&entries[a].date));
            positions
                .oldest_first
                .sort_by(|&a, &b| entries[a].date.cmp(&entries[b].date));
        }
        Self { entries, by_vehicle }
    }

    pub fn vehicle_count(&self) -> usize {
        self.by_vehicle.len()
    }

    pub fn latest(&self, vehicle_id: &Uuid) -> Option<&'a FuelEntry> {
        let entries = self.entries;
        self.by_vehicle
            .get(vehicle_id)
            .and_then(|positions| positions.newest_first.first())
            .map(|&i| &entries[i])
    }

    pub fn previous(&self, vehicle_id: &Uuid, current_id: &Uuid) -> Option<&'a FuelEntry> {
        let entries = self.entries;
        let newest_first = &self.by_vehicle.get(vehicle_id)?.newest_first;
        let pos = newest_first.iter().position(|&i| entries[i].id == *current_id)?;
        newest_first.get(pos + 1).map(|&i| &entries[i])
    }

    /// Oldest first.
    pub fn chronological(&self, vehicle_id: &Uuid) -> Vec<&'a FuelEntry> {
        let entries = self.entries;
        self.by_vehicle
            .get(vehicle_id)
            .map(|positions| positions.oldest_first.iter().map(|&i| &entries[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(vehicle_id: Uuid, day: u32, odometer: f64) -> FuelEntry {
        let date = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        FuelEntry::new(vehicle_id, date, 20.0, 100.0, odometer, true)
    }

    #[test]
    fn test_latest_entry_ignores_insertion_order() {
        let v1 = Uuid::new_v4();
        let v2 = Uuid::new_v4();
        let entries = vec![
            entry(v1, 10, 1200.0),
            entry(v1, 20, 1500.0),
            entry(v2, 25, 9000.0),
            entry(v1, 5, 1000.0),
        ];

        let latest = latest_entry(&v1, &entries).unwrap();
        assert_eq!(latest.odometer, 1500.0);
        assert!(latest_entry(&Uuid::new_v4(), &entries).is_none());
        assert!(latest_entry(&v1, &[]).is_none());
    }

    #[test]
    fn test_latest_entry_tie_keeps_first_inserted() {
        let v1 = Uuid::new_v4();
        let first = entry(v1, 10, 1000.0);
        let mut second = entry(v1, 10, 1100.0);
        second.date = first.date;
        let entries = vec![first.clone(), second];

        assert_eq!(latest_entry(&v1, &entries).unwrap().id, first.id);
    }

    #[test]
    fn test_previous_entry() {
        let v1 = Uuid::new_v4();
        let a = entry(v1, 1, 1000.0);
        let b = entry(v1, 15, 1300.0);
        let c = entry(v1, 8, 1150.0);
        let entries = vec![a.clone(), b.clone(), c.clone()];

        assert_eq!(previous_entry(&v1, &entries, &b.id).unwrap().id, c.id);
        assert_eq!(previous_entry(&v1, &entries, &c.id).unwrap().id, a.id);
        assert!(previous_entry(&v1, &entries, &a.id).is_none());
    }

    #[test]
    fn test_previous_entry_of_foreign_id_is_none() {
        let v1 = Uuid::new_v4();
        let v2 = Uuid::new_v4();
        let mine = entry(v1, 1, 1000.0);
        let theirs = entry(v2, 2, 5000.0);
        let entries = vec![mine.clone(), entry(v1, 3, 1200.0), theirs.clone()];

        assert!(previous_entry(&v1, &entries, &theirs.id).is_none());
        assert!(previous_entry(&v1, &entries, &Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_walk_backwards_terminates() {
        let v1 = Uuid::new_v4();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut entries: Vec<FuelEntry> = (0..12)
            .map(|i| {
                let mut e = entry(v1, 1, 1000.0 + i as f64 * 100.0);
                e.date = base + Duration::days((i * 7 % 12) as i64);
                e
            })
            .collect();
        entries.push(entry(Uuid::new_v4(), 1, 42.0));

        let mut current = latest_entry(&v1, &entries).unwrap();
        let mut steps = 0;
        while let Some(prev) = previous_entry(&v1, &entries, &current.id) {
            assert!(prev.date < current.date);
            current = prev;
            steps += 1;
            assert!(steps <= 11);
        }
        assert_eq!(steps, 11);
    }

    #[test]
    fn test_input_is_not_reordered() {
        let v1 = Uuid::new_v4();
        let entries = vec![entry(v1, 20, 1500.0), entry(v1, 5, 1000.0)];
        let before: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        let sorted = entries_for_vehicle(&v1, &entries);
        assert_eq!(sorted[0].odometer, 1000.0);
        let after: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_index_agrees_with_free_functions() {
        let v1 = Uuid::new_v4();
        let v2 = Uuid::new_v4();
        let entries = vec![
            entry(v1, 10, 1200.0),
            entry(v2, 11, 300.0),
            entry(v1, 20, 1500.0),
            entry(v1, 5, 1000.0),
            entry(v2, 2, 100.0),
            // Same timestamp as the fill above it
            entry(v2, 2, 200.0),
        ];
        let index = EntryIndex::build(&entries);

        assert_eq!(index.vehicle_count(), 2);
        for vehicle in [v1, v2] {
            assert_eq!(
                index.latest(&vehicle).map(|e| e.id),
                latest_entry(&vehicle, &entries).map(|e| e.id)
            );
            for e in entries.iter().filter(|e| e.vehicle_id == vehicle) {
                assert_eq!(
                    index.previous(&vehicle, &e.id).map(|p| p.id),
                    previous_entry(&vehicle, &entries, &e.id).map(|p| p.id)
                );
            }
            let a: Vec<Uuid> = index.chronological(&vehicle).iter().map(|e| e.id).collect();
            let b: Vec<Uuid> = entries_for_vehicle(&vehicle, &entries)
                .iter()
                .map(|e| e.id)
                .collect();
            assert_eq!(a, b);
        }
        assert!(index.latest(&Uuid::new_v4()).is_none());

        let tied: Vec<f64> = index.chronological(&v2).iter().map(|e| e.odometer).collect();
        assert_eq!(tied, vec![100.0, 200.0, 300.0]);
    }
}
