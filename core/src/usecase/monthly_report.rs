use anyhow::Result;
use chrono::{Local, TimeZone};
use uuid::Uuid;

use crate::efficiency::efficiency_history;
use crate::model::settings::{DistanceUnit, VolumeUnit};
use crate::model::stats::{EfficiencyPoint, MonthlyStat};
use crate::monthly::monthly_stats_in;
use crate::repository::FuelEntryRepository;

pub struct MonthlyReportUseCase<'a, E: FuelEntryRepository> {
    entries: &'a E,
}

impl<'a, E: FuelEntryRepository> MonthlyReportUseCase<'a, E> {
    pub fn new(entries: &'a E) -> Self {
        Self { entries }
    }

    pub fn report(
        &self,
        vehicle_id: &Uuid,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
    ) -> Result<Vec<MonthlyStat>> {
        self.report_in(vehicle_id, distance_unit, volume_unit, &Local)
    }

    pub fn report_in<Tz: TimeZone>(
        &self,
        vehicle_id: &Uuid,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
        tz: &Tz,
    ) -> Result<Vec<MonthlyStat>> {
        let vehicle_entries = self.entries.list_by_vehicle(vehicle_id)?;
        Ok(monthly_stats_in(&vehicle_entries, distance_unit, volume_unit, tz))
    }

    pub fn efficiency_trend(
        &self,
        vehicle_id: &Uuid,
        distance_unit: DistanceUnit,
        volume_unit: VolumeUnit,
    ) -> Result<Vec<EfficiencyPoint>> {
        let vehicle_entries = self.entries.list_by_vehicle(vehicle_id)?;
        Ok(efficiency_history(&vehicle_entries, vehicle_id, distance_unit, volume_unit))
    }
}
