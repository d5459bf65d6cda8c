use anyhow::Result;
use log::info;

use crate::model::settings::{Currency, DistanceUnit, Settings, VolumeUnit};
use crate::repository::SettingsRepository;

pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get(&self) -> Result<Settings> {
        self.repo.load()
    }

    fn modify<F: FnOnce(&mut Settings)>(&self, change: F) -> Result<Settings> {
        let mut settings = self.repo.load()?;
        change(&mut settings);
        self.repo.save(&settings)?;
        Ok(settings)
    }

    pub fn set_currency(&self, currency: Currency) -> Result<Settings> {
        info!("Currency set to {}", currency);
        self.modify(|s| s.currency = currency)
    }

    pub fn set_distance_unit(&self, unit: DistanceUnit) -> Result<Settings> {
        info!("Distance unit set to {}", unit);
        self.modify(|s| s.distance_unit = unit)
    }

    pub fn set_volume_unit(&self, unit: VolumeUnit) -> Result<Settings> {
        info!("Volume unit set to {}", unit);
        self.modify(|s| s.volume_unit = unit)
    }

    pub fn set_user_name(&self, name: String) -> Result<Settings> {
        self.modify(|s| s.user_name = Some(name))
    }
}
