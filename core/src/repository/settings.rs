use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::settings::Settings;
use crate::repository::store::data_dir;
use crate::repository::traits::SettingsRepository;

const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Clone)]
pub struct FileSettingsRepository {
    file_path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir(base_dir)?;
        Ok(Self {
            file_path: dir.join(SETTINGS_FILE_NAME),
        })
    }
}

impl SettingsRepository for FileSettingsRepository {
    fn load(&self) -> Result<Settings> {
        if !self.file_path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.file_path)?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Parsing {}", self.file_path.display()))?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.file_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::{Currency, DistanceUnit, VolumeUnit};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = FileSettingsRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(repo.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = FileSettingsRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let settings = Settings {
            currency: Currency::Usd,
            distance_unit: DistanceUnit::Mi,
            volume_unit: VolumeUnit::Gal,
            user_name: Some("Sam".to_string()),
            user_image: None,
            selected_vehicle_id: None,
        };
        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), settings);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "{not json").unwrap();
        let repo = FileSettingsRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.load().is_err());
    }
}
