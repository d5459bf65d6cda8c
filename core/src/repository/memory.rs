use std::cell::RefCell;

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::model::entry::FuelEntry;
use crate::model::expense::Expense;
use crate::model::settings::Settings;
use crate::model::vehicle::Vehicle;
use crate::repository::store::Record;
use crate::repository::traits::{
    ExpenseRepository, FuelEntryRepository, SettingsRepository, VehicleRepository,
};

/// Vec-backed repository for tests and for callers that supply synthetic collections.
pub struct InMemoryRepository<T> {
    records: RefCell<Vec<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(records: Vec<T>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    fn create_record(&self, record: T) -> Result<T> {
        self.records.borrow_mut().push(record.clone());
        Ok(record)
    }

    fn get_record(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.records.borrow().iter().find(|r| r.id() == *id).cloned())
    }

    fn list_records(&self) -> Result<Vec<T>> {
        Ok(self.records.borrow().clone())
    }

    fn update_record(&self, record: &T) -> Result<()> {
        let mut records = self.records.borrow_mut();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| anyhow!("{} with ID {} not found", T::KIND, record.id()))?;
        *slot = record.clone();
        Ok(())
    }

    fn delete_record(&self, id: &Uuid) -> Result<()> {
        let mut records = self.records.borrow_mut();
        let initial_len = records.len();
        records.retain(|r| r.id() != *id);
        if records.len() == initial_len {
            return Err(anyhow!("{} with ID {} not found", T::KIND, id));
        }
        Ok(())
    }
}

macro_rules! impl_in_memory {
    ($trait:ident, $record:ty) => {
        impl $trait for InMemoryRepository<$record> {
            fn create(&self, record: $record) -> Result<$record> {
                self.create_record(record)
            }

            fn get(&self, id: &Uuid) -> Result<Option<$record>> {
                self.get_record(id)
            }

            fn list(&self) -> Result<Vec<$record>> {
                self.list_records()
            }

            fn update(&self, record: &$record) -> Result<()> {
                self.update_record(record)
            }

            fn delete(&self, id: &Uuid) -> Result<()> {
                self.delete_record(id)
            }
        }
    };
}

impl_in_memory!(VehicleRepository, Vehicle);
impl_in_memory!(FuelEntryRepository, FuelEntry);
impl_in_memory!(ExpenseRepository, Expense);

#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: RefCell<Option<Settings>>,
}

impl SettingsRepository for InMemorySettingsRepository {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.borrow().clone().unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}
