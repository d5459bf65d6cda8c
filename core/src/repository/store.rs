use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::model::entry::FuelEntry;
use crate::model::expense::Expense;
use crate::model::vehicle::Vehicle;

pub const DATA_DIR_NAME: &str = ".fuelmate";

/// Anything persisted as an element of a JSON array and addressed by id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KIND: &'static str;
    fn id(&self) -> Uuid;
}

impl Record for FuelEntry {
    const KIND: &'static str = "Fuel entry";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Vehicle {
    const KIND: &'static str = "Vehicle";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Expense {
    const KIND: &'static str = "Expense";
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Resolves the storage directory, defaulting to `~/.fuelmate`, and makes sure it exists.
pub fn data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(DATA_DIR_NAME)
        }
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Creating data directory {}", path.display()))?;
    Ok(path)
}

/// A JSON array file holding every record of one kind.
#[derive(Clone)]
pub struct JsonStore<T: Record> {
    file_path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Record> JsonStore<T> {
    pub fn open(dir: &Path, file_name: &str) -> Result<Self> {
        let file_path = dir.join(file_name);
        if !file_path.exists() {
            let mut writer = BufWriter::new(File::create(&file_path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<T>::new())?;
            writer.flush()?;
        }
        Ok(Self {
            file_path,
            _marker: PhantomData,
        })
    }

    pub fn read_all(&self) -> Result<Vec<T>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)
            .with_context(|| format!("Parsing {}", self.file_path.display()))?;
        Ok(records)
    }

    pub fn write_all(&self, records: &[T]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    pub fn create(&self, record: T) -> Result<T> {
        let mut records = self.read_all()?;
        records.push(record.clone());
        self.write_all(&records)?;
        Ok(record)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.read_all()?.into_iter().find(|r| r.id() == *id))
    }

    pub fn update(&self, record: &T) -> Result<()> {
        let mut records = self.read_all()?;
        match records.iter().position(|r| r.id() == record.id()) {
            Some(pos) => {
                records[pos] = record.clone();
                self.write_all(&records)
            }
            None => Err(anyhow!("{} with ID {} not found", T::KIND, record.id())),
        }
    }

    pub fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self.read_all()?;
        let initial_len = records.len();
        records.retain(|r| r.id() != *id);

        if records.len() == initial_len {
            return Err(anyhow!("{} with ID {} not found", T::KIND, id));
        }

        self.write_all(&records)
    }

    /// Removes every record matching `predicate` in one write.
    pub fn delete_where<F: Fn(&T) -> bool>(&self, predicate: F) -> Result<usize> {
        let mut records = self.read_all()?;
        let initial_len = records.len();
        records.retain(|r| !predicate(r));
        let removed = initial_len - records.len();
        if removed > 0 {
            self.write_all(&records)?;
        }
        Ok(removed)
    }
}
