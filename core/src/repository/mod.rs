pub mod file;
pub mod memory;
pub mod settings;
pub mod store;
pub mod traits;

// Re-export
pub use file::{FileExpenseRepository, FileFuelEntryRepository, FileVehicleRepository};
pub use memory::{InMemoryRepository, InMemorySettingsRepository};
pub use settings::FileSettingsRepository;
pub use store::data_dir;
pub use traits::{ExpenseRepository, FuelEntryRepository, SettingsRepository, VehicleRepository};
