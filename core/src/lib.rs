pub mod efficiency;
pub mod export;
pub mod format;
pub mod input;
pub mod model;
pub mod monthly;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod time;
pub mod units;
pub mod usecase;

pub use efficiency::{average_efficiency, cost_per_distance, efficiency_history, fuel_efficiency};
pub use input::{expand_key, normalize_keys, parse_args, ParsedInput};
pub use model::entry::{FuelEntry, FuelType};
pub use model::expense::{Expense, ExpenseType};
pub use model::settings::{Currency, DistanceUnit, Settings, VolumeUnit};
pub use model::stats::{EfficiencyPoint, MonthlyStat};
pub use model::vehicle::{Vehicle, VehicleClass, VehicleType};
pub use monthly::{monthly_stats, monthly_stats_in};
pub use repository::{
    ExpenseRepository, FileExpenseRepository, FileFuelEntryRepository, FileSettingsRepository,
    FileVehicleRepository, FuelEntryRepository, SettingsRepository, VehicleRepository,
};
pub use resolver::{latest_entry, previous_entry, EntryIndex};
pub use service::dto::FuelEntryDto;
pub use time::parse_human_date;
pub use usecase::vehicle_summary::VehicleSummary;
