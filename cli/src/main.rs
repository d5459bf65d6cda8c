mod chart;
mod report;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use fuelmate_core::export::{parse_backup, write_csv_export, write_json_backup, ExportKind};
use fuelmate_core::format::{format_currency, format_date, format_distance, format_volume};
use fuelmate_core::input::{parse_flag, parse_positive, FUEL_ENTRY_KEYS};
use fuelmate_core::service::{
    expense_service::ExpenseService, fuel_entry_service::FuelEntryService,
    settings_service::SettingsService, vehicle_service::VehicleService,
};
use fuelmate_core::units::efficiency_label;
use fuelmate_core::usecase::{
    monthly_report::MonthlyReportUseCase, vehicle_summary::VehicleSummaryUseCase,
};
use fuelmate_core::{
    normalize_keys, parse_args, parse_human_date, Expense, ExpenseRepository, ExpenseType,
    FileExpenseRepository, FileFuelEntryRepository, FileSettingsRepository, FileVehicleRepository,
    FuelEntry, FuelEntryRepository, FuelType, Settings, SettingsRepository, Vehicle, VehicleClass,
    VehicleRepository, VehicleType,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "fuelmate")]
#[command(about = "Track fuel purchases and vehicle running costs", long_about = None)]
struct Cli {
    /// Directory holding the JSON data files (default: ~/.fuelmate)
    #[arg(long, global = true, env = "FUELMATE_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage vehicles
    #[command(subcommand)]
    Vehicle(VehicleCommand),
    /// Log and inspect fuel entries
    #[command(subcommand)]
    Fuel(FuelCommand),
    /// Track non-fuel expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),
    /// Overview of a vehicle (defaults to the selected one)
    Stats { vehicle: Option<String> },
    /// Monthly cost, fuel, distance and efficiency table
    Monthly { vehicle: Option<String> },
    /// Interactive monthly chart
    Chart { vehicle: Option<String> },
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Export data
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(clap::Subcommand)]
enum VehicleCommand {
    /// Register a vehicle
    Add {
        name: String,
        /// petrol, diesel, electric, hybrid, cng, bike, petrol_cng
        #[arg(long = "type", default_value = "petrol")]
        vehicle_type: String,
        #[arg(long, default_value_t = 0.0)]
        odometer: f64,
        #[arg(long, default_value = "")]
        make: String,
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value_t = 0)]
        year: i32,
        /// Tank capacity in liters
        #[arg(long)]
        tank: Option<f64>,
        /// Battery capacity in kWh
        #[arg(long)]
        battery: Option<f64>,
        #[arg(long)]
        bike: bool,
    },
    /// List vehicles
    List,
    /// Show a vehicle's details (defaults to the selected one)
    Show { vehicle: Option<String> },
    /// Select the default vehicle for other commands
    Select { vehicle: String },
    /// Delete a vehicle with its entries and expenses
    Remove { vehicle: String },
}

#[derive(clap::Subcommand)]
enum FuelCommand {
    /// Log a fill (usage: fuel add Civic amount:30 price:101.5 odo:5400 full:y date:yesterday)
    Add {
        /// Vehicle name (optional) followed by key:value pairs
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List a vehicle's fills, newest first
    List { vehicle: Option<String> },
    /// Show one fill with its efficiency against the previous one
    Show { id: String },
    /// Delete a fill
    Remove { id: String },
}

#[derive(clap::Subcommand)]
enum ExpenseCommand {
    /// Record an expense
    Add {
        /// fuel, maintenance, insurance, tax, other
        #[arg(long = "type")]
        expense_type: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        vehicle: Option<String>,
    },
    /// List a vehicle's expenses
    List { vehicle: Option<String> },
    /// Delete an expense
    Remove { id: String },
}

#[derive(clap::Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        currency: Option<String>,
        /// km or mi
        #[arg(long)]
        distance: Option<String>,
        /// l or gal
        #[arg(long)]
        volume: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ExportCommand {
    /// Write a CSV file (entries, vehicles or all)
    Csv {
        #[arg(long, default_value = "all")]
        kind: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Write a full JSON backup
    Json {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Validate a JSON backup and print what it contains
    Inspect { file: PathBuf },
}

struct Repos {
    vehicles: FileVehicleRepository,
    entries: FileFuelEntryRepository,
    expenses: FileExpenseRepository,
    settings: FileSettingsRepository,
}

impl Repos {
    fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            vehicles: FileVehicleRepository::new(data_dir.clone())?,
            entries: FileFuelEntryRepository::new(data_dir.clone())?,
            expenses: FileExpenseRepository::new(data_dir.clone())?,
            settings: FileSettingsRepository::new(data_dir)?,
        })
    }

    fn vehicle_service(
        &self,
    ) -> VehicleService<
        &FileVehicleRepository,
        &FileFuelEntryRepository,
        &FileExpenseRepository,
        &FileSettingsRepository,
    > {
        VehicleService::new(&self.vehicles, &self.entries, &self.expenses, &self.settings)
    }

    fn fuel_service(&self) -> FuelEntryService<&FileFuelEntryRepository, &FileVehicleRepository> {
        FuelEntryService::new(&self.entries, &self.vehicles)
    }

    /// Named vehicle, or the selected one when no name is given.
    fn resolve_vehicle(&self, key: Option<&str>) -> Result<Vehicle> {
        let service = self.vehicle_service();
        match key {
            Some(k) if !k.trim().is_empty() => service.find_vehicle(k),
            _ => service.selected_vehicle()?.ok_or_else(|| {
                anyhow!("No vehicle selected. Add one with `fuelmate vehicle add`.")
            }),
        }
    }
}

fn find_by_prefix<T, F: Fn(&T) -> Uuid>(items: Vec<T>, key: &str, id: F) -> Result<T> {
    let key = key.trim().to_lowercase();
    let mut matches: Vec<T> = items
        .into_iter()
        .filter(|item| id(item).to_string().starts_with(&key))
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(anyhow!("No record with ID starting with '{}'", key)),
        n => Err(anyhow!("Ambiguous ID '{}' matches {} records", key, n)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("data dir override: {:?}", cli.data_dir);
    let repos = Repos::open(cli.data_dir)?;
    let settings = repos.settings.load()?;

    match cli.command {
        Some(Commands::Vehicle(cmd)) => run_vehicle(&repos, cmd)?,
        Some(Commands::Fuel(cmd)) => run_fuel(&repos, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => run_expense(&repos, &settings, cmd)?,
        Some(Commands::Stats { vehicle }) => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            print_summary(&repos, &settings, &vehicle)?;
        }
        Some(Commands::Monthly { vehicle }) => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            let usecase = MonthlyReportUseCase::new(&repos.entries);
            let stats = usecase.report(&vehicle.id, settings.distance_unit, settings.volume_unit)?;
            if stats.is_empty() {
                println!("Add fuel entries to generate monthly reports.");
            } else {
                println!("Monthly report for {}", vehicle.name);
                report::show_monthly(&stats, &settings);
            }
        }
        Some(Commands::Chart { vehicle }) => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            let usecase = MonthlyReportUseCase::new(&repos.entries);
            let (d, v) = (settings.distance_unit, settings.volume_unit);
            let stats = usecase.report(&vehicle.id, d, v)?;
            let trend = usecase.efficiency_trend(&vehicle.id, d, v)?;
            chart::run(&vehicle, stats, trend, &settings)?;
        }
        Some(Commands::Settings(cmd)) => run_settings(&repos, cmd)?,
        Some(Commands::Export(cmd)) => run_export(&repos, &settings, cmd)?,
        None => {
            // Dashboard for the selected vehicle
            match repos.vehicle_service().selected_vehicle()? {
                Some(vehicle) => print_summary(&repos, &settings, &vehicle)?,
                None => println!("No vehicles yet. Add one with `fuelmate vehicle add <name>`."),
            }
        }
    }
    Ok(())
}

fn run_vehicle(repos: &Repos, cmd: VehicleCommand) -> Result<()> {
    let service = repos.vehicle_service();
    match cmd {
        VehicleCommand::Add {
            name,
            vehicle_type,
            odometer,
            make,
            model,
            year,
            tank,
            battery,
            bike,
        } => {
            let vehicle_type: VehicleType = vehicle_type.parse()?;
            let mut vehicle = Vehicle::new(name, vehicle_type, odometer);
            vehicle.make = make;
            vehicle.model = model;
            vehicle.year = year;
            vehicle.tank_capacity = tank;
            vehicle.battery_capacity = battery;
            vehicle.vehicle_class = Some(if bike || vehicle_type == VehicleType::Bike {
                VehicleClass::Bike
            } else {
                VehicleClass::Car
            });
            let created = service.add_vehicle(vehicle)?;
            println!("Vehicle added: {} (ID: {})", created.name, created.id);
        }
        VehicleCommand::List => {
            let vehicles = service.list_vehicles()?;
            let selected = service.selected_vehicle()?.map(|v| v.id);
            if vehicles.is_empty() {
                println!("No vehicles found.");
            } else {
                report::show_vehicles(&vehicles, selected);
            }
        }
        VehicleCommand::Show { vehicle } => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            report::show_vehicle_details(&vehicle);
        }
        VehicleCommand::Select { vehicle } => {
            let vehicle = service.find_vehicle(&vehicle)?;
            service.select_vehicle(&vehicle.id)?;
            println!("Selected {}", vehicle.name);
        }
        VehicleCommand::Remove { vehicle } => {
            let vehicle = service.find_vehicle(&vehicle)?;
            service.delete_vehicle(&vehicle.id)?;
            println!("Deleted {} and its records", vehicle.name);
        }
    }
    Ok(())
}

fn run_fuel(repos: &Repos, settings: &Settings, cmd: FuelCommand) -> Result<()> {
    let service = repos.fuel_service();
    let (d, v) = (settings.distance_unit, settings.volume_unit);
    match cmd {
        FuelCommand::Add { args } => {
            let parsed = normalize_keys(parse_args(&args), &FUEL_ENTRY_KEYS)?;
            let vehicle = repos.resolve_vehicle(Some(parsed.name.as_str()))?;
            let field = |key: &str| parsed.metadata.get(key).map(|s| s.as_str());
            let required = |key: &str| field(key).ok_or_else(|| anyhow!("{} is required", key));

            let amount = parse_positive("amount", required("amount")?)?;
            let price = parse_positive("price", required("price")?)?;
            let odometer: f64 = required("odometer")?
                .parse()
                .map_err(|_| anyhow!("Enter a valid odometer reading"))?;
            let date = match field("date") {
                Some(d) => parse_human_date(d)?,
                None => chrono::Utc::now(),
            };
            let is_full = field("full").map(parse_flag).transpose()?.unwrap_or(true);

            let mut entry = FuelEntry::new(vehicle.id, date, amount, price, odometer, is_full);
            entry.fuel_type = field("type").map(str::parse::<FuelType>).transpose()?;
            entry.notes = field("notes").map(str::to_string);
            entry.receipt_image = field("receipt").map(str::to_string);

            let created = service.add_entry(entry)?;
            println!(
                "Fuel entry added: {} for {} (ID: {})",
                format_currency(created.total_cost, settings.currency),
                vehicle.name,
                created.id
            );
            let details = service.entry_details(&created.id, d, v)?;
            if let Some(efficiency) = details.efficiency {
                println!(
                    "  Efficiency: {:.2} {}",
                    efficiency,
                    efficiency_label(settings.distance_unit, settings.volume_unit)
                );
            }
        }
        FuelCommand::List { vehicle } => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            let dtos = service.entries_for_vehicle(&vehicle.id, d, v)?;
            if dtos.is_empty() {
                println!("No fuel entries for {}.", vehicle.name);
            } else {
                report::show_entries(&dtos, settings);
            }
        }
        FuelCommand::Show { id } => {
            let entry = find_by_prefix(repos.entries.list()?, &id, |e: &FuelEntry| e.id)?;
            let dto = service.entry_details(&entry.id, d, v)?;
            report::show_entry_details(&dto, settings);
        }
        FuelCommand::Remove { id } => {
            let entry = find_by_prefix(repos.entries.list()?, &id, |e: &FuelEntry| e.id)?;
            service.delete_entry(&entry.id)?;
            println!("Deleted fuel entry {}", entry.id);
        }
    }
    Ok(())
}

fn run_expense(repos: &Repos, settings: &Settings, cmd: ExpenseCommand) -> Result<()> {
    let service = ExpenseService::new(&repos.expenses);
    match cmd {
        ExpenseCommand::Add {
            expense_type,
            amount,
            date,
            description,
            vehicle,
        } => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            let expense_type: ExpenseType = expense_type.parse()?;
            let amount = parse_positive("amount", &amount)?;
            let date = parse_human_date(&date)?;
            let expense = Expense::new(vehicle.id, expense_type, amount, date, description);
            let created = service.add_expense(expense)?;
            println!(
                "{} expense added: {} (ID: {})",
                created.expense_type.label(),
                format_currency(created.amount, settings.currency),
                created.id
            );
        }
        ExpenseCommand::List { vehicle } => {
            let vehicle = repos.resolve_vehicle(vehicle.as_deref())?;
            let expenses = service.expenses_for_vehicle(&vehicle.id)?;
            if expenses.is_empty() {
                println!("No expenses for {}.", vehicle.name);
            } else {
                report::show_expenses(&expenses, settings);
                println!(
                    "Total: {}",
                    format_currency(service.total_by_vehicle(&vehicle.id)?, settings.currency)
                );
            }
        }
        ExpenseCommand::Remove { id } => {
            let expense = find_by_prefix(repos.expenses.list()?, &id, |e: &Expense| e.id)?;
            service.delete_expense(&expense.id)?;
            println!("Deleted expense {}", expense.id);
        }
    }
    Ok(())
}

fn run_settings(repos: &Repos, cmd: SettingsCommand) -> Result<()> {
    let service = SettingsService::new(&repos.settings);
    match cmd {
        SettingsCommand::Show => {}
        SettingsCommand::Set {
            currency,
            distance,
            volume,
            name,
        } => {
            if currency.is_none() && distance.is_none() && volume.is_none() && name.is_none() {
                bail!("Nothing to change. Pass --currency, --distance, --volume or --name.");
            }
            if let Some(c) = currency {
                service.set_currency(c.parse()?)?;
            }
            if let Some(d) = distance {
                service.set_distance_unit(d.parse()?)?;
            }
            if let Some(v) = volume {
                service.set_volume_unit(v.parse()?)?;
            }
            if let Some(n) = name {
                service.set_user_name(n)?;
            }
        }
    }
    let settings = service.get()?;
    println!("Currency:      {}", settings.currency);
    println!("Distance unit: {}", settings.distance_unit);
    println!("Volume unit:   {}", settings.volume_unit);
    if let Some(name) = settings.user_name {
        println!("Name:          {}", name);
    }
    Ok(())
}

fn run_export(repos: &Repos, settings: &Settings, cmd: ExportCommand) -> Result<()> {
    let vehicles = repos.vehicles.list()?;
    let entries = repos.entries.list()?;
    match cmd {
        ExportCommand::Csv { kind, out } => {
            let kind = match kind.to_lowercase().as_str() {
                "entries" => ExportKind::Entries,
                "vehicles" => ExportKind::Vehicles,
                "all" => ExportKind::All,
                other => bail!("Unknown export kind: '{}' (entries, vehicles or all)", other),
            };
            let path = write_csv_export(&out, kind, &entries, &vehicles)?;
            println!("Exported to {}", path.display());
        }
        ExportCommand::Json { out } => {
            let path = write_json_backup(&out, &vehicles, &entries, settings)?;
            println!("Backup written to {}", path.display());
        }
        ExportCommand::Inspect { file } => {
            let backup = parse_backup(&std::fs::read_to_string(&file)?)?;
            println!(
                "{}: {} vehicles, {} fuel entries",
                file.display(),
                backup.vehicles.len(),
                backup.entries.len()
            );
        }
    }
    Ok(())
}

fn print_summary(repos: &Repos, settings: &Settings, vehicle: &Vehicle) -> Result<()> {
    let usecase = VehicleSummaryUseCase::new(&repos.vehicles, &repos.entries, &repos.expenses);
    let summary = usecase.summary(&vehicle.id, settings.distance_unit, settings.volume_unit)?;
    let label = efficiency_label(settings.distance_unit, settings.volume_unit);
    let show = |value: Option<f64>| {
        value
            .map(|v| format!("{:.2} {}", v, label))
            .unwrap_or_else(|| "-".to_string())
    };

    println!(
        "\x1b[1;36m{}\x1b[0m ({})",
        summary.vehicle.name,
        summary.vehicle.vehicle_type.as_str()
    );
    println!(
        "  Initial odometer: {}",
        format_distance(summary.vehicle.initial_odometer, settings.distance_unit)
    );
    if let Some(latest) = &summary.latest_entry {
        println!(
            "  Last fill:        {} at {}",
            format_date(&latest.date.with_timezone(&chrono::Local)),
            format_distance(latest.odometer, settings.distance_unit)
        );
    }
    println!("  Fill-ups:         {}", summary.entry_count);
    println!("  Last efficiency:  {}", show(summary.latest_efficiency));
    println!("  Avg efficiency:   {}", show(summary.average_efficiency));
    println!(
        "  Distance driven:  {}",
        format_distance(summary.distance_driven, settings.distance_unit)
    );
    println!("  Fuel bought:      {}", format_volume(summary.total_fuel, settings.volume_unit));
    println!("  Fuel spend:       {}", format_currency(summary.total_spent, settings.currency));
    println!("  Other expenses:   {}", format_currency(summary.expense_total, settings.currency));
    Ok(())
}
