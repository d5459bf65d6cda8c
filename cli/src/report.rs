use chrono::{DateTime, Local};
use fuelmate_core::format::{
    format_currency, format_date, format_date_time, format_number, truncate_text,
};
use fuelmate_core::units::efficiency_label;
use fuelmate_core::{Expense, FuelEntryDto, MonthlyStat, Settings, Vehicle};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use uuid::Uuid;

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    vehicle_type: String,
    #[tabled(rename = "Make / Model")]
    make_model: String,
    #[tabled(rename = "Initial odo")]
    odometer: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Odometer")]
    odometer: String,
    #[tabled(rename = "Fuel")]
    amount: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Full")]
    full: String,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
    #[tabled(rename = "Cost/dist")]
    cost_per_distance: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Fuel")]
    fuel: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
    #[tabled(rename = "Cost/dist")]
    cost_per_distance: String,
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    expense_type: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn local_date(date: &DateTime<chrono::Utc>) -> String {
    format_date(&date.with_timezone(&Local))
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn per_distance(cost: f64, settings: &Settings) -> String {
    format!("{}/{}", format_currency(cost, settings.currency), settings.distance_unit)
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

pub fn show_vehicles(vehicles: &[Vehicle], selected: Option<Uuid>) {
    let rows = vehicles
        .iter()
        .map(|v| VehicleRow {
            marker: if Some(v.id) == selected { "*".to_string() } else { String::new() },
            id: short_id(&v.id),
            name: v.name.clone(),
            vehicle_type: v.vehicle_type.as_str().to_string(),
            make_model: format!("{} {}", v.make, v.model).trim().to_string(),
            odometer: format_number(v.initial_odometer),
        })
        .collect();
    print_table::<VehicleRow>(rows);
}

pub fn show_vehicle_details(vehicle: &Vehicle) {
    println!("\x1b[1;36m{}\x1b[0m", vehicle.name);
    println!("  ID:         {}", vehicle.id);
    println!("  Type:       {}", vehicle.vehicle_type.as_str());
    if let Some(class) = vehicle.vehicle_class {
        println!("  Class:      {}", class.as_str());
    }
    if !vehicle.make.is_empty() || !vehicle.model.is_empty() {
        println!("  Make/Model: {} {}", vehicle.make, vehicle.model);
    }
    if vehicle.year > 0 {
        println!("  Year:       {}", vehicle.year);
    }
    println!("  Initial odo: {}", format_number(vehicle.initial_odometer));
    if let Some(tank) = vehicle.tank_capacity {
        println!("  Tank:       {} L", format_number(tank));
    }
    if let Some(battery) = vehicle.battery_capacity {
        println!("  Battery:    {} kWh", format_number(battery));
    }
    println!("  Added:      {}", local_date(&vehicle.created_at));
}

pub fn show_entries(dtos: &[FuelEntryDto], settings: &Settings) {
    let label = efficiency_label(settings.distance_unit, settings.volume_unit);
    let rows = dtos
        .iter()
        .map(|dto| EntryRow {
            date: local_date(&dto.entry.date),
            id: short_id(&dto.entry.id),
            odometer: format_number(dto.entry.odometer),
            amount: format!("{} {}", format_number(dto.entry.amount), settings.volume_unit),
            cost: format_currency(dto.entry.total_cost, settings.currency),
            full: if dto.entry.is_full { "yes" } else { "no" }.to_string(),
            efficiency: or_dash(dto.efficiency.map(|e| format!("{:.2} {}", e, label))),
            cost_per_distance: or_dash(dto.cost_per_distance.map(|c| per_distance(c, settings))),
        })
        .collect();
    print_table::<EntryRow>(rows);
}

pub fn show_entry_details(dto: &FuelEntryDto, settings: &Settings) {
    let entry = &dto.entry;
    println!("\x1b[1;36mFuel entry {}\x1b[0m", entry.id);
    println!("  Date:       {}", format_date_time(&entry.date.with_timezone(&Local)));
    println!("  Odometer:   {} {}", format_number(entry.odometer), settings.distance_unit);
    println!("  Fuel:       {} {}", format_number(entry.amount), settings.volume_unit);
    println!("  Price:      {}", format_currency(entry.price, settings.currency));
    println!("  Total:      {}", format_currency(entry.total_cost, settings.currency));
    println!("  Full tank:  {}", if entry.is_full { "yes" } else { "no" });
    if let Some(fuel_type) = entry.fuel_type {
        println!("  Fuel type:  {}", fuel_type.as_str());
    }
    if let Some(distance) = dto.distance {
        println!("  Distance:   {} {}", format_number(distance), settings.distance_unit);
    }
    if let Some(efficiency) = dto.efficiency {
        println!(
            "  Efficiency: {:.2} {}",
            efficiency,
            efficiency_label(settings.distance_unit, settings.volume_unit)
        );
    }
    if let Some(cost) = dto.cost_per_distance {
        println!("  Cost/dist:  {}", per_distance(cost, settings));
    }
    if let Some(notes) = &entry.notes {
        println!("  Notes:      {}", notes);
    }
}

pub fn show_monthly(stats: &[MonthlyStat], settings: &Settings) {
    let label = efficiency_label(settings.distance_unit, settings.volume_unit);
    let rows = stats
        .iter()
        .map(|m| MonthRow {
            month: m.label(),
            cost: format_currency(m.total_cost, settings.currency),
            fuel: format!("{} {}", format_number(m.total_fuel), settings.volume_unit),
            distance: format!("{} {}", format_number(m.total_distance), settings.distance_unit),
            efficiency: or_dash(m.efficiency.map(|e| format!("{:.2} {}", e, label))),
            cost_per_distance: or_dash(m.cost_per_distance.map(|c| per_distance(c, settings))),
        })
        .collect();
    print_table::<MonthRow>(rows);
}

pub fn show_expenses(expenses: &[Expense], settings: &Settings) {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let rows = sorted
        .into_iter()
        .map(|e| ExpenseRow {
            date: local_date(&e.date),
            id: short_id(&e.id),
            expense_type: e.expense_type.label().to_string(),
            amount: format_currency(e.amount, settings.currency),
            description: truncate_text(&e.description, 40),
        })
        .collect();
    print_table::<ExpenseRow>(rows);
}
