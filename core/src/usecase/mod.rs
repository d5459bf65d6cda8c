pub mod monthly_report;
pub mod vehicle_summary;
