pub mod dto;
pub mod expense_service;
pub mod fuel_entry_service;
pub mod settings_service;
pub mod vehicle_service;
