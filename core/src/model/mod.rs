pub mod entry;
pub mod expense;
pub mod settings;
pub mod stats;
pub mod vehicle;
