use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::now_millis;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[default]
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Cng,
    Bike,
    PetrolCng,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Petrol => "petrol",
            VehicleType::Diesel => "diesel",
            VehicleType::Electric => "electric",
            VehicleType::Hybrid => "hybrid",
            VehicleType::Cng => "cng",
            VehicleType::Bike => "bike",
            VehicleType::PetrolCng => "petrol_cng",
        }
    }
}

impl FromStr for VehicleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "petrol" | "gasoline" => Ok(VehicleType::Petrol),
            "diesel" => Ok(VehicleType::Diesel),
            "electric" | "ev" => Ok(VehicleType::Electric),
            "hybrid" => Ok(VehicleType::Hybrid),
            "cng" => Ok(VehicleType::Cng),
            "bike" => Ok(VehicleType::Bike),
            "petrol_cng" => Ok(VehicleType::PetrolCng),
            _ => Err(anyhow!("Unknown vehicle type: '{}'", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Car,
    Bike,
}

impl VehicleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Bike => "bike",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<VehicleClass>,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Liters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_capacity: Option<f64>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cng_tank_capacity: Option<f64>,
    /// kWh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_capacity: Option<f64>,
    pub initial_odometer: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(name: String, vehicle_type: VehicleType, initial_odometer: f64) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            name,
            vehicle_type,
            vehicle_class: None,
            make: String::new(),
            model: String::new(),
            year: 0,
            image: None,
            tank_capacity: None,
            cng_tank_capacity: None,
            battery_capacity: None,
            initial_odometer,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_electric(&self) -> bool {
        self.vehicle_type == VehicleType::Electric
    }
}
