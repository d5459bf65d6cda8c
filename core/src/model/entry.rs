use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{now_millis, to_millis};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Regular,
    Premium,
    Diesel,
    Electricity,
    Cng,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Regular => "regular",
            FuelType::Premium => "premium",
            FuelType::Diesel => "diesel",
            FuelType::Electricity => "electricity",
            FuelType::Cng => "cng",
        }
    }
}

impl FromStr for FuelType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "regular" | "reg" => Ok(FuelType::Regular),
            "premium" | "prem" => Ok(FuelType::Premium),
            "diesel" => Ok(FuelType::Diesel),
            "electricity" | "electric" | "ev" => Ok(FuelType::Electricity),
            "cng" => Ok(FuelType::Cng),
            _ => Err(anyhow!("Unknown fuel type: '{}'", s)),
        }
    }
}

/// One refueling (or recharging) event.
///
/// `amount` is expressed in the configured volume unit, which is not stored per entry.
/// `total_cost` is captured at creation and never re-derived by the calculators.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub price: f64,
    pub odometer: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    pub total_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image: Option<String>,
    pub is_full: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl FuelEntry {
    pub fn new(
        vehicle_id: Uuid,
        date: DateTime<Utc>,
        amount: f64,
        price: f64,
        odometer: f64,
        is_full: bool,
    ) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            date: to_millis(date),
            amount,
            price,
            odometer,
            fuel_type: None,
            total_cost: amount * price,
            receipt_image: None,
            is_full,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-derives `total_cost` after `amount` or `price` were edited.
    pub fn recompute_total(&mut self) {
        self.total_cost = self.amount * self.price;
    }
}
