use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{now_millis, to_millis};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    Fuel,
    Maintenance,
    Insurance,
    Tax,
    Other,
}

impl ExpenseType {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Fuel => "Fuel",
            ExpenseType::Maintenance => "Maintenance",
            ExpenseType::Insurance => "Insurance",
            ExpenseType::Tax => "Tax",
            ExpenseType::Other => "Other",
        }
    }
}

impl FromStr for ExpenseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fuel" => Ok(ExpenseType::Fuel),
            "maintenance" | "service" => Ok(ExpenseType::Maintenance),
            "insurance" => Ok(ExpenseType::Insurance),
            "tax" => Ok(ExpenseType::Tax),
            "other" => Ok(ExpenseType::Other),
            _ => Err(anyhow!("Unknown expense type: '{}'", s)),
        }
    }
}

/// A non-fuel running cost attached to a vehicle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub amount: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_image: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        vehicle_id: Uuid,
        expense_type: ExpenseType,
        amount: f64,
        date: DateTime<Utc>,
        description: String,
    ) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            expense_type,
            amount,
            date: to_millis(date),
            description,
            receipt_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}
