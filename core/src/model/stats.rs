use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated figures for one calendar month of a vehicle's history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32, // 1-12
    pub total_cost: f64,
    pub total_fuel: f64,
    pub total_distance: f64,
    pub efficiency: Option<f64>,
    pub cost_per_distance: Option<f64>,
    /// First instant of the month in the zone the entries were bucketed in.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl MonthlyStat {
    pub fn new(year: i32, month: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            year,
            month,
            total_cost: 0.0,
            total_fuel: 0.0,
            total_distance: 0.0,
            efficiency: None,
            cost_per_distance: None,
            timestamp,
        }
    }

    /// "Jan 2024"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{:02}/{}", self.month, self.year))
    }
}

/// Efficiency and cost-per-distance attributed to a single entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub efficiency: f64,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_label() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(MonthlyStat::new(2024, 2, ts).label(), "Feb 2024");
    }
}
