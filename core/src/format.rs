use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::model::settings::{Currency, DistanceUnit, VolumeUnit};

pub fn currency_symbol(currency: Currency) -> &'static str {
    match currency {
        Currency::Inr => "₹",
        Currency::Usd => "$",
        Currency::Eur => "€",
        Currency::Gbp => "£",
        Currency::Jpy => "¥",
        Currency::Cad => "C$",
        Currency::Aud => "A$",
    }
}

/// Groups the integer digits in threes, or in the Indian 3-2-2 pattern.
fn group_digits(digits: &str, separator: char, indian: bool) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 2);
    for (i, c) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 {
            let boundary = if indian && remaining > 3 {
                (remaining - 3) % 2 == 0
            } else {
                remaining % 3 == 0
            };
            if boundary {
                out.push(separator);
            }
        }
        out.push(c);
    }
    out
}

fn split_fixed(value: f64, decimals: usize) -> (bool, String, String) {
    let fixed = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.');
    match fixed.split_once('.') {
        Some((int, frac)) => (negative, int.to_string(), frac.to_string()),
        None => (negative, fixed, String::new()),
    }
}

/// Locale-flavoured money string with two decimals: "$1,234.50", "₹1,23,456.00", "1.234,50 €".
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let (negative, int, frac) = split_fixed(amount, 2);
    let sign = if negative { "-" } else { "" };
    let symbol = currency_symbol(currency);
    match currency {
        Currency::Eur => format!("{}{},{} {}", sign, group_digits(&int, '.', false), frac, symbol),
        Currency::Inr => format!("{}{}{}.{}", sign, symbol, group_digits(&int, ',', true), frac),
        _ => format!("{}{}{}.{}", sign, symbol, group_digits(&int, ',', false), frac),
    }
}

/// Thousands-grouped with at most two decimals, trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    let (negative, int, frac) = split_fixed(value, 2);
    let frac = frac.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, group_digits(&int, ',', false))
    } else {
        format!("{}{}.{}", sign, group_digits(&int, ',', false), frac)
    }
}

pub fn format_distance(distance: f64, unit: DistanceUnit) -> String {
    format!("{} {}", format_number(distance), unit)
}

pub fn format_volume(volume: f64, unit: VolumeUnit) -> String {
    format!("{} {}", format_number(volume), unit)
}

/// "Jan 5, 2024"
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%b %-d, %Y").to_string()
}

/// "Jan 5, 2024, 09:30 AM"
pub fn format_date_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// "Jan 2024"
pub fn format_month_year<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%b %Y").to_string()
}

/// Shortens `text` to `max_len` characters, appending "...".
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, Currency::Usd), "$1,234.50");
        assert_eq!(format_currency(123456.0, Currency::Inr), "₹1,23,456.00");
        assert_eq!(format_currency(12345678.9, Currency::Inr), "₹1,23,45,678.90");
        assert_eq!(format_currency(1234.5, Currency::Eur), "1.234,50 €");
        assert_eq!(format_currency(999.999, Currency::Gbp), "£1,000.00");
        assert_eq!(format_currency(-12.5, Currency::Cad), "-C$12.50");
        assert_eq!(format_currency(-0.001, Currency::Usd), "$0.00");
        assert_eq!(format_currency(0.0, Currency::Jpy), "¥0.00");
    }

    #[test]
    fn test_format_distance_and_volume() {
        assert_eq!(format_distance(12345.0, DistanceUnit::Km), "12,345 km");
        assert_eq!(format_distance(600.5, DistanceUnit::Mi), "600.5 mi");
        assert_eq!(format_volume(32.456, VolumeUnit::L), "32.46 l");
        assert_eq!(format_volume(10.0, VolumeUnit::Gal), "10 gal");
    }

    #[test]
    fn test_format_dates() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(format_date(&date), "Jan 5, 2024");
        assert_eq!(format_date_time(&date), "Jan 5, 2024, 09:30 AM");
        assert_eq!(format_month_year(&date), "Jan 2024");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer note", 6), "a long...");
    }
}
