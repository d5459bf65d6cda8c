use std::collections::HashMap;

use anyhow::{anyhow, Result};

/// Keys accepted after `fuel add <vehicle>`.
pub const FUEL_ENTRY_KEYS: [&str; 8] = [
    "amount", "price", "odometer", "date", "full", "type", "notes", "receipt",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits free words from `key:value` pairs. Free words are joined into `name`.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !key.contains(' ') {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Rewrites every metadata key to its full form; unknown or ambiguous keys are errors.
pub fn normalize_keys(parsed: ParsedInput, candidates: &[&str]) -> Result<ParsedInput> {
    let mut metadata = HashMap::new();
    for (key, value) in parsed.metadata {
        metadata.insert(expand_key(&key, candidates)?, value);
    }
    Ok(ParsedInput {
        name: parsed.name,
        metadata,
    })
}

pub fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "full" => Ok(true),
        "n" | "no" | "false" | "0" | "partial" => Ok(false),
        _ => Err(anyhow!("Expected yes/no, got '{}'", value)),
    }
}

/// Parses a number that must be strictly positive, naming `field` in the error.
pub fn parse_positive(field: &str, value: &str) -> Result<f64> {
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Enter a valid {}: '{}'", field, value))?;
    if !(number > 0.0) || !number.is_finite() {
        return Err(anyhow!("{} must be greater than zero", field));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let args = vec![
            "Family".to_string(),
            "car".to_string(),
            "amount:32.5".to_string(),
            "o:5400".to_string(),
        ];
        let parsed = parse_args(&args);
        assert_eq!(parsed.name, "Family car");
        assert_eq!(parsed.metadata.get("amount"), Some(&"32.5".to_string()));
        assert_eq!(parsed.metadata.get("o"), Some(&"5400".to_string()));
    }

    #[test]
    fn test_value_may_contain_colons() {
        let args = vec!["date:2024-01-05 10:30:00".to_string()];
        let parsed = parse_args(&args);
        assert_eq!(parsed.metadata.get("date"), Some(&"2024-01-05 10:30:00".to_string()));
        assert!(parsed.name.is_empty());
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("a", &FUEL_ENTRY_KEYS).unwrap(), "amount");
        assert_eq!(expand_key("odo", &FUEL_ENTRY_KEYS).unwrap(), "odometer");
        assert_eq!(expand_key("full", &FUEL_ENTRY_KEYS).unwrap(), "full");
        assert_eq!(expand_key("n", &FUEL_ENTRY_KEYS).unwrap(), "notes");

        // Ambiguous
        let candidates = vec!["price", "premium"];
        assert!(expand_key("p", &candidates).is_err());
        assert!(expand_key("pr", &candidates).is_err());

        // Unknown
        assert!(expand_key("x", &FUEL_ENTRY_KEYS).is_err());
    }

    #[test]
    fn test_normalize_keys() {
        let parsed = parse_args(&["a:30".to_string(), "p:101.2".to_string()]);
        let normalized = normalize_keys(parsed, &FUEL_ENTRY_KEYS).unwrap();
        assert_eq!(normalized.metadata.get("amount"), Some(&"30".to_string()));
        assert_eq!(normalized.metadata.get("price"), Some(&"101.2".to_string()));

        let bad = parse_args(&["zz:1".to_string()]);
        assert!(normalize_keys(bad, &FUEL_ENTRY_KEYS).is_err());
    }

    #[test]
    fn test_parse_flag_and_positive() {
        assert!(parse_flag("Y").unwrap());
        assert!(!parse_flag("partial").unwrap());
        assert!(parse_flag("maybe").is_err());

        assert_eq!(parse_positive("amount", "12.5").unwrap(), 12.5);
        assert!(parse_positive("amount", "0").is_err());
        assert!(parse_positive("price", "-3").is_err());
        assert!(parse_positive("price", "abc").is_err());
        assert!(parse_positive("price", "NaN").is_err());
    }
}
