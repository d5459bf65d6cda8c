use crate::model::settings::{DistanceUnit, VolumeUnit};

pub const LITERS_PER_GALLON: f64 = 3.78541;
pub const GALLONS_PER_LITER: f64 = 0.264172;
pub const KM_PER_MILE: f64 = 1.60934;
pub const MILES_PER_KM: f64 = 0.621371;

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Applies the volume correction for the "unnatural" unit pairings.
///
/// km+l and mi+gal are left as-is; km+gal is scaled up by the liters-per-gallon
/// factor and mi+l is scaled down by it.
pub fn correct_efficiency(raw: f64, distance_unit: DistanceUnit, volume_unit: VolumeUnit) -> f64 {
    match (distance_unit, volume_unit) {
        (DistanceUnit::Km, VolumeUnit::Gal) => raw * LITERS_PER_GALLON,
        (DistanceUnit::Mi, VolumeUnit::L) => raw / LITERS_PER_GALLON,
        _ => raw,
    }
}

pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    match (from, to) {
        (DistanceUnit::Km, DistanceUnit::Mi) => value * MILES_PER_KM,
        (DistanceUnit::Mi, DistanceUnit::Km) => value * KM_PER_MILE,
        _ => value,
    }
}

pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> f64 {
    match (from, to) {
        (VolumeUnit::L, VolumeUnit::Gal) => value * GALLONS_PER_LITER,
        (VolumeUnit::Gal, VolumeUnit::L) => value * LITERS_PER_GALLON,
        _ => value,
    }
}

/// "km/l", "mi/gal", ...
pub fn efficiency_label(distance_unit: DistanceUnit, volume_unit: VolumeUnit) -> String {
    format!("{}/{}", distance_unit, volume_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(13.333333), 13.33);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(8.0), 8.0);
    }

    #[test]
    fn test_natural_pairings_are_untouched() {
        assert_eq!(correct_efficiency(10.0, DistanceUnit::Km, VolumeUnit::L), 10.0);
        assert_eq!(correct_efficiency(10.0, DistanceUnit::Mi, VolumeUnit::Gal), 10.0);
    }

    #[test]
    fn test_mismatched_pairings_are_corrected() {
        let km_gal = correct_efficiency(10.0, DistanceUnit::Km, VolumeUnit::Gal);
        assert!((km_gal - 37.8541).abs() < 1e-9);
        let mi_l = correct_efficiency(37.8541, DistanceUnit::Mi, VolumeUnit::L);
        assert!((mi_l - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(convert_distance(100.0, DistanceUnit::Km, DistanceUnit::Km), 100.0);
        let miles = convert_distance(100.0, DistanceUnit::Km, DistanceUnit::Mi);
        assert!((miles - 62.1371).abs() < 1e-9);
        let km = convert_distance(10.0, DistanceUnit::Mi, DistanceUnit::Km);
        assert!((km - 16.0934).abs() < 1e-9);
        assert!((convert_volume(10.0, VolumeUnit::Gal, VolumeUnit::L) - 37.8541).abs() < 1e-9);
        assert!((convert_volume(10.0, VolumeUnit::L, VolumeUnit::Gal) - 2.64172).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_label() {
        assert_eq!(efficiency_label(DistanceUnit::Km, VolumeUnit::L), "km/l");
        assert_eq!(efficiency_label(DistanceUnit::Mi, VolumeUnit::Gal), "mi/gal");
    }
}
