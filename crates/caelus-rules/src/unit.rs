//! Unit families and conversions
//!
//! A small fixed table of engineering units grouped into families. Two
//! units are convertible exactly when they share a family; conversion is
//! linear (value × factor ratio). The table is deliberately closed: an
//! unknown unit symbol is "no known conversion", which the evaluator
//! surfaces rather than guessing.
//!
//! Note on `g`: in this domain `g` is gravitational acceleration (seismic
//! loads are specified as "0.25g"), not grams. Mass is expressed in `kg`
//! and `t`.

/// Family a unit belongs to. Units convert only within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    /// Lengths: mm, cm, m, km
    Length,
    /// Durations: s, min, hours, days
    Time,
    /// Accelerations: g, m/s2
    Acceleration,
    /// Pressures: Pa, kPa, MPa, bar
    Pressure,
    /// Masses: kg, t
    Mass,
    /// Discrete component counts: pumps, trains, channels, ...
    Count,
}

/// A recognized unit: its family and the factor to the family base unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// Family this unit belongs to.
    pub family: UnitFamily,
    /// Multiplier into the family's base unit.
    pub factor: f64,
}

/// Resolve a unit symbol to its family and base factor.
///
/// Matching is case-insensitive and tolerant of plural forms for word
/// units (`hours`, `pumps`). Returns `None` for unknown symbols.
pub fn resolve(symbol: &str) -> Option<Unit> {
    let s = symbol.trim();
    // `g` must stay case-sensitive enough not to swallow other symbols,
    // but unit words are matched lowercase.
    let lower = s.to_ascii_lowercase();

    let unit = match lower.as_str() {
        // Length, base: metre
        "mm" => Unit { family: UnitFamily::Length, factor: 0.001 },
        "cm" => Unit { family: UnitFamily::Length, factor: 0.01 },
        "m" => Unit { family: UnitFamily::Length, factor: 1.0 },
        "km" => Unit { family: UnitFamily::Length, factor: 1000.0 },

        // Time, base: hour
        "s" | "sec" | "second" | "seconds" => Unit { family: UnitFamily::Time, factor: 1.0 / 3600.0 },
        "min" | "minute" | "minutes" => Unit { family: UnitFamily::Time, factor: 1.0 / 60.0 },
        "h" | "hr" | "hour" | "hours" => Unit { family: UnitFamily::Time, factor: 1.0 },
        "d" | "day" | "days" => Unit { family: UnitFamily::Time, factor: 24.0 },

        // Acceleration, base: g
        "g" => Unit { family: UnitFamily::Acceleration, factor: 1.0 },
        "m/s2" | "m/s^2" | "m/s²" => Unit { family: UnitFamily::Acceleration, factor: 1.0 / 9.80665 },

        // Pressure, base: kPa
        "pa" => Unit { family: UnitFamily::Pressure, factor: 0.001 },
        "kpa" => Unit { family: UnitFamily::Pressure, factor: 1.0 },
        "mpa" => Unit { family: UnitFamily::Pressure, factor: 1000.0 },
        "bar" => Unit { family: UnitFamily::Pressure, factor: 100.0 },

        // Mass, base: kg
        "kg" => Unit { family: UnitFamily::Mass, factor: 1.0 },
        "t" | "tonne" | "tonnes" => Unit { family: UnitFamily::Mass, factor: 1000.0 },

        // Counts, all factor 1; the evaluator's metric filter keeps
        // different component nouns from being compared to each other
        "pump" | "pumps" | "train" | "trains" | "channel" | "channels" | "generator"
        | "generators" | "loop" | "loops" | "valve" | "valves" | "unit" | "units" => {
            Unit { family: UnitFamily::Count, factor: 1.0 }
        }

        _ => return None,
    };
    Some(unit)
}

/// Family of a unit symbol, if recognized.
pub fn family(symbol: &str) -> Option<UnitFamily> {
    resolve(symbol).map(|u| u.family)
}

/// Convert `value` from one unit to another.
///
/// Returns `None` when either unit is unknown or the units belong to
/// different families.
pub fn convert(value: f64, from: &str, to: &str) -> Option<f64> {
    let from = resolve(from)?;
    let to = resolve(to)?;
    if from.family != to.family {
        return None;
    }
    Some(value * from.factor / to.factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        assert_eq!(convert(1200.0, "mm", "m"), Some(1.2));
        assert_eq!(convert(1.2, "m", "mm"), Some(1200.0));
        assert_eq!(convert(1.35, "m", "m"), Some(1.35));
        assert_eq!(convert(2.0, "km", "m"), Some(2000.0));
    }

    #[test]
    fn test_time_conversions() {
        assert_eq!(convert(72.0, "hours", "hours"), Some(72.0));
        assert_eq!(convert(3.0, "days", "hours"), Some(72.0));
        let hours = convert(1800.0, "seconds", "hours").unwrap();
        assert!((hours - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_acceleration_conversions() {
        assert_eq!(convert(0.25, "g", "g"), Some(0.25));
        let g = convert(9.80665, "m/s2", "g").unwrap();
        assert!((g - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_conversions() {
        assert_eq!(convert(0.4, "MPa", "kPa"), Some(400.0));
        assert_eq!(convert(1.0, "bar", "kPa"), Some(100.0));
    }

    #[test]
    fn test_count_units_interconvert() {
        assert_eq!(convert(4.0, "pumps", "pumps"), Some(4.0));
        assert_eq!(convert(2.0, "trains", "trains"), Some(2.0));
    }

    #[test]
    fn test_cross_family_is_none() {
        assert_eq!(convert(1.0, "m", "hours"), None);
        assert_eq!(convert(1.0, "g", "kg"), None);
        assert_eq!(convert(1.0, "kPa", "m"), None);
    }

    #[test]
    fn test_unknown_unit_is_none() {
        assert_eq!(resolve("furlongs"), None);
        assert_eq!(convert(1.0, "furlongs", "m"), None);
        assert_eq!(convert(1.0, "m", "furlongs"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(family("Hours"), Some(UnitFamily::Time));
        assert_eq!(family("MM"), Some(UnitFamily::Length));
        assert_eq!(family("mpa"), Some(UnitFamily::Pressure));
    }

    #[test]
    fn test_g_is_acceleration_not_grams() {
        assert_eq!(family("g"), Some(UnitFamily::Acceleration));
    }
}
