//! Numeric value/unit extraction from statement text
//!
//! Fallback path for evidence that was ingested without a structured
//! numeric value. Recognizes the value-with-unit shapes that appear in
//! engineering design statements ("1.35 m", "0.25g", "72 hours") and
//! component counts ("4 independent pumps").

use caelus_domain::NumericValue;
use regex::Regex;
use std::sync::LazyLock;

/// `<number> <known unit symbol>` with optional whitespace ("1.35 m", "0.25g")
static VALUE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*([A-Za-z°µ][A-Za-z0-9/^²°]*)").expect("static pattern")
});

/// `<integer> [independent|separate|redundant] <component noun>`
static COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+)\s+(?:independent\s+|separate\s+|redundant\s+)?(pumps?|trains?|channels?|generators?|loops?|valves?)",
    )
    .expect("static pattern")
});

/// Extract every recognizable numeric value with a known unit from text.
///
/// Component counts are matched first so "4 independent pumps" yields
/// `(4, pumps)` rather than `(4, independent)`. Value-unit pairs whose
/// unit symbol is not in the conversion table are dropped; an
/// unrecognized unit is indistinguishable from prose.
pub fn extract_numerics(text: &str) -> Vec<NumericValue> {
    let mut found = Vec::new();

    for caps in COUNT.captures_iter(text) {
        if let Ok(value) = caps[1].parse::<f64>() {
            found.push(NumericValue::new(value, caps[2].to_ascii_lowercase()));
        }
    }

    for caps in VALUE_UNIT.captures_iter(text) {
        let unit = &caps[2];
        if crate::unit::resolve(unit).is_none() {
            continue;
        }
        if let Ok(value) = caps[1].parse::<f64>() {
            let candidate = NumericValue::new(value, unit.to_string());
            // The count pass may already have claimed this number
            if !found
                .iter()
                .any(|n| n.value == candidate.value && crate::unit::family(&n.unit) == crate::unit::family(&candidate.unit))
            {
                found.push(candidate);
            }
        }
    }

    found
}
