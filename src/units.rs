//! Derived-field computation: average gross weight per package.
//!
//! Extracted fields arrive as free-text strings copied from real shipping
//! paperwork — `"25 PKGS"`, `"16250.000 KGS"`, `"35,273 LBS"` — so the
//! arithmetic here is deliberately fail-soft: any value that does not reduce
//! to a usable number yields `None` instead of an error. This is the one
//! place the pipeline degrades silently by design; everything upstream
//! fails hard.
//!
//! Unit handling is table-driven: each known mass unit maps to a multiplier
//! into kilograms, so supporting a new unit is one new table row, not a new
//! string-replace call site.

use crate::output::ExtractedFields;

/// One recognised mass-unit suffix and its conversion into kilograms.
struct MassUnit {
    symbol: &'static str,
    to_kilograms: f64,
}

/// Known mass units, longest symbol first so `KGS` is consumed before `KG`
/// ever matches inside it.
const MASS_UNITS: &[MassUnit] = &[
    MassUnit { symbol: "KGS", to_kilograms: 1.0 },
    MassUnit { symbol: "LBS", to_kilograms: 0.453_592_37 },
    MassUnit { symbol: "KG", to_kilograms: 1.0 },
    MassUnit { symbol: "LB", to_kilograms: 0.453_592_37 },
];

/// Reduce a free-text value to its digits-and-decimal-point residue and
/// parse it. `"25 PKGS"` → 25.0, `"1,250.5"` → 1250.5, `"N/A"` → None.
fn numeric_residue(raw: &str) -> Option<f64> {
    let residue: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if residue.is_empty() {
        return None;
    }
    residue.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a gross-weight string into kilograms.
///
/// The first matching unit symbol (case-insensitive) is removed and its
/// multiplier applied; a value with no recognised unit is assumed to be in
/// kilograms already.
fn weight_in_kilograms(raw: &str) -> Option<f64> {
    let upper = raw.to_uppercase();
    let mut stripped = upper;
    let mut multiplier = 1.0;
    for unit in MASS_UNITS {
        if stripped.contains(unit.symbol) {
            stripped = stripped.replace(unit.symbol, "");
            multiplier = unit.to_kilograms;
            break;
        }
    }
    numeric_residue(&stripped).map(|v| v * multiplier)
}

/// Compute gross weight ÷ package count as a string, or `None` when either
/// value is unusable or the count is not strictly positive.
pub fn average_weight_per_package(package_count: &str, gross_weight: &str) -> Option<String> {
    let count = numeric_residue(package_count)?;
    let weight = weight_in_kilograms(gross_weight)?;
    if count > 0.0 {
        Some((weight / count).to_string())
    } else {
        None
    }
}

/// Fill in `average_gross_weight` on a freshly parsed record.
///
/// Overwrites whatever the model reported for the field; the derived value
/// is authoritative. Missing inputs leave the field null.
pub fn apply_derived_fields(fields: &mut ExtractedFields) {
    fields.average_gross_weight = match (&fields.package_count, &fields.gross_weight) {
        (Some(count), Some(weight)) => average_weight_per_package(count, weight),
        _ => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(s: &Option<String>) -> f64 {
        s.as_deref().unwrap().parse().unwrap()
    }

    #[test]
    fn average_from_suffixed_values() {
        let avg = average_weight_per_package("25 PKGS", "16250.000 KGS");
        assert_eq!(parsed(&avg), 650.0);
    }

    #[test]
    fn pounds_convert_to_kilograms() {
        let avg = average_weight_per_package("10", "1000 LBS").unwrap();
        let value: f64 = avg.parse().unwrap();
        assert!((value - 45.359_237).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn unitless_weight_is_taken_as_kilograms() {
        let avg = average_weight_per_package("4", "100");
        assert_eq!(parsed(&avg), 25.0);
    }

    #[test]
    fn zero_count_yields_none() {
        assert_eq!(average_weight_per_package("0", "16250 KGS"), None);
        assert_eq!(average_weight_per_package("0 PKGS", "100"), None);
    }

    #[test]
    fn unparsable_values_yield_none() {
        assert_eq!(average_weight_per_package("N/A", "100 KGS"), None);
        assert_eq!(average_weight_per_package("25", "unknown"), None);
        assert_eq!(average_weight_per_package("25", "1.2.3 KGS"), None);
        assert_eq!(average_weight_per_package("", ""), None);
    }

    #[test]
    fn thousands_separators_are_ignored() {
        let avg = average_weight_per_package("2", "1,000 KGS");
        assert_eq!(parsed(&avg), 500.0);
    }

    #[test]
    fn lowercase_units_match() {
        let avg = average_weight_per_package("5", "250 kgs");
        assert_eq!(parsed(&avg), 50.0);
    }

    #[test]
    fn apply_sets_and_clears_the_derived_field() {
        let mut fields = ExtractedFields {
            package_count: Some("25 PKGS".into()),
            gross_weight: Some("16250.000 KGS".into()),
            // A model-reported value gets replaced by the computed one.
            average_gross_weight: Some("bogus".into()),
            ..ExtractedFields::default()
        };
        apply_derived_fields(&mut fields);
        assert_eq!(parsed(&fields.average_gross_weight), 650.0);

        fields.package_count = None;
        apply_derived_fields(&mut fields);
        assert_eq!(fields.average_gross_weight, None);
    }
}
