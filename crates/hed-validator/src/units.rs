//! # Unit Handling
//!
//! Splits a unit-class value such as `3 ms` or `20 kilohertz` into a
//! numeric remainder by removing one unit (and at most one SI modifier),
//! then checks that the remainder is a number.
//!
//! ## Matching order
//!
//! Units are tried longest first so `ms` wins over `s`. Each unit yields
//! its match variants:
//!
//! - a **symbol** (`s`, `Hz`) is compared verbatim against the original
//!   value and never pluralized;
//! - a **word** (`second`, `hertz`) is lower-cased and compared against the
//!   lower-cased value, plural form first.
//!
//! The first variant found at either end of the value wins.

use hed_core::SchemaQuery;

use crate::pluralize::Pluralizer;

/// Unit-class name for calendar date-times.
pub const DATE_TIME_CLASS: &str = "datetime";
/// Unit-class name for clock-face times.
pub const CLOCK_TIME_CLASS: &str = "clocktime";
/// Unit-class name for durations.
pub const TIME_CLASS: &str = "time";

/// Whether `value` is a numeric literal.
///
/// Accepts an optional leading `-`, digits with at most one `.` and at
/// least one digit, and an optional `e`/`E` exponent with an optional `-`.
/// With `allow_pound` the lone `#` is also accepted.
pub fn is_numeric_literal(value: &str, allow_pound: bool) -> bool {
    if value == "#" {
        return allow_pound;
    }
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => (&unsigned[..index], Some(&unsigned[index + 1..])),
        None => (unsigned, None),
    };

    let mut digits = 0;
    let mut points = 0;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    if digits == 0 || points > 1 {
        return false;
    }

    match exponent {
        None => true,
        Some(exponent) => {
            let exponent = exponent.strip_prefix('-').unwrap_or(exponent);
            !exponent.is_empty() && exponent.chars().all(|c| c.is_ascii_digit())
        }
    }
}

/// Removes units and SI modifiers from unit-class values.
pub struct UnitStripper<'a> {
    schema: &'a dyn SchemaQuery,
    pluralizer: &'a dyn Pluralizer,
}

/// A unit spelling to look for, and how to compare it.
struct Variant {
    text: String,
    symbol: bool,
}

impl<'a> UnitStripper<'a> {
    /// Strip against `schema` using `pluralizer` for word units.
    pub fn new(schema: &'a dyn SchemaQuery, pluralizer: &'a dyn Pluralizer) -> Self {
        Self { schema, pluralizer }
    }

    /// Remove the first matching unit of `units` from `original_value`.
    ///
    /// Returns the trimmed remainder, or `None` when no unit matched. The
    /// remainder keeps the case of whichever form the unit was compared
    /// against.
    pub fn strip_unit(&self, original_value: &str, units: &[String]) -> Option<String> {
        let lower_value = original_value.to_lowercase();
        for variant in self.variants(units) {
            let value = if variant.symbol {
                original_value
            } else {
                lower_value.as_str()
            };
            let Some(remainder) = strip_either_end(value, &variant.text) else {
                continue;
            };
            let remainder = remainder.trim();
            let remainder = if self.schema.has_unit_modifiers() {
                self.strip_modifier(remainder, variant.symbol)
            } else {
                remainder
            };
            return Some(remainder.to_string());
        }
        None
    }

    /// Variants of `units` in matching order.
    fn variants(&self, units: &[String]) -> Vec<Variant> {
        let mut sorted: Vec<&String> = units.iter().collect();
        sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let mut variants = Vec::new();
        for unit in sorted {
            if self.schema.is_unit_symbol(unit) {
                variants.push(Variant {
                    text: unit.clone(),
                    symbol: true,
                });
                continue;
            }
            let singular = unit.to_lowercase();
            let plural = self.pluralizer.plural_of(&singular).to_lowercase();
            if plural != singular {
                variants.push(Variant {
                    text: plural,
                    symbol: false,
                });
            }
            variants.push(Variant {
                text: singular,
                symbol: false,
            });
        }
        variants
    }

    /// Remove one SI modifier of the matching form from either end.
    fn strip_modifier<'v>(&self, value: &'v str, symbol: bool) -> &'v str {
        let mut modifiers = self.schema.si_modifiers(symbol);
        modifiers.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        modifiers
            .into_iter()
            .find_map(|modifier| strip_either_end(value, modifier))
            .map_or(value, str::trim)
    }
}

fn strip_either_end<'v>(value: &'v str, affix: &str) -> Option<&'v str> {
    if affix.is_empty() {
        return None;
    }
    value
        .strip_prefix(affix)
        .or_else(|| value.strip_suffix(affix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pluralize::EnglishPluralizer;
    use hed_core::SchemaAttributeDictionary;
    use proptest::prelude::*;

    fn schema(with_modifiers: bool) -> SchemaAttributeDictionary {
        let mut builder = SchemaAttributeDictionary::builder()
            .unit_class_tag("Event/Duration", &["time"])
            .unit_class("time", &["s", "ms", "second", "day"], "s")
            .unit_class("frequency", &["Hz", "hertz"], "Hz")
            .unit_class("physicalLength", &["m", "metre", "foot"], "m")
            .unit_symbol("s")
            .unit_symbol("ms")
            .unit_symbol("Hz")
            .unit_symbol("m");
        if with_modifiers {
            builder = builder
                .si_unit_symbol_modifier("k")
                .si_unit_symbol_modifier("m")
                .si_unit_symbol_modifier("M")
                .si_unit_symbol_modifier("da")
                .si_unit_modifier("kilo")
                .si_unit_modifier("milli");
        }
        builder.build().unwrap()
    }

    fn units(dict: &SchemaAttributeDictionary, class: &str) -> Vec<String> {
        dict.units_for_class(class).unwrap().to_vec()
    }

    fn strip(dict: &SchemaAttributeDictionary, value: &str, class: &str) -> Option<String> {
        let pluralizer = EnglishPluralizer::default();
        UnitStripper::new(dict, &pluralizer).strip_unit(value, &units(dict, class))
    }

    #[test]
    fn numeric_literals() {
        for ok in ["3", "-3", "3.5", ".5", "5.", "1e10", "1E-3", "-2.5e4"] {
            assert!(is_numeric_literal(ok, false), "{ok}");
        }
        for bad in ["", "-", ".", "1.2.3", "1e", "1e-", "e5", "3 s", "+3", "1e+3", "#"] {
            assert!(!is_numeric_literal(bad, false), "{bad}");
        }
    }

    #[test]
    fn pound_only_in_pound_mode() {
        assert!(is_numeric_literal("#", true));
        assert!(!is_numeric_literal("#", false));
        assert!(!is_numeric_literal("-#", true));
    }

    #[test]
    fn longest_unit_wins() {
        let dict = schema(false);
        assert_eq!(strip(&dict, "3 ms", "time").as_deref(), Some("3"));
        assert_eq!(strip(&dict, "3 s", "time").as_deref(), Some("3"));
    }

    #[test]
    fn word_units_match_plural_and_any_case() {
        let dict = schema(false);
        assert_eq!(strip(&dict, "3 Seconds", "time").as_deref(), Some("3"));
        assert_eq!(strip(&dict, "1 second", "time").as_deref(), Some("1"));
        assert_eq!(strip(&dict, "2 days", "time").as_deref(), Some("2"));
        assert_eq!(strip(&dict, "2 feet", "physicalLength").as_deref(), Some("2"));
        assert_eq!(strip(&dict, "20 hertz", "frequency").as_deref(), Some("20"));
    }

    #[test]
    fn symbols_are_case_sensitive_and_never_plural() {
        let dict = schema(false);
        assert_eq!(strip(&dict, "20 Hz", "frequency").as_deref(), Some("20"));
        assert_eq!(strip(&dict, "20 hz", "frequency"), None);
        assert_eq!(strip(&dict, "20 Hzs", "frequency"), None);
    }

    #[test]
    fn unit_may_lead_the_value() {
        let dict = schema(false);
        assert_eq!(strip(&dict, "s 3", "time").as_deref(), Some("3"));
    }

    #[test]
    fn no_match_is_none() {
        let dict = schema(false);
        assert_eq!(strip(&dict, "3 cm", "time"), None);
    }

    #[test]
    fn modifiers_only_when_declared() {
        let plain = schema(false);
        assert_eq!(strip(&plain, "3 km", "physicalLength").as_deref(), Some("3 k"));
        let with = schema(true);
        assert_eq!(strip(&with, "3 km", "physicalLength").as_deref(), Some("3"));
        assert_eq!(strip(&with, "3 kilometres", "physicalLength").as_deref(), Some("3"));
        assert_eq!(strip(&with, "3 Mm", "physicalLength").as_deref(), Some("3"));
    }

    #[test]
    fn symbol_modifier_keeps_case() {
        let with = schema(true);
        assert_eq!(strip(&with, "3 dam", "physicalLength").as_deref(), Some("3"));
        assert_eq!(strip(&with, "3 Km", "physicalLength").as_deref(), Some("3 K"));
    }

    #[test]
    fn at_most_one_modifier_is_stripped() {
        let with = schema(true);
        assert_eq!(strip(&with, "3 kkm", "physicalLength").as_deref(), Some("3 k"));
    }

    proptest! {
        #[test]
        fn integers_are_numeric(n in any::<i64>()) {
            prop_assert!(is_numeric_literal(&n.to_string(), false));
        }

        #[test]
        fn numbers_with_symbol_unit_strip_to_number(n in 0u32..100_000) {
            let dict = schema(true);
            let value = format!("{n} ms");
            prop_assert_eq!(strip(&dict, &value, "time"), Some(n.to_string()));
        }
    }
}
