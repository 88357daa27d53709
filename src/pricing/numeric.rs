// src/pricing/numeric.rs

//! Lenient numeric coercion for spreadsheet cells.
//!
//! Cells come from free-form spreadsheets, so a value may be a real number, a
//! string such as `"1 234,56"` or `"2 semaines"`, or garbage. Coercion never
//! fails: it falls back to a caller-supplied default and reports whether it
//! had to.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// First numeric token in a cell, with optional grouping separators
/// (space, no-break space, `.` or `,` followed by exactly three digits) and an
/// optional decimal part. The trailing group stops a token such as `12.3456`
/// from being cut after a three-digit group.
static NUMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-+]?[0-9]+(?:[ \u{00A0}\u{202F}.,][0-9]{3})*(?:[.,][0-9]+)?)(?:[^0-9]|$)")
        .expect("number token regex is valid")
});

/// A raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a text cell, collapsing whitespace-only input to `Empty`.
    pub fn text(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::text(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            // Whole numbers print without a trailing ".0" so numeric product
            // codes read back the way they were typed.
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Result of a lenient coercion.
///
/// `defaulted` is `true` when the cell was absent or unparsable and `value`
/// is the caller's default, which lets callers tell a clean zero apart from a
/// zero that stands in for bad input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Lenient<T> {
    fn parsed(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }
}

/// Coerce a cell to `f64`, falling back to `default`.
pub fn parse_numeric_lenient(raw: &CellValue, default: f64) -> Lenient<f64> {
    match raw {
        CellValue::Empty => Lenient::fallback(default),
        CellValue::Number(n) if n.is_finite() => Lenient::parsed(*n),
        CellValue::Number(_) => Lenient::fallback(default),
        CellValue::Text(text) => match parse_number_text(text) {
            Some(n) => Lenient::parsed(n),
            None => Lenient::fallback(default),
        },
    }
}

/// Coerce a cell to an integer, truncating any fractional part toward zero.
pub fn parse_integer_lenient(raw: &CellValue, default: i64) -> Lenient<i64> {
    let parsed = parse_numeric_lenient(raw, 0.0);
    if parsed.defaulted {
        return Lenient::fallback(default);
    }
    Lenient::parsed(parsed.value.trunc() as i64)
}

/// Extract and parse the first numeric token of `text`.
///
/// A token whose grouping is inconsistent (`"1,234,5"`) yields `None`
/// rather than a guess.
pub fn parse_number_text(text: &str) -> Option<f64> {
    let caps = NUMBER_TOKEN.captures(text)?;
    let token = caps.get(1)?.as_str();
    let normalised = normalise_separators(token)?;
    normalised.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Turn a matched token into something `f64::from_str` accepts.
///
/// - Space-like separators are always grouping separators.
/// - When both `.` and `,` occur, the last one is the decimal mark and may
///   occur only once.
/// - A single kind occurring more than once is a grouping separator.
/// - A single occurrence is a decimal mark (`"1,5"` is 1.5).
///
/// Every group after a grouping separator must hold exactly three digits.
fn normalise_separators(token: &str) -> Option<String> {
    let compact: String = token
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{00A0}' | '\u{202F}'))
        .collect();

    let commas = compact.matches(',').count();
    let dots = compact.matches('.').count();

    match (commas, dots) {
        (0, 0) => Some(compact),
        (c, d) if c > 0 && d > 0 => {
            let (decimal, grouping) = if compact.rfind(',') > compact.rfind('.') {
                (',', '.')
            } else {
                ('.', ',')
            };
            if compact.matches(decimal).count() > 1 {
                return None;
            }
            let (int, frac) = compact.rsplit_once(decimal)?;
            if !three_digit_groups(int, grouping) {
                return None;
            }
            Some(format!("{}.{frac}", int.replace(grouping, "")))
        }
        (c, 0) if c > 1 => three_digit_groups(&compact, ',').then(|| compact.replace(',', "")),
        (0, d) if d > 1 => three_digit_groups(&compact, '.').then(|| compact.replace('.', "")),
        _ => Some(compact.replace(',', ".")),
    }
}

fn three_digit_groups(digits: &str, separator: char) -> bool {
    digits.split(separator).skip(1).all(|group| group.len() == 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(
            parse_numeric_lenient(&CellValue::Number(5.5), 0.0),
            Lenient { value: 5.5, defaulted: false }
        );
    }

    #[test]
    fn french_grouping_and_decimal_comma() {
        assert_eq!(parse_numeric_lenient(&text("1 234,56"), 0.0).value, 1234.56);
        assert_eq!(parse_numeric_lenient(&text("1\u{00A0}234,56 €"), 0.0).value, 1234.56);
        assert_eq!(parse_numeric_lenient(&text("5,50"), 0.0).value, 5.5);
    }

    #[test]
    fn english_grouping() {
        assert_eq!(parse_numeric_lenient(&text("1,234.5"), 0.0).value, 1234.5);
        assert_eq!(parse_numeric_lenient(&text("1.234.567"), 0.0).value, 1_234_567.0);
    }

    #[test]
    fn inconsistent_grouping_is_rejected() {
        assert_eq!(parse_number_text("1,234,5"), None);
        assert_eq!(parse_number_text("1.234.5678"), None);
        assert_eq!(parse_number_text("1,234,567.8"), Some(1_234_567.8));
        assert_eq!(parse_number_text("1.234.567,8"), Some(1_234_567.8));

        let cell = parse_numeric_lenient(&text("1,234,5 €"), 0.0);
        assert_eq!(cell, Lenient { value: 0.0, defaulted: true });
    }

    #[test]
    fn long_decimal_part_is_not_split() {
        assert_eq!(parse_numeric_lenient(&text("12.3456"), 0.0).value, 12.3456);
    }

    #[test]
    fn embedded_text_uses_first_token() {
        assert_eq!(parse_numeric_lenient(&text("env. 3 semaines"), 0.0).value, 3.0);
        assert_eq!(parse_numeric_lenient(&text("12kg"), 0.0).value, 12.0);
        assert_eq!(parse_numeric_lenient(&text("délai: -2"), 0.0).value, -2.0);
    }

    #[test]
    fn blank_and_garbage_are_reported_as_defaulted() {
        let blank = parse_numeric_lenient(&CellValue::Empty, 7.0);
        assert_eq!(blank, Lenient { value: 7.0, defaulted: true });

        let garbage = parse_numeric_lenient(&text("n/a"), 0.0);
        assert!(garbage.defaulted);
        assert_eq!(garbage.value, 0.0);

        let nan = parse_numeric_lenient(&CellValue::Number(f64::NAN), 1.0);
        assert!(nan.defaulted);
    }

    #[test]
    fn clean_zero_is_not_defaulted() {
        let zero = parse_numeric_lenient(&text("0"), 0.0);
        assert_eq!(zero, Lenient { value: 0.0, defaulted: false });
    }

    #[test]
    fn integers_truncate() {
        assert_eq!(parse_integer_lenient(&text("1,5"), 0).value, 1);
        assert_eq!(parse_integer_lenient(&CellValue::Number(2.9), 0).value, 2);
        assert_eq!(parse_integer_lenient(&text("abc"), 4), Lenient { value: 4, defaulted: true });
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(200.0).to_string(), "200");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(text("  ").to_string(), "");
    }
}
