use std::fmt;

use serde::{Deserialize, Serialize};

/// The raw text of a form field
///
/// Form fields hold whatever the user typed; numbers are read from the text
/// on demand. Reading is lenient in the same way browsers parse numbers out of
/// inputs: the longest numeric prefix counts, so `"12 days"` reads as `12`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(String);

impl Entry {
    pub fn new(text: impl Into<String>) -> Self {
        Entry(text.into())
    }

    pub fn number(value: f64) -> Self {
        Entry(format_number(value))
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The numeric value of the field, if its text starts with a number
    pub fn value(&self) -> Option<f64> {
        leading_number(&self.0)
    }

    /// Rewrite the text to its parsed value. Returns the value, or `None`
    /// (leaving the text untouched) when the field is not numeric.
    pub fn normalize(&mut self) -> Option<f64> {
        let value = self.value()?;
        self.0 = format_number(value);
        Some(value)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Entry {
    fn from(text: &str) -> Self {
        Entry::new(text)
    }
}

impl From<f64> for Entry {
    fn from(value: f64) -> Self {
        Entry::number(value)
    }
}

/// Formats without a trailing `.0`, so `123.0` becomes `123` and `6.5` stays `6.5`
pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Parses the longest prefix of `text` (after leading whitespace) that forms a
/// decimal number, with an optional sign, fraction and exponent.
pub(crate) fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("12"), Some(12.0));
        assert_eq!(leading_number("  6.5"), Some(6.5));
        assert_eq!(leading_number("12abc"), Some(12.0));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("-3"), Some(-3.0));
        assert_eq!(leading_number("1e2x"), Some(100.0));
        assert_eq!(leading_number("1e"), Some(1.0));
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("."), None);
    }

    #[test]
    fn test_normalize_rewrites_text() {
        let mut entry = Entry::new("30 days");
        assert_eq!(entry.normalize(), Some(30.0));
        assert_eq!(entry.text(), "30");

        let mut entry = Entry::new("n/a");
        assert_eq!(entry.normalize(), None);
        assert_eq!(entry.text(), "n/a");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(Entry::number(123.0).text(), "123");
        assert_eq!(Entry::number(6.5).text(), "6.5");
    }
}
