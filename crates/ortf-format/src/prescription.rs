//! `RX` prescription detail records: schema-driven decode, in-place field
//! mutation, and the derived needs-by date.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::error::{OrtfError, Result};
use crate::record::{RECORD_LEN, check_prefix, replace_columns, slice_columns};
use crate::schema::{FieldClass, FormatVersion};

/// Base date substituted when `MOST RECENT DATE FILLED` does not parse as a
/// `YYYYMMDD` date. Far enough in the future that the prescription never
/// looks due.
const FALLBACK_FILL_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2050, 1, 1) {
    Some(date) => date,
    None => unreachable!(),
};

/// Days-supply substituted when `DAYS SUPPLY` does not parse as an integer.
const FALLBACK_DAYS_SUPPLY: i64 = 30;

/// A decoded field value.
///
/// Numeric-class fields decode to [`FieldValue::Number`] only when the
/// trimmed content is a plain decimal integer; anything else (including the
/// empty content of unpopulated optional fields) stays text. That ambiguity
/// is part of the format: decoding never fails on malformed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
}

impl FieldValue {
    /// The text content, or `None` for numbers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Number(_) => None,
        }
    }

    /// The numeric content, or `None` for text.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Number(number) => Some(*number),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Numbers render without any leading zeros the raw field may have had.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// A single `RX` prescription detail line with its decoded fields.
///
/// All fields are decoded once at construction against the layout table for
/// the document's format version. The needs-by date is likewise derived once
/// and is deliberately not recomputed after mutation; it reflects the record
/// as received.
#[derive(Debug, Clone)]
pub struct PrescriptionRecord {
    line: String,
    version: FormatVersion,
    fields: HashMap<&'static str, FieldValue>,
    needs_by_date: NaiveDate,
}

impl PrescriptionRecord {
    pub fn new(raw: impl Into<String>, version: FormatVersion) -> Result<Self> {
        let line = raw.into();
        check_prefix(&line, "RX")?;
        let fields = decode_fields(&line, version);
        let needs_by_date = derive_needs_by_date(&fields);
        Ok(Self {
            line,
            version,
            fields,
            needs_by_date,
        })
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Reorder trigger date: one week before the (week-rounded) days supply
    /// from the most recent fill runs out.
    pub fn needs_by_date(&self) -> NaiveDate {
        self.needs_by_date
    }

    /// The decoded value of `name`.
    pub fn get(&self, name: &str) -> Result<&FieldValue> {
        self.fields.get(name).ok_or_else(|| OrtfError::UnknownField {
            version: self.version,
            name: name.to_string(),
        })
    }

    /// Overwrite an alphanumeric field in place.
    ///
    /// The value is trimmed, checked against the declared length in
    /// characters, then right-padded with spaces to fill exactly the field's
    /// column range. Numeric fields are rejected with
    /// [`OrtfError::WrongFieldClass`]; over-length values with
    /// [`OrtfError::ValueTooLong`]. Either rejection leaves both the buffer
    /// and the decoded map untouched.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let (canonical, spec) = self.version.field(name)?;
        if spec.class != FieldClass::Alphanumeric {
            return Err(OrtfError::WrongFieldClass {
                name: canonical.to_string(),
            });
        }
        let trimmed = value.trim();
        let chars = trimmed.chars().count();
        if chars > spec.length {
            return Err(OrtfError::ValueTooLong {
                name: canonical.to_string(),
                actual: chars,
                limit: spec.length,
            });
        }

        self.fields
            .insert(canonical, FieldValue::Text(trimmed.to_string()));
        let padded = format!("{trimmed:<width$}", width = spec.length);
        replace_columns(&mut self.line, spec.char_range(), &padded);
        // Fixed-width records must never change column count.
        assert_eq!(self.line.chars().count(), RECORD_LEN);
        Ok(())
    }

    pub fn as_line(&self) -> &str {
        &self.line
    }
}

/// Decode every schema field of `version` from the raw line.
///
/// Slices past the end of a short line decode as empty rather than failing;
/// valid input is always exactly [`RECORD_LEN`] characters.
fn decode_fields(line: &str, version: FormatVersion) -> HashMap<&'static str, FieldValue> {
    let mut fields = HashMap::with_capacity(version.fields().len());
    for (name, spec) in version.fields() {
        let text = slice_columns(line, spec.char_range()).trim();
        let value = if spec.class == FieldClass::Numeric && is_decimal(text) {
            match text.parse::<i64>() {
                Ok(number) => FieldValue::Number(number),
                Err(_) => FieldValue::Text(text.to_string()),
            }
        } else {
            FieldValue::Text(text.to_string())
        };
        fields.insert(*name, value);
    }
    fields
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// Derive the needs-by date from the decoded fields.
///
/// The days supply is rounded down to a whole number of weeks, then backed
/// off one more week, so the trigger lands a week before the rounded-down
/// supply is exhausted. Malformed inputs fall back to fixed defaults
/// (2050-01-01 and 30 days) instead of failing; receiving systems must never
/// reject a record over these fields.
fn derive_needs_by_date(fields: &HashMap<&'static str, FieldValue>) -> NaiveDate {
    let filled_text = fields
        .get("MOST RECENT DATE FILLED")
        .map(|value| value.to_string())
        .unwrap_or_default();
    let most_recent_fill =
        NaiveDate::parse_from_str(&filled_text, "%Y%m%d").unwrap_or(FALLBACK_FILL_DATE);

    let days_supply = match fields.get("DAYS SUPPLY") {
        Some(FieldValue::Number(number)) => *number,
        Some(FieldValue::Text(text)) => text.parse().unwrap_or(FALLBACK_DAYS_SUPPLY),
        None => FALLBACK_DAYS_SUPPLY,
    };

    most_recent_fill + Duration::days(days_supply - 7 - days_supply.rem_euclid(7))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 1600-character RX line for the given version with selected
    /// fields populated.
    fn rx_line(version: FormatVersion, values: &[(&str, &str)]) -> String {
        let mut line = format!("{:<RECORD_LEN$}", "RX");
        for (name, value) in values {
            let (_, spec) = version.field(name).unwrap();
            let padded = format!("{value:<width$}", width = spec.length);
            line.replace_range(spec.char_range(), &padded);
        }
        line
    }

    #[test]
    fn rejects_wrong_prefix() {
        let line = format!("{:<RECORD_LEN$}", "ST");
        let err = PrescriptionRecord::new(line, FormatVersion::V20).unwrap_err();
        assert!(matches!(err, OrtfError::PrefixMismatch { expected: "RX", .. }));
    }

    #[test]
    fn numeric_fields_decode_to_integers() {
        let line = rx_line(
            FormatVersion::V20,
            &[
                ("DAYS SUPPLY", "030"),
                ("PRESCRIPTION/SERVICE REFERENCE NUMBER", "000123456789"),
                ("PATIENT LAST NAME", "DOE"),
            ],
        );
        let rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        assert_eq!(rx.get("DAYS SUPPLY").unwrap().as_number(), Some(30));
        assert_eq!(
            rx.get("PRESCRIPTION/SERVICE REFERENCE NUMBER")
                .unwrap()
                .as_number(),
            Some(123_456_789)
        );
        assert_eq!(rx.get("PATIENT LAST NAME").unwrap().as_text(), Some("DOE"));
    }

    #[test]
    fn empty_numeric_field_degrades_to_text() {
        let line = rx_line(FormatVersion::V20, &[]);
        let rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        assert_eq!(
            rx.get("PATIENT TELEPHONE NUMBER").unwrap(),
            &FieldValue::Text(String::new())
        );
    }

    #[test]
    fn unknown_field_lookup_fails() {
        let line = rx_line(FormatVersion::V20, &[]);
        let rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        assert!(matches!(
            rx.get("FILL NUMBER").unwrap_err(),
            OrtfError::UnknownField { .. }
        ));
    }

    #[test]
    fn needs_by_date_rounds_supply_to_weeks() {
        // 30 days supply rounds down to 28, minus one more week is 21.
        let line = rx_line(
            FormatVersion::V20,
            &[("MOST RECENT DATE FILLED", "20210101"), ("DAYS SUPPLY", "30")],
        );
        let rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        assert_eq!(
            rx.needs_by_date(),
            NaiveDate::from_ymd_opt(2021, 1, 22).unwrap()
        );
    }

    #[test]
    fn needs_by_date_falls_back_on_malformed_date() {
        let line = rx_line(
            FormatVersion::V20,
            &[("MOST RECENT DATE FILLED", "notadate"), ("DAYS SUPPLY", "30")],
        );
        let rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        assert_eq!(
            rx.needs_by_date(),
            NaiveDate::from_ymd_opt(2050, 1, 22).unwrap()
        );
    }

    #[test]
    fn needs_by_date_falls_back_on_malformed_days_supply() {
        let line = rx_line(
            FormatVersion::V20,
            &[("MOST RECENT DATE FILLED", "20210101"), ("DAYS SUPPLY", "n/a")],
        );
        let rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        // Default 30 days supply yields the same 21-day offset.
        assert_eq!(
            rx.needs_by_date(),
            NaiveDate::from_ymd_opt(2021, 1, 22).unwrap()
        );
    }

    #[test]
    fn set_rewrites_exactly_the_field_columns() {
        let line = rx_line(FormatVersion::V20, &[("PRODUCT STRENGTH", "630 mg")]);
        let before = line.clone();
        let mut rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        rx.set("PRODUCT STRENGTH", "500 mg").unwrap();

        let (_, spec) = FormatVersion::V20.field("PRODUCT STRENGTH").unwrap();
        let after = rx.as_line();
        assert_eq!(after.len(), RECORD_LEN);
        assert_eq!(&after[spec.char_range()], "500 mg         ");
        // Everything outside the field's columns is byte-for-byte unchanged.
        assert_eq!(after[..spec.char_range().start], before[..spec.char_range().start]);
        assert_eq!(after[spec.char_range().end..], before[spec.char_range().end..]);
        assert_eq!(
            rx.get("PRODUCT STRENGTH").unwrap().as_text(),
            Some("500 mg")
        );
    }

    #[test]
    fn distinct_mutations_do_not_interfere() {
        let line = rx_line(FormatVersion::V20, &[]);
        let mut rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        rx.set("PRODUCT DOSAGE FORM", "TABLET").unwrap();
        let between = rx.as_line().to_string();
        rx.set("PRESCRIBED DRUG DESCRIPTION", "VASCULERA TABLETS 30")
            .unwrap();

        let (_, desc) = FormatVersion::V20
            .field("PRESCRIBED DRUG DESCRIPTION")
            .unwrap();
        let after = rx.as_line();
        assert_eq!(after[..desc.char_range().start], between[..desc.char_range().start]);
        assert_eq!(after[desc.char_range().end..], between[desc.char_range().end..]);
    }

    #[test]
    fn set_rejects_numeric_fields_without_mutation() {
        let line = rx_line(FormatVersion::V20, &[("DAYS SUPPLY", "030")]);
        let mut rx = PrescriptionRecord::new(line.clone(), FormatVersion::V20).unwrap();
        let err = rx.set("DAYS SUPPLY", "60").unwrap_err();
        assert!(matches!(err, OrtfError::WrongFieldClass { .. }));
        assert_eq!(rx.as_line(), line);
        assert_eq!(rx.get("DAYS SUPPLY").unwrap().as_number(), Some(30));
    }

    #[test]
    fn set_rejects_over_length_values_without_mutation() {
        let line = rx_line(FormatVersion::V20, &[]);
        let mut rx = PrescriptionRecord::new(line.clone(), FormatVersion::V20).unwrap();
        // PRODUCT STRENGTH is declared 15 characters.
        let err = rx.set("PRODUCT STRENGTH", "0123456789ABCDEF").unwrap_err();
        assert!(matches!(
            err,
            OrtfError::ValueTooLong { actual: 16, limit: 15, .. }
        ));
        assert_eq!(rx.as_line(), line);
    }

    #[test]
    fn set_accepts_accented_values_and_keeps_columns_aligned() {
        let line = rx_line(FormatVersion::V20, &[]);
        let mut rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        rx.set("PATIENT LAST NAME", "Müller").unwrap();
        assert_eq!(rx.as_line().chars().count(), RECORD_LEN);
        assert_eq!(rx.get("PATIENT LAST NAME").unwrap().as_text(), Some("Müller"));

        // A later mutation past the multibyte value lands on its own columns.
        rx.set("PATIENT FIRST NAME", "ANA").unwrap();
        let reread = PrescriptionRecord::new(rx.as_line(), FormatVersion::V20).unwrap();
        assert_eq!(reread.get("PATIENT LAST NAME").unwrap().as_text(), Some("Müller"));
        assert_eq!(reread.get("PATIENT FIRST NAME").unwrap().as_text(), Some("ANA"));
    }

    #[test]
    fn set_measures_length_in_characters_not_bytes() {
        let line = rx_line(FormatVersion::V20, &[]);
        let mut rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        // PATIENT STATE is declared 2 characters; "ÜÜ" is two chars, four bytes.
        rx.set("PATIENT STATE", "ÜÜ").unwrap();
        let err = rx.set("PATIENT STATE", "ÜÜÜ").unwrap_err();
        assert!(matches!(err, OrtfError::ValueTooLong { actual: 3, limit: 2, .. }));
        assert_eq!(rx.get("PATIENT STATE").unwrap().as_text(), Some("ÜÜ"));
    }

    #[test]
    fn set_trims_before_length_check() {
        let line = rx_line(FormatVersion::V20, &[]);
        let mut rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        rx.set("PATIENT STATE", "  NY  ").unwrap();
        let (_, spec) = FormatVersion::V20.field("PATIENT STATE").unwrap();
        assert_eq!(&rx.as_line()[spec.char_range()], "NY");
    }

    #[test]
    fn version_33_offsets_apply() {
        let line = rx_line(
            FormatVersion::V33,
            &[
                ("MOST RECENT DATE FILLED", "20210301"),
                ("DAYS SUPPLY", "090"),
                ("FILL NUMBER", "02"),
            ],
        );
        let rx = PrescriptionRecord::new(line, FormatVersion::V33).unwrap();
        assert_eq!(rx.get("FILL NUMBER").unwrap().as_number(), Some(2));
        // 90 rounds down to 84, minus 7 is 77 days past 2021-03-01.
        assert_eq!(
            rx.needs_by_date(),
            NaiveDate::from_ymd_opt(2021, 5, 17).unwrap()
        );
    }
}
