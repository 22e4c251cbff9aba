//! Fixed-length record types for the non-detail portions of an ORTF document.
//!
//! Every ORTF record is a 1600-character line whose first two characters name
//! the record type. The set of record kinds is closed; each gets its own
//! struct rather than an open hierarchy. Prescription detail records live in
//! [`crate::prescription`] since they carry decoded field state.

use std::ops::Range;

use crate::error::{OrtfError, Result};
use crate::schema::FormatVersion;

/// Fixed length of every ORTF record, in both format versions.
pub const RECORD_LEN: usize = 1600;

/// Subtotal count columns in the ST record (8 digits, zero-padded).
/// Same columns in both format versions.
const SUBTOTAL_COUNT_RANGE: Range<usize> = 71..79;

/// Total count columns in the XT record (10 digits, zero-padded).
/// Same columns in both format versions.
const TRAILER_TOTAL_RANGE: Range<usize> = 9..19;

/// Slice `line` by column (character) positions. Columns and bytes coincide
/// for ASCII content; a range past the end of the line yields `""`.
pub(crate) fn slice_columns(line: &str, columns: Range<usize>) -> &str {
    if line.is_ascii() {
        return line.get(columns).unwrap_or("");
    }
    let start = char_offset(line, columns.start);
    let end = char_offset(line, columns.end);
    &line[start..end]
}

/// Overwrite the given columns of `line` with `value`, which must span the
/// same number of characters.
pub(crate) fn replace_columns(line: &mut String, columns: Range<usize>, value: &str) {
    let start = char_offset(line, columns.start);
    let end = char_offset(line, columns.end);
    line.replace_range(start..end, value);
}

/// Byte offset of the 0-based character position `column`, saturating at the
/// end of the line.
fn char_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(offset, _)| offset)
}

/// Verify that a raw line starts with the 2-character prefix its record type
/// requires.
pub(crate) fn check_prefix(raw: &str, expected: &'static str) -> Result<()> {
    if raw.starts_with(expected) {
        Ok(())
    } else {
        Err(OrtfError::PrefixMismatch {
            expected,
            found: raw.get(0..2).unwrap_or(raw).to_string(),
        })
    }
}

/// `RA` prescription-transfer header record.
///
/// Carries the format version (columns 3-4) that governs how every detail
/// record in the document is decoded.
#[derive(Debug, Clone)]
pub struct HeaderRecord {
    line: String,
    version: FormatVersion,
}

impl HeaderRecord {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let line = raw.into();
        check_prefix(&line, "RA")?;
        let version = FormatVersion::parse(line.get(2..4).unwrap_or(""))?;
        Ok(Self { line, version })
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn as_line(&self) -> &str {
        &self.line
    }
}

/// `SR` sending/receiving pharmacy identifier record.
#[derive(Debug, Clone)]
pub struct PharmacyRecord {
    line: String,
}

impl PharmacyRecord {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let line = raw.into();
        check_prefix(&line, "SR")?;
        Ok(Self { line })
    }

    pub fn as_line(&self) -> &str {
        &self.line
    }
}

/// `ST` pharmacy subtotal record.
#[derive(Debug, Clone)]
pub struct SubtotalRecord {
    line: String,
}

impl SubtotalRecord {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let line = raw.into();
        check_prefix(&line, "ST")?;
        Ok(Self { line })
    }

    /// Overwrite the subtotal count columns with `count`, zero-padded to
    /// 8 digits. Record length is unchanged.
    pub fn set_count(&mut self, count: usize) {
        replace_columns(&mut self.line, SUBTOTAL_COUNT_RANGE, &format!("{count:08}"));
        debug_assert_eq!(self.line.chars().count(), RECORD_LEN);
    }

    pub fn as_line(&self) -> &str {
        &self.line
    }
}

/// `XT` prescription-transfer trailer record.
#[derive(Debug, Clone)]
pub struct TrailerRecord {
    line: String,
}

impl TrailerRecord {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let line = raw.into();
        check_prefix(&line, "XT")?;
        Ok(Self { line })
    }

    /// Overwrite the total count columns with `total`, zero-padded to
    /// 10 digits. Record length is unchanged.
    pub fn set_total(&mut self, total: usize) {
        replace_columns(&mut self.line, TRAILER_TOTAL_RANGE, &format!("{total:010}"));
        debug_assert_eq!(self.line.chars().count(), RECORD_LEN);
    }

    pub fn as_line(&self) -> &str {
        &self.line
    }
}
