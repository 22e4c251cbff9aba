//! Document assembly: grammar validation, typed record construction, and
//! count maintenance across detail-record edits.

use std::fmt;

use crate::error::{OrtfError, Result};
use crate::prescription::PrescriptionRecord;
use crate::record::{HeaderRecord, PharmacyRecord, SubtotalRecord, TrailerRecord};
use crate::schema::FormatVersion;

/// Records counted alongside the details in the ST subtotal (RA and SR).
const SUBTOTAL_OVERHEAD: usize = 2;

/// Records counted alongside the details in the XT total (RA, SR, ST, XT).
const TRAILER_OVERHEAD: usize = 4;

/// One complete ORTF prescription-transfer document.
///
/// The record sequence is fixed by the grammar `RA SR (RX)+ ST XT`: exactly
/// one header, one pharmacy identifier, one or more prescription details,
/// one subtotal, one trailer. The header's format version governs how every
/// detail record is decoded.
#[derive(Debug, Clone)]
pub struct TransferDocument {
    header: HeaderRecord,
    pharmacy: PharmacyRecord,
    prescriptions: Vec<PrescriptionRecord>,
    subtotal: SubtotalRecord,
    trailer: TrailerRecord,
}

impl TransferDocument {
    /// Assemble a document from raw fixed-length lines.
    ///
    /// The concatenated 2-character prefixes must match the grammar exactly;
    /// anything else fails with [`OrtfError::GrammarViolation`] before any
    /// record is constructed. Construction errors from individual records
    /// (bad prefix, unknown version) propagate as-is.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let prefixes: String = lines
            .iter()
            .map(|line| line.as_ref().get(0..2).unwrap_or(line.as_ref()))
            .collect();
        if !grammar_matches(lines) {
            return Err(OrtfError::GrammarViolation { found: prefixes });
        }

        // Header first: its version drives detail-record decoding.
        let header = HeaderRecord::new(lines[0].as_ref())?;
        let pharmacy = PharmacyRecord::new(lines[1].as_ref())?;
        let prescriptions = lines[2..lines.len() - 2]
            .iter()
            .map(|line| PrescriptionRecord::new(line.as_ref(), header.version()))
            .collect::<Result<Vec<_>>>()?;
        let subtotal = SubtotalRecord::new(lines[lines.len() - 2].as_ref())?;
        let trailer = TrailerRecord::new(lines[lines.len() - 1].as_ref())?;

        Ok(Self {
            header,
            pharmacy,
            prescriptions,
            subtotal,
            trailer,
        })
    }

    /// Replace the detail-record list and recompute both running counts.
    ///
    /// The subtotal counts the details plus the two leading records; the
    /// trailer total additionally counts the subtotal and trailer lines.
    pub fn set_prescriptions(&mut self, prescriptions: Vec<PrescriptionRecord>) {
        self.subtotal
            .set_count(prescriptions.len() + SUBTOTAL_OVERHEAD);
        self.trailer
            .set_total(prescriptions.len() + TRAILER_OVERHEAD);
        self.prescriptions = prescriptions;
    }

    /// Independent copy of the fixed records with an empty detail list, for
    /// building filtered or derived documents.
    pub fn without_prescriptions(&self) -> Self {
        Self {
            header: self.header.clone(),
            pharmacy: self.pharmacy.clone(),
            prescriptions: Vec::new(),
            subtotal: self.subtotal.clone(),
            trailer: self.trailer.clone(),
        }
    }

    /// All record lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_line())
            .chain(std::iter::once(self.pharmacy.as_line()))
            .chain(self.prescriptions.iter().map(|rx| rx.as_line()))
            .chain(std::iter::once(self.subtotal.as_line()))
            .chain(std::iter::once(self.trailer.as_line()))
    }

    pub fn version(&self) -> FormatVersion {
        self.header.version()
    }

    pub fn header(&self) -> &HeaderRecord {
        &self.header
    }

    pub fn pharmacy(&self) -> &PharmacyRecord {
        &self.pharmacy
    }

    pub fn prescriptions(&self) -> &[PrescriptionRecord] {
        &self.prescriptions
    }

    pub fn prescriptions_mut(&mut self) -> &mut [PrescriptionRecord] {
        &mut self.prescriptions
    }

    pub fn subtotal(&self) -> &SubtotalRecord {
        &self.subtotal
    }

    pub fn trailer(&self) -> &TrailerRecord {
        &self.trailer
    }
}

impl fmt::Display for TransferDocument {
    /// Renders the document as its lines joined by CRLF terminators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in self.lines() {
            if !first {
                f.write_str("\r\n")?;
            }
            f.write_str(line)?;
            first = false;
        }
        Ok(())
    }
}

/// Exact match of the prefix sequence against `RA SR (RX)+ ST XT`.
fn grammar_matches<S: AsRef<str>>(lines: &[S]) -> bool {
    if lines.len() < 5 {
        return false;
    }
    let prefix = |index: usize| lines[index].as_ref().get(0..2).unwrap_or("");
    prefix(0) == "RA"
        && prefix(1) == "SR"
        && (2..lines.len() - 2).all(|index| prefix(index) == "RX")
        && prefix(lines.len() - 2) == "ST"
        && prefix(lines.len() - 1) == "XT"
}
