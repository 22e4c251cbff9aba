//! ORTF prescription-transfer flat-file codec.
//!
//! An ORTF document is a sequence of fixed-length 1600-character records:
//! a header (`RA`), a pharmacy identifier (`SR`), one or more prescription
//! details (`RX`), a subtotal (`ST`), and a trailer (`XT`). Detail records
//! are decoded positionally against a versioned layout table (format
//! versions 2.0 and 3.3); alphanumeric fields can be rewritten in place
//! without disturbing record length or neighboring fields, and the document
//! keeps its subtotal and trailer counts consistent across detail edits.
//!
//! # Example
//!
//! ```
//! use ortf_format::{FieldValue, TransferDocument};
//!
//! fn blank(prefix: &str) -> String {
//!     format!("{prefix:<1600}")
//! }
//!
//! let mut header = blank("RA");
//! header.replace_range(2..4, "20");
//! let lines = vec![header, blank("SR"), blank("RX"), blank("ST"), blank("XT")];
//!
//! let mut doc = TransferDocument::from_lines(&lines)?;
//! doc.prescriptions_mut()[0].set("PRODUCT DOSAGE FORM", "TABLET")?;
//! assert_eq!(
//!     doc.prescriptions()[0].get("PRODUCT DOSAGE FORM")?,
//!     &FieldValue::Text("TABLET".to_string())
//! );
//! assert_eq!(doc.to_string(), doc.lines().collect::<Vec<_>>().join("\r\n"));
//! # Ok::<(), ortf_format::OrtfError>(())
//! ```

mod document;
mod error;
mod prescription;
mod record;
pub mod schema;
pub mod substitutions;

pub use document::TransferDocument;
pub use error::{OrtfError, Result};
pub use prescription::{FieldValue, PrescriptionRecord};
pub use record::{HeaderRecord, PharmacyRecord, RECORD_LEN, SubtotalRecord, TrailerRecord};
pub use schema::{FieldClass, FieldSpec, FormatVersion, Requirement};
