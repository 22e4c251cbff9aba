//! Versioned field layout tables for ORTF prescription detail records.
//!
//! The ORTF standard specifies field positions as 1-based inclusive column
//! ranges. Both known format versions (2.0 and 3.3) use 1600-character
//! records; version 3.3 widens several name and address fields and inserts
//! country codes, telephone extensions, and a fill number, shifting every
//! subsequent offset. The tables below are transcribed verbatim from the
//! standard and are immutable.

use std::fmt;
use std::ops::Range;

use crate::error::{OrtfError, Result};

/// Whether the standard requires the field to be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Mandatory,
    Optional,
}

impl Requirement {
    /// Canonical designation letter used by the standard (M / S).
    pub fn code(&self) -> &'static str {
        match self {
            Requirement::Mandatory => "M",
            Requirement::Optional => "S",
        }
    }
}

/// Character class of a field's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Free text; the only class that may be mutated in place.
    Alphanumeric,
    /// Decimal digits; decoded to an integer when the content parses.
    Numeric,
}

impl FieldClass {
    /// Canonical designation used by the standard (A/N or N).
    pub fn code(&self) -> &'static str {
        match self {
            FieldClass::Alphanumeric => "A/N",
            FieldClass::Numeric => "N",
        }
    }
}

/// Layout metadata for a single field of a prescription detail record.
///
/// `start` and `end` are 1-based inclusive column numbers as printed in the
/// standard; [`FieldSpec::char_range`] converts to the 0-based half-open
/// range used for slicing. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field identifier assigned by the standard (e.g. `402-D2`).
    pub external_id: &'static str,
    pub requirement: Requirement,
    pub class: FieldClass,
    /// Declared field length in characters.
    pub length: usize,
    /// First column, 1-based inclusive.
    pub start: usize,
    /// Last column, 1-based inclusive.
    pub end: usize,
}

impl FieldSpec {
    /// 0-based half-open column range of this field within a record line.
    pub fn char_range(&self) -> Range<usize> {
        self.start - 1..self.end
    }
}

/// ORTF format version, carried in columns 3-4 of the header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// Version 2.0.
    V20,
    /// Version 3.3.
    V33,
}

impl FormatVersion {
    /// Parse the 2-character version code from a header record.
    pub fn parse(code: &str) -> Result<Self> {
        match code {
            "20" => Ok(FormatVersion::V20),
            "33" => Ok(FormatVersion::V33),
            other => Err(OrtfError::UnknownVersion {
                code: other.to_string(),
            }),
        }
    }

    /// The version code as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVersion::V20 => "20",
            FormatVersion::V33 => "33",
        }
    }

    /// The layout table for this version, in declaration order.
    pub fn fields(&self) -> &'static [(&'static str, FieldSpec)] {
        match self {
            FormatVersion::V20 => V20_FIELDS,
            FormatVersion::V33 => V33_FIELDS,
        }
    }

    /// Look up a field by name, returning the canonical name and its spec.
    pub fn field(&self, name: &str) -> Result<(&'static str, &'static FieldSpec)> {
        self.fields()
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(field_name, spec)| (*field_name, spec))
            .ok_or_else(|| OrtfError::UnknownField {
                version: *self,
                name: name.to_string(),
            })
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const M: Requirement = Requirement::Mandatory;
const S: Requirement = Requirement::Optional;
const AN: FieldClass = FieldClass::Alphanumeric;
const N: FieldClass = FieldClass::Numeric;

const fn spec(
    external_id: &'static str,
    requirement: Requirement,
    class: FieldClass,
    length: usize,
    start: usize,
    end: usize,
) -> FieldSpec {
    FieldSpec {
        external_id,
        requirement,
        class,
        length,
        start,
        end,
    }
}

/// Version 2.0 detail-record layout.
#[rustfmt::skip]
const V20_FIELDS: &[(&str, FieldSpec)] = &[
    ("RECORD TYPE", spec("601-04", M, AN, 2, 1, 2)),
    ("CARDHOLDER ID", spec("302-C2", S, AN, 20, 3, 22)),
    ("ALTERNATE ID NUMBER", spec("724-ST", S, AN, 20, 23, 42)),
    ("CARDHOLDER LAST NAME", spec("313-CD", S, AN, 35, 43, 77)),
    ("CARDHOLDER FIRST NAME", spec("312-CC", S, AN, 35, 78, 112)),
    ("CARDHOLDER MIDDLE INITIAL", spec("718-SZ", S, AN, 1, 113, 113)),
    ("PATIENT LAST NAME", spec("311-CB", M, AN, 35, 114, 148)),
    ("PATIENT FIRST NAME", spec("310-CA", M, AN, 35, 149, 183)),
    ("PATIENT MIDDLE INITIAL", spec("718-SZ", S, AN, 1, 184, 184)),
    ("PATIENT RESIDENCE", spec("384-4X", S, N, 2, 185, 186)),
    ("PATIENT ADDRESS LINE 1", spec("726-SR", M, AN, 30, 187, 216)),
    ("PATIENT ADDRESS LINE 2", spec("727-SS", S, AN, 30, 217, 246)),
    ("PATIENT CITY", spec("728-SU", M, AN, 20, 247, 266)),
    ("PATIENT STATE", spec("729-TA", M, AN, 2, 267, 268)),
    ("PATIENT ZIP/POSTAL CODE", spec("730-TC", M, AN, 15, 269, 283)),
    ("PATIENT TELEPHONE NUMBER QUALIFIER", spec("629-SH", S, AN, 2, 284, 285)),
    ("PATIENT TELEPHONE NUMBER", spec("732-TB", S, N, 10, 286, 295)),
    ("PATIENT E-MAIL ADDRESS", spec("350-HN", S, AN, 80, 296, 375)),
    ("DATE OF BIRTH", spec("304-C4", M, N, 8, 376, 383)),
    ("PATIENT GENDER CODE", spec("305-C5", M, N, 1, 384, 384)),
    ("PREGNANCY INDICATOR", spec("335-2C", S, AN, 1, 385, 385)),
    ("SMOKER/NON-SMOKER CODE", spec("334-1C", S, AN, 1, 386, 386)),
    ("EASY OPEN CAP INDICATOR", spec("608-NF", S, AN, 1, 387, 387)),
    ("PRESCRIPTION/SERVICE REFERENCE NUMBER", spec("402-D2", M, N, 12, 388, 399)),
    ("DATE PRESCRIPTION WRITTEN", spec("414-DE", M, N, 8, 400, 407)),
    ("ORIGINALLY PRESCRIBED PRODUCT/SERVICE ID QUALIFIER", spec("453-EJ", M, AN, 2, 408, 409)),
    ("ORIGINALLY PRESCRIBED PRODUCT/SERVICE CODE", spec("445-EA", M, AN, 19, 410, 428)),
    ("COMPOUND CODE", spec("406-D6", M, N, 1, 429, 429)),
    ("PRESCRIBED DRUG DESCRIPTION", spec("619-RW", M, AN, 60, 430, 489)),
    ("PRODUCT DOSAGE FORM", spec("601-21", M, AN, 30, 490, 519)),
    ("PRODUCT STRENGTH", spec("601-24", M, AN, 15, 520, 534)),
    ("DISPENSE AS WRITTEN (DAW)/PRODUCT SELECTION CODE", spec("408-D8", M, AN, 1, 535, 535)),
    ("QUANTITY PRESCRIBED", spec("460-ET", M, N, 10, 536, 545)),
    ("NUMBER OF REFILLS AUTHORIZED", spec("415-DF", M, N, 2, 546, 547)),
    ("DAYS SUPPLY", spec("405-D5", M, N, 3, 548, 550)),
    ("PRODUCT/SERVICE ID QUALIFIER", spec("426-E1", M, AN, 2, 551, 552)),
    ("PRODUCT/SERVICE ID", spec("407-D7", M, AN, 19, 553, 571)),
    ("DRUG DESCRIPTION", spec("516-FG", M, AN, 60, 572, 631)),
    ("LABEL DIRECTIONS", spec("613-NM", M, AN, 200, 632, 831)),
    ("ORIGINAL DISPENSED DATE", spec("617-RQ", M, N, 8, 832, 839)),
    ("ORIGINAL DISPENSED QUANTITY", spec("A44-ZL", M, N, 10, 840, 849)),
    ("MOST RECENT DATE FILLED", spec("614-NW", M, N, 8, 850, 857)),
    ("QUANTITY DISPENSED TO DATE", spec("623-SA", M, N, 10, 858, 867)),
    ("REMAINING QUANTITY", spec("625-SC", M, N, 10, 868, 877)),
    ("NUMBER OF FILLS TO DATE", spec("615-NY", S, N, 2, 878, 879)),
    ("NUMBER OF FILLS REMAINING", spec("616-PU", M, N, 2, 880, 881)),
    ("DISCONTINUE DATE", spec("607-ND", S, N, 8, 884, 891)),
    ("INACTIVE PRESCRIPTION INDICATOR", spec("612-NK", M, AN, 1, 892, 892)),
    ("TRANSFER FLAG", spec("631-SK", S, AN, 1, 893, 893)),
    ("PRESCRIBER LAST NAME", spec("716-SY", M, AN, 25, 894, 918)),
    ("PRESCRIBER FIRST NAME", spec("717-SX", M, AN, 15, 919, 933)),
    ("PRESCRIBER ADDRESS LINE 1", spec("726-SR", M, AN, 30, 934, 963)),
    ("PRESCRIBER ADDRESS LINE 2", spec("727-SS", S, AN, 30, 964, 993)),
    ("PRESCRIBER CITY", spec("728-SU", M, AN, 20, 994, 1013)),
    ("PRESCRIBER STATE", spec("729-TA", M, AN, 2, 1014, 1015)),
    ("PRESCRIBER ZIP/POSTAL CODE", spec("730-TC", M, AN, 15, 1016, 1030)),
    ("PRESCRIBER TELEPHONE NUMBER QUALIFIER", spec("629-SH", M, AN, 2, 1031, 1032)),
    ("PRESCRIBER TELEPHONE NUMBER", spec("732-TB", M, N, 10, 1033, 1042)),
    ("PRESCRIBER ID (DEA)", spec("411-DB", S, AN, 15, 1043, 1057)),
    ("PRESCRIBER ID QUALIFIER", spec("466-EZ", M, AN, 2, 1058, 1059)),
    ("PRESCRIBER ID", spec("411-DB", M, AN, 15, 1060, 1074)),
    ("ADDITIONAL MESSAGE INFORMATION", spec("526-FQ", S, AN, 200, 1075, 1274)),
    ("PAYER ID QUALIFIER", spec("568-J7", S, AN, 2, 1275, 1276)),
    ("PAYER ID", spec("569-J8", S, AN, 10, 1277, 1286)),
    ("PROCESSOR CONTROL NUMBER", spec("104-A4", S, AN, 10, 1287, 1296)),
    ("GROUP ID", spec("301-C1", S, AN, 15, 1297, 1311)),
    ("PERSON CODE", spec("303-C3", S, AN, 3, 1312, 1314)),
    ("PATIENT RELATIONSHIP CODE", spec("306-C6", S, N, 1, 1315, 1315)),
    ("FILLER", spec("", M, AN, 285, 1316, 1600)),
];

/// Version 3.3 detail-record layout.
#[rustfmt::skip]
const V33_FIELDS: &[(&str, FieldSpec)] = &[
    ("RECORD TYPE", spec("601-04", M, AN, 2, 1, 2)),
    ("CARDHOLDER ID", spec("302-C2", S, AN, 20, 3, 22)),
    ("ALTERNATE ID NUMBER", spec("724-ST", S, AN, 20, 23, 42)),
    ("CARDHOLDER LAST NAME", spec("313-CD", S, AN, 35, 43, 77)),
    ("CARDHOLDER FIRST NAME", spec("312-CC", S, AN, 35, 78, 112)),
    ("CARDHOLDER MIDDLE INITIAL", spec("718-SZ", S, AN, 1, 113, 113)),
    ("PATIENT LAST NAME", spec("311-CB", M, AN, 35, 114, 148)),
    ("PATIENT FIRST NAME", spec("310-CA", M, AN, 35, 149, 183)),
    ("PATIENT MIDDLE INITIAL", spec("718-SZ", S, AN, 1, 184, 184)),
    ("PATIENT RESIDENCE", spec("384-4X", S, N, 2, 185, 186)),
    ("PATIENT ADDRESS LINE 1", spec("726-SR", M, AN, 40, 187, 226)),
    ("PATIENT ADDRESS LINE 2", spec("727-SS", S, AN, 40, 227, 266)),
    ("PATIENT CITY", spec("728-SU", M, AN, 20, 267, 286)),
    ("PATIENT STATE", spec("729-TA", M, AN, 2, 287, 288)),
    ("PATIENT ZIP/POSTAL CODE", spec("730-TC", M, AN, 15, 289, 303)),
    ("PATIENT ENTITY COUNTRY CODE", spec("B36-1W", S, AN, 2, 304, 305)),
    ("PATIENT TELEPHONE NUMBER QUALIFIER", spec("629-SH", S, AN, 2, 306, 307)),
    ("PATIENT TELEPHONE NUMBER", spec("732-TB", S, N, 10, 308, 317)),
    ("PATIENT TELEPHONE NUMBER Extn", spec("B10-8A", S, N, 8, 318, 325)),
    ("PATIENT E-MAIL ADDRESS", spec("350-HN", S, AN, 80, 326, 405)),
    ("DATE OF BIRTH", spec("304-C4", M, N, 8, 406, 413)),
    ("PATIENT GENDER CODE", spec("305-C5", M, N, 1, 414, 414)),
    ("PREGNANCY INDICATOR", spec("335-2C", S, AN, 1, 415, 415)),
    ("SMOKER/NON-SMOKER CODE", spec("334-1C", S, AN, 1, 416, 416)),
    ("EASY OPEN CAP INDICATOR", spec("608-NF", S, AN, 1, 417, 417)),
    ("PRESCRIPTION/SERVICE REFERENCE NUMBER", spec("402-D2", M, N, 12, 418, 429)),
    ("DATE PRESCRIPTION WRITTEN", spec("414-DE", M, N, 8, 430, 437)),
    ("ORIGINALLY PRESCRIBED PRODUCT/SERVICE ID QUALIFIER", spec("453-EJ", M, AN, 2, 438, 439)),
    ("ORIGINALLY PRESCRIBED PRODUCT/SERVICE CODE", spec("445-EA", M, AN, 19, 440, 458)),
    ("COMPOUND CODE", spec("406-D6", M, N, 1, 459, 459)),
    ("PRESCRIBED DRUG DESCRIPTION", spec("619-RW", M, AN, 60, 460, 519)),
    ("PRODUCT DOSAGE FORM", spec("601-21", M, AN, 30, 520, 549)),
    ("PRODUCT STRENGTH", spec("601-24", M, AN, 15, 550, 564)),
    ("DISPENSE AS WRITTEN (DAW)/PRODUCT SELECTION CODE", spec("408-D8", M, AN, 1, 565, 565)),
    ("QUANTITY PRESCRIBED", spec("460-ET", M, N, 10, 566, 575)),
    ("NUMBER OF REFILLS AUTHORIZED", spec("415-DF", M, N, 2, 576, 577)),
    ("DAYS SUPPLY", spec("405-D5", M, N, 3, 578, 580)),
    ("PRODUCT/SERVICE ID QUALIFIER", spec("426-E1", M, AN, 2, 581, 582)),
    ("PRODUCT/SERVICE ID", spec("407-D7", M, AN, 19, 583, 601)),
    ("DRUG DESCRIPTION", spec("516-FG", M, AN, 60, 602, 661)),
    ("LABEL DIRECTIONS", spec("613-NM", M, AN, 200, 662, 861)),
    ("ORIGINAL DISPENSED DATE", spec("617-RQ", M, N, 8, 862, 869)),
    ("ORIGINAL DISPENSED QUANTITY", spec("A44-ZL", M, N, 10, 870, 879)),
    ("MOST RECENT DATE FILLED", spec("614-NW", M, N, 8, 880, 887)),
    ("QUANTITY DISPENSED TO DATE", spec("623-SA", M, N, 10, 888, 897)),
    ("REMAINING QUANTITY", spec("625-SC", M, N, 10, 898, 907)),
    ("NUMBER OF FILLS TO DATE", spec("615-NY", S, N, 2, 908, 909)),
    ("NUMBER OF FILLS REMAINING", spec("616-PU", M, N, 2, 910, 911)),
    ("FILL NUMBER", spec("403-D3", S, N, 2, 912, 913)),
    ("DISCONTINUE DATE", spec("607-ND", S, N, 8, 914, 921)),
    ("INACTIVE PRESCRIPTION INDICATOR", spec("612-NK", M, AN, 1, 922, 922)),
    ("TRANSFER FLAG", spec("631-SK", S, AN, 1, 923, 923)),
    ("PRESCRIBER LAST NAME", spec("716-SY", M, AN, 35, 924, 958)),
    ("PRESCRIBER FIRST NAME", spec("717-SX", M, AN, 35, 959, 993)),
    ("PRESCRIBER ADDRESS LINE 1", spec("726-SR", M, AN, 40, 994, 1033)),
    ("PRESCRIBER ADDRESS LINE 2", spec("727-SS", S, AN, 40, 1034, 1073)),
    ("PRESCRIBER CITY", spec("728-SU", M, AN, 20, 1074, 1093)),
    ("PRESCRIBER STATE", spec("729-TA", M, AN, 2, 1094, 1095)),
    ("PRESCRIBER ZIP/POSTAL CODE", spec("730-TC", M, AN, 15, 1096, 1110)),
    ("PRESCRIBER ENTITY COUNTRY CODE", spec("B36-1W", S, AN, 2, 1111, 1112)),
    ("PRESCRIBER TELEPHONE NUMBER QUALIFIER", spec("629-SH", M, AN, 2, 1113, 1114)),
    ("PRESCRIBER TELEPHONE NUMBER", spec("732-TB", M, N, 10, 1115, 1124)),
    ("PRESCRIBER TELEPHONE NUMBER Extn", spec("B10-8A", S, N, 8, 1125, 1132)),
    ("PRESCRIBER ID (DEA)", spec("411-DB", S, AN, 15, 1133, 1147)),
    ("PRESCRIBER ID QUALIFIER", spec("466-EZ", M, AN, 2, 1148, 1149)),
    ("PRESCRIBER ID", spec("411-DB", M, AN, 15, 1150, 1164)),
    ("ADDITIONAL MESSAGE INFORMATION", spec("526-FQ", S, AN, 200, 1165, 1364)),
    ("PAYER ID QUALIFIER", spec("568-J7", S, AN, 2, 1365, 1366)),
    ("PAYER ID", spec("569-J8", S, AN, 10, 1367, 1376)),
    ("PROCESSOR CONTROL NUMBER", spec("104-A4", S, AN, 10, 1377, 1386)),
    ("GROUP ID", spec("301-C1", S, AN, 15, 1387, 1401)),
    ("PERSON CODE", spec("303-C3", S, AN, 3, 1402, 1404)),
    ("PATIENT RELATIONSHIP CODE", spec("306-C6", S, N, 1, 1405, 1405)),
    ("FILLER", spec("", M, AN, 195, 1406, 1600)),
];
