//! Legacy product-code substitutions.
//!
//! A handful of NDC product codes were retired and reissued under new codes;
//! records still carrying the old code must have the code, description,
//! dosage form, and strength rewritten together. The table is static
//! reference data; application is opt-in and driven by the caller.

use crate::error::Result;
use crate::prescription::PrescriptionRecord;

/// Field examined to select a substitution rule.
const PRODUCT_CODE_FIELD: &str = "ORIGINALLY PRESCRIBED PRODUCT/SERVICE CODE";

/// Rewrite rule for one retired product code.
#[derive(Debug, Clone, Copy)]
pub struct Substitution {
    /// Retired NDC product code that triggers the rule.
    pub legacy_code: &'static str,
    /// Field values written when the rule fires, including the new code.
    pub replacements: &'static [(&'static str, &'static str)],
}

/// Retired NDC product codes and their replacement field values.
pub const PRODUCT_CODE_SUBSTITUTIONS: &[Substitution] = &[
    Substitution {
        legacy_code: "68040061019",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040061014"),
            ("PRESCRIBED DRUG DESCRIPTION", "VASCULERA TABLETS 30"),
            ("PRODUCT DOSAGE FORM", "TABLET"),
            ("PRODUCT STRENGTH", "630 mg"),
        ],
    },
    Substitution {
        legacy_code: "68040061118",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040061116"),
            ("PRESCRIBED DRUG DESCRIPTION", "FOSTEUM PLUS CAPSULE 60"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "500 mg-70 mg-27"),
        ],
    },
    Substitution {
        legacy_code: "68040075019",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075043"),
            ("PRESCRIBED DRUG DESCRIPTION", "RHEUMATE CAPSULE"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "1 mg-1 mg-500 m"),
        ],
    },
    Substitution {
        legacy_code: "68040075260",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075240"),
            ("PRESCRIBED DRUG DESCRIPTION", "EPICERAM EMUL 225GM"),
            ("PRODUCT DOSAGE FORM", "EMULSION EXTENDED RELEAS"),
            ("PRODUCT STRENGTH", ""),
        ],
    },
    Substitution {
        legacy_code: "68040075280",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075240"),
            ("PRESCRIBED DRUG DESCRIPTION", "EPICERAM EMUL 225GM"),
            ("PRODUCT DOSAGE FORM", "EMULSION EXTENDED RELEAS"),
            ("PRODUCT STRENGTH", ""),
        ],
    },
    Substitution {
        legacy_code: "68040075018",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075043"),
            ("PRESCRIBED DRUG DESCRIPTION", "RHEUMATE CAPSULE"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "1 mg-1 mg-500 m"),
        ],
    },
    Substitution {
        legacy_code: "68040060318",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040060316"),
            ("PRESCRIBED DRUG DESCRIPTION", "FOSTEUM CAPSULE 60"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "27 mg-20 mg-200"),
        ],
    },
    Substitution {
        legacy_code: "68040061016",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040061014"),
            ("PRESCRIBED DRUG DESCRIPTION", "VASCULERA TABLETS 30"),
            ("PRODUCT DOSAGE FORM", "TABLET"),
            ("PRODUCT STRENGTH", "630 mg"),
        ],
    },
    Substitution {
        legacy_code: "68040075016",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075043"),
            ("PRESCRIBED DRUG DESCRIPTION", "RHEUMATE CAPSULE"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "1 mg-1 mg-500 m"),
        ],
    },
    Substitution {
        legacy_code: "69482080099",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040071428"),
            ("PRESCRIBED DRUG DESCRIPTION", "SERNIVO 0.05% SPRAY"),
            ("PRODUCT DOSAGE FORM", "SPRAY WITH PUMP"),
            ("PRODUCT STRENGTH", ""),
        ],
    },
    Substitution {
        legacy_code: "68040061112",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040061116"),
            ("PRESCRIBED DRUG DESCRIPTION", "FOSTEUM PLUS CAPSULE 60"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "500 mg-70 mg-27"),
        ],
    },
    Substitution {
        legacy_code: "68040060312",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040060316"),
            ("PRESCRIBED DRUG DESCRIPTION", "FOSTEUM CAPSULE 60"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "27 mg-20 mg-200"),
        ],
    },
    Substitution {
        legacy_code: "51013080036",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075240"),
            ("PRESCRIBED DRUG DESCRIPTION", "EPICERAM EMUL 225GM"),
            ("PRODUCT DOSAGE FORM", "EMULSION EXTENDED RELEAS"),
            ("PRODUCT STRENGTH", ""),
        ],
    },
    Substitution {
        legacy_code: "68040075014",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075043"),
            ("PRESCRIBED DRUG DESCRIPTION", "RHEUMATE CAPSULE"),
            ("PRODUCT DOSAGE FORM", "CAPSULE"),
            ("PRODUCT STRENGTH", "1 mg-1 mg-500 m"),
        ],
    },
    Substitution {
        legacy_code: "51013080090",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075217"),
            ("PRESCRIBED DRUG DESCRIPTION", "EPICERAM EMUL 90GM"),
            ("PRODUCT DOSAGE FORM", "EMULSION EXTENDED RELEAS"),
            ("PRODUCT STRENGTH", ""),
        ],
    },
    Substitution {
        legacy_code: "67857080090",
        replacements: &[
            (PRODUCT_CODE_FIELD, "68040075217"),
            ("PRESCRIBED DRUG DESCRIPTION", "EPICERAM EMUL 90GM"),
            ("PRODUCT DOSAGE FORM", "EMULSION EXTENDED RELEAS"),
            ("PRODUCT STRENGTH", ""),
        ],
    },
];

/// Apply the matching substitution rule to a detail record, if any.
///
/// Returns whether a rule fired. All rewritten fields are alphanumeric, so a
/// table-driven rewrite either succeeds completely or fails on the first
/// field with the record's earlier fields already written; the table content
/// guarantees in practice that every value fits its declared length.
pub fn apply_substitutions(rx: &mut PrescriptionRecord) -> Result<bool> {
    let code = rx.get(PRODUCT_CODE_FIELD)?.to_string();
    let Some(rule) = PRODUCT_CODE_SUBSTITUTIONS
        .iter()
        .find(|rule| rule.legacy_code == code)
    else {
        return Ok(false);
    };
    for (field, value) in rule.replacements {
        rx.set(field, value)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RECORD_LEN;
    use crate::schema::{FieldClass, FormatVersion};

    fn rx_line_with_code(code: &str) -> String {
        let mut line = format!("{:<RECORD_LEN$}", "RX");
        let (_, spec) = FormatVersion::V20.field(PRODUCT_CODE_FIELD).unwrap();
        line.replace_range(spec.char_range(), &format!("{code:<width$}", width = spec.length));
        line
    }

    #[test]
    fn all_replacement_values_fit_their_fields() {
        for version in [FormatVersion::V20, FormatVersion::V33] {
            for rule in PRODUCT_CODE_SUBSTITUTIONS {
                for (field, value) in rule.replacements {
                    let (_, spec) = version.field(field).unwrap();
                    assert_eq!(spec.class, FieldClass::Alphanumeric);
                    assert!(value.len() <= spec.length, "{value} overflows {field}");
                }
            }
        }
    }

    #[test]
    fn matching_rule_rewrites_all_fields() {
        let line = rx_line_with_code("68040061019");
        let mut rx = PrescriptionRecord::new(line, FormatVersion::V20).unwrap();
        assert!(apply_substitutions(&mut rx).unwrap());

        assert_eq!(
            rx.get(PRODUCT_CODE_FIELD).unwrap().as_text(),
            Some("68040061014")
        );
        assert_eq!(
            rx.get("PRESCRIBED DRUG DESCRIPTION").unwrap().as_text(),
            Some("VASCULERA TABLETS 30")
        );
        assert_eq!(
            rx.get("PRODUCT DOSAGE FORM").unwrap().as_text(),
            Some("TABLET")
        );
        assert_eq!(rx.get("PRODUCT STRENGTH").unwrap().as_text(), Some("630 mg"));
    }

    #[test]
    fn non_matching_code_is_left_alone() {
        let line = rx_line_with_code("00000000000");
        let mut rx = PrescriptionRecord::new(line.clone(), FormatVersion::V20).unwrap();
        assert!(!apply_substitutions(&mut rx).unwrap());
        assert_eq!(rx.as_line(), line);
    }
}
