//! End-to-end codec tests over a synthetic two-prescription transfer.

use ortf_format::{
    FormatVersion, OrtfError, PrescriptionRecord, RECORD_LEN, TransferDocument,
    substitutions::apply_substitutions,
};

fn blank(prefix: &str) -> String {
    format!("{prefix:<RECORD_LEN$}")
}

fn write_field(line: &mut String, version: FormatVersion, name: &str, value: &str) {
    let (_, spec) = version.field(name).unwrap();
    let padded = format!("{value:<width$}", width = spec.length);
    line.replace_range(spec.char_range(), &padded);
}

/// A version 2.0 document with two populated prescriptions.
fn sample_lines() -> Vec<String> {
    let version = FormatVersion::V20;
    let mut header = blank("RA");
    header.replace_range(2..4, "20");

    let mut first = blank("RX");
    write_field(&mut first, version, "PATIENT LAST NAME", "HOLT");
    write_field(&mut first, version, "PRESCRIPTION/SERVICE REFERENCE NUMBER", "000000004821");
    write_field(&mut first, version, "MOST RECENT DATE FILLED", "20210101");
    write_field(&mut first, version, "DAYS SUPPLY", "030");
    write_field(&mut first, version, "ORIGINALLY PRESCRIBED PRODUCT/SERVICE CODE", "68040061019");

    let mut second = blank("RX");
    write_field(&mut second, version, "PATIENT LAST NAME", "MARSH");
    write_field(&mut second, version, "PRESCRIPTION/SERVICE REFERENCE NUMBER", "000000004822");
    write_field(&mut second, version, "MOST RECENT DATE FILLED", "20210214");
    write_field(&mut second, version, "DAYS SUPPLY", "090");

    vec![header, blank("SR"), first, second, blank("ST"), blank("XT")]
}

#[test]
fn assemble_and_serialize_round_trip() {
    let lines = sample_lines();
    let doc = TransferDocument::from_lines(&lines).unwrap();
    assert_eq!(doc.to_string(), lines.join("\r\n"));
    for line in doc.lines() {
        assert_eq!(line.len(), RECORD_LEN);
    }
}

#[test]
fn decoded_fields_survive_reference_number_lookup() {
    let doc = TransferDocument::from_lines(&sample_lines()).unwrap();
    let refs: Vec<String> = doc
        .prescriptions()
        .iter()
        .map(|rx| {
            rx.get("PRESCRIPTION/SERVICE REFERENCE NUMBER")
                .unwrap()
                .to_string()
        })
        .collect();
    // Numeric decode drops the zero padding used on the wire.
    assert_eq!(refs, vec!["4821", "4822"]);
}

#[test]
fn filtered_document_keeps_counts_consistent() {
    let doc = TransferDocument::from_lines(&sample_lines()).unwrap();

    // Keep only prescriptions due before February 2021.
    let cutoff = chrono::NaiveDate::from_ymd_opt(2021, 2, 1).unwrap();
    let due: Vec<PrescriptionRecord> = doc
        .prescriptions()
        .iter()
        .filter(|rx| rx.needs_by_date() < cutoff)
        .cloned()
        .collect();
    assert_eq!(due.len(), 1);

    let mut filtered = doc.without_prescriptions();
    filtered.set_prescriptions(due);

    assert_eq!(filtered.prescriptions().len(), 1);
    assert_eq!(&filtered.subtotal().as_line()[71..79], "00000003");
    assert_eq!(&filtered.trailer().as_line()[9..19], "0000000005");
    // The source document is untouched.
    assert_eq!(doc.prescriptions().len(), 2);
    assert_eq!(doc.to_string(), sample_lines().join("\r\n"));
}

#[test]
fn substitution_rewrites_stay_inside_their_columns() {
    let mut doc = TransferDocument::from_lines(&sample_lines()).unwrap();
    let before: Vec<String> = doc.lines().map(str::to_string).collect();

    let changed: Vec<bool> = doc
        .prescriptions_mut()
        .iter_mut()
        .map(|rx| apply_substitutions(rx).unwrap())
        .collect();
    assert_eq!(changed, vec![true, false]);

    // Second prescription carried no legacy code and is byte-identical.
    assert_eq!(doc.prescriptions()[1].as_line(), before[3]);

    let rewritten = doc.prescriptions()[0].as_line();
    let (_, code) = FormatVersion::V20
        .field("ORIGINALLY PRESCRIBED PRODUCT/SERVICE CODE")
        .unwrap();
    assert_eq!(rewritten[code.char_range()].trim_end(), "68040061014");
    // Fields outside the rule's ranges are untouched.
    let (_, last_name) = FormatVersion::V20.field("PATIENT LAST NAME").unwrap();
    assert_eq!(rewritten[last_name.char_range()].trim_end(), "HOLT");
}

#[test]
fn short_prefix_line_fails_grammar_not_panics() {
    let lines = vec!["R".to_string()];
    assert!(matches!(
        TransferDocument::from_lines(&lines).unwrap_err(),
        OrtfError::GrammarViolation { .. }
    ));
}
