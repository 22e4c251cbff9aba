//! The Rx-image join: attach script numbers to an ORTF CSV export.
//!
//! Three inputs meet here: the CSV export of an ORTF file (one row per
//! prescription, columns named after the layout fields), the import-output
//! file mapping internal record ids to raw RX lines, and a CSV mapping those
//! ids to human-facing script numbers. The join key is the prescription
//! reference number decoded from each raw RX line.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use ortf_format::{FormatVersion, PrescriptionRecord};

/// Column used as the join key, in both the CSV export and the RX lines.
const REFERENCE_NUMBER: &str = "PRESCRIPTION/SERVICE REFERENCE NUMBER";

/// Settings for one join run.
pub struct JoinOptions {
    /// Recompute NUMBER OF FILLS REMAINING from the remaining and prescribed
    /// quantities instead of trusting the exported value.
    pub fix_fills: bool,
}

/// Outcome of a join run.
pub struct JoinSummary {
    pub rows: usize,
    pub output: PathBuf,
}

/// Read the import-output file: one `<id>:<raw RX line>` entry per line.
///
/// Each RX line is decoded with the version 2.0 layout and keyed by its
/// reference number (rendered without zero padding, matching the CSV export).
pub fn load_reference_map(path: &Path) -> Result<HashMap<String, i64>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut map = HashMap::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if line.is_empty() {
            continue;
        }
        let Some((id, rx_line)) = line.split_once(':') else {
            bail!("line {} of {} has no <id>: prefix", index + 1, path.display());
        };
        let id: i64 = id
            .trim()
            .parse()
            .with_context(|| format!("record id on line {} of {}", index + 1, path.display()))?;
        let rx = PrescriptionRecord::new(rx_line, FormatVersion::V20)
            .with_context(|| format!("RX line {} of {}", index + 1, path.display()))?;
        let reference = rx.get(REFERENCE_NUMBER)?.to_string();
        map.insert(reference, id);
    }
    debug!(entries = map.len(), "loaded reference number map");
    Ok(map)
}

/// Read the id-to-script-number CSV; the first line is a header and skipped.
pub fn load_script_map(path: &Path) -> Result<HashMap<i64, String>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut map = HashMap::new();
    for (index, line) in BufReader::new(file).lines().enumerate().skip(1) {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if line.is_empty() {
            continue;
        }
        let Some((id, script)) = line.split_once(',') else {
            bail!("line {} of {} is not <id>,<script>", index + 1, path.display());
        };
        let id: i64 = id
            .trim()
            .parse()
            .with_context(|| format!("record id on line {} of {}", index + 1, path.display()))?;
        map.insert(id, script.trim().to_string());
    }
    debug!(entries = map.len(), "loaded script number map");
    Ok(map)
}

/// Stream the ORTF CSV export, prepending a SCRIPT NUMBER column resolved
/// through both maps, and write the result next to the input (or to
/// `output`).
pub fn join_script_numbers(
    csv_path: &Path,
    map_path: &Path,
    grx_path: &Path,
    output: Option<PathBuf>,
    options: &JoinOptions,
) -> Result<JoinSummary> {
    let reference_to_id = load_reference_map(grx_path)?;
    let id_to_script = load_script_map(map_path)?;

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("open {}", csv_path.display()))?;
    let headers = reader.headers().context("read CSV header")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .with_context(|| format!("CSV is missing column {name:?}"))
    };
    let reference_idx = column(REFERENCE_NUMBER)?;
    let dispensed_idx = column("QUANTITY DISPENSED TO DATE")?;
    let date_filled_idx = column("MOST RECENT DATE FILLED")?;
    let remaining_idx = column("REMAINING QUANTITY")?;
    let prescribed_idx = column("QUANTITY PRESCRIBED")?;
    let fills_remaining_idx = column("NUMBER OF FILLS REMAINING")?;

    let output = output.unwrap_or_else(|| default_output_path(csv_path, options.fix_fills));
    let mut writer =
        csv::Writer::from_path(&output).with_context(|| format!("create {}", output.display()))?;

    let mut out_header = vec!["SCRIPT NUMBER".to_string()];
    out_header.extend(headers.iter().map(str::to_string));
    writer.write_record(&out_header)?;

    let mut rows = 0usize;
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("CSV row {}", index + 1))?;
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();

        let script = reference_to_id
            .get(&fields[reference_idx])
            .and_then(|id| id_to_script.get(id))
            .cloned()
            .unwrap_or_default();

        let dispensed: i64 = fields[dispensed_idx]
            .trim()
            .parse()
            .with_context(|| format!("QUANTITY DISPENSED TO DATE on CSV row {}", index + 1))?;
        if dispensed == 0 {
            // Never filled: the export's fill date is meaningless.
            fields[date_filled_idx].clear();
            info!(row = index + 1, "cleared MOST RECENT DATE FILLED for unfilled prescription");
        }

        if options.fix_fills {
            fields[fills_remaining_idx] = whole_fills_remaining(
                &fields[remaining_idx],
                &fields[prescribed_idx],
            )
            .with_context(|| format!("fills remaining on CSV row {}", index + 1))?;
        }

        let mut out_row = vec![script];
        out_row.extend(fields);
        writer.write_record(&out_row)?;
        rows += 1;
    }
    writer.flush()?;

    info!(rows, output = %output.display(), "joined script numbers");
    Ok(JoinSummary { rows, output })
}

/// Whole fills left: remaining quantity over prescribed quantity, truncated
/// toward zero.
fn whole_fills_remaining(remaining: &str, prescribed: &str) -> Result<String> {
    let remaining: f64 = remaining
        .trim()
        .parse()
        .context("REMAINING QUANTITY is not a number")?;
    let prescribed: f64 = prescribed
        .trim()
        .parse()
        .context("QUANTITY PRESCRIBED is not a number")?;
    if prescribed == 0.0 {
        bail!("QUANTITY PRESCRIBED is zero");
    }
    Ok(format!("{}", (remaining / prescribed).trunc() as i64))
}

fn default_output_path(input: &Path, fix_fills: bool) -> PathBuf {
    let suffix = if fix_fills {
        "-rximage.csv"
    } else {
        "-rximage-wrong-fills.csv"
    };
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}{suffix}"))
}
