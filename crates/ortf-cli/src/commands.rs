//! Subcommand implementations.

use std::fs;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use tracing::info;

use ortf_format::substitutions::apply_substitutions;
use ortf_format::{FormatVersion, TransferDocument};

use crate::cli::{FieldsArgs, RewriteArgs, RximageArgs, VersionArg};
use crate::join::{JoinOptions, join_script_numbers};

pub fn run_rximage(args: &RximageArgs) -> Result<()> {
    let options = JoinOptions {
        fix_fills: !args.no_fix_fills,
    };
    let summary = join_script_numbers(
        &args.csv,
        &args.map,
        &args.grx,
        args.output.clone(),
        &options,
    )?;
    println!("Output: {} ({} rows)", summary.output.display(), summary.rows);
    Ok(())
}

pub fn run_rewrite(args: &RewriteArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let lines: Vec<&str> = raw.lines().filter(|line| !line.is_empty()).collect();
    let mut doc = TransferDocument::from_lines(&lines)
        .with_context(|| format!("assemble {}", args.input.display()))?;
    info!(
        version = %doc.version(),
        prescriptions = doc.prescriptions().len(),
        "assembled transfer document"
    );

    let mut substituted = 0usize;
    if args.substitute_products {
        for rx in doc.prescriptions_mut() {
            if apply_substitutions(rx)? {
                substituted += 1;
            }
        }
        info!(substituted, "applied product-code substitutions");
    }

    let output = args.output.as_ref().unwrap_or(&args.input);
    fs::write(output, doc.to_string())
        .with_context(|| format!("write {}", output.display()))?;
    println!(
        "Output: {} ({} prescriptions, {} substituted)",
        output.display(),
        doc.prescriptions().len(),
        substituted
    );
    Ok(())
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let version = match args.version {
        VersionArg::V20 => FormatVersion::V20,
        VersionArg::V33 => FormatVersion::V33,
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Id", "Req", "Class", "Len", "Columns"]);
    for (name, spec) in version.fields() {
        table.add_row(vec![
            name.to_string(),
            spec.external_id.to_string(),
            spec.requirement.code().to_string(),
            spec.class.code().to_string(),
            spec.length.to_string(),
            format!("{}-{}", spec.start, spec.end),
        ]);
    }
    for column in [4, 5] {
        if let Some(column) = table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("Version {version} detail-record layout:");
    println!("{table}");
    Ok(())
}
