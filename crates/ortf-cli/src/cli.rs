//! CLI argument definitions for the ORTF toolkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ortf",
    version,
    about = "ORTF prescription-transfer file toolkit",
    long_about = "Work with ORTF prescription-transfer flat files.\n\n\
                  Joins script numbers onto ORTF CSV exports for Rx-image \n\
                  generation, rewrites retired product codes in raw transfer \n\
                  files, and prints the field layout tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,
}

#[derive(Subcommand)]
pub enum Command {
    /// Join script numbers onto an ORTF CSV export for Rx-image generation.
    Rximage(RximageArgs),

    /// Rewrite retired product codes in a raw ORTF transfer file.
    Rewrite(RewriteArgs),

    /// List the detail-record field layout for a format version.
    Fields(FieldsArgs),
}

#[derive(Parser)]
pub struct RximageArgs {
    /// CSV export of the ORTF file (one row per prescription).
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: PathBuf,

    /// CSV mapping internal record ids to script numbers (header skipped).
    #[arg(long = "map", value_name = "PATH")]
    pub map: PathBuf,

    /// Import-output file with `<id>:<raw RX line>` per line.
    #[arg(long = "grx", value_name = "PATH")]
    pub grx: PathBuf,

    /// Output CSV path (default: next to the input with an -rximage suffix).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep NUMBER OF FILLS REMAINING as exported instead of recomputing it
    /// from the remaining and prescribed quantities.
    #[arg(long = "no-fix-fills")]
    pub no_fix_fills: bool,
}

#[derive(Parser)]
pub struct RewriteArgs {
    /// Raw ORTF transfer file (CRLF or LF line endings).
    #[arg(value_name = "ORTF_FILE")]
    pub input: PathBuf,

    /// Output path (default: overwrite the input in place).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Apply the retired-NDC product-code substitution table to every
    /// prescription record.
    #[arg(long = "substitute-products")]
    pub substitute_products: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Format version to list.
    #[arg(long = "version", value_enum, default_value = "20")]
    pub version: VersionArg,
}

/// CLI format version choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum VersionArg {
    #[value(name = "20")]
    V20,
    #[value(name = "33")]
    V33,
}
