//! socnet CLI: the command-line interface for the socnet netlist toolchain.
//!
//! Provides `socnet expand` to turn a netlist with bus groups and port links
//! into a flat netlist, `socnet check` to report consistency findings only,
//! `socnet merge` to print the deep merge of several YAML files, and
//! `socnet number` to reformat numeric literals.

mod check;
mod expand;
mod merge;
mod number;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "socnet", version, about = "SoC netlist expander")]
pub struct Cli {
    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log pass details at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// When to color diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Use this `socnet.toml` instead of searching upward from the current directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand buses and links and write the flat netlist.
    Expand(ExpandArgs),
    /// Expand a netlist and report consistency findings without writing it.
    Check(CheckArgs),
    /// Print the deep merge of several YAML documents.
    Merge(MergeArgs),
    /// Reformat numeric literals.
    Number(NumberArgs),
}

/// Schema library locations given on the command line.
///
/// When both lists are empty the `[library]` section of `socnet.toml` is used.
#[derive(Args, Debug, Default)]
pub struct LibraryArgs {
    /// Module schema file or directory (repeatable).
    #[arg(short = 'm', long = "module-lib")]
    pub module_lib: Vec<PathBuf>,

    /// Bus schema file or directory (repeatable).
    #[arg(short = 'b', long = "bus-lib")]
    pub bus_lib: Vec<PathBuf>,
}

/// How check findings are judged and printed.
#[derive(Args, Debug)]
pub struct FindingArgs {
    /// Promote check findings to errors (exit code 1).
    #[arg(long)]
    pub strict: bool,

    /// Diagnostic output.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// Netlist files, merged in order (later files win).
    #[arg(required = true)]
    pub netlist: Vec<PathBuf>,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Output directory (default: `[output] dir` from `socnet.toml`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the expanded netlist to stdout instead of writing a file.
    #[arg(long)]
    pub stdout: bool,

    /// Also write `<stem>.nc.rpt`.
    #[arg(long)]
    pub report: bool,

    #[command(flatten)]
    pub findings: FindingArgs,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Netlist files, merged in order (later files win).
    #[arg(required = true)]
    pub netlist: Vec<PathBuf>,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Also report module ports that are on no net.
    #[arg(long)]
    pub unconnected: bool,

    #[command(flatten)]
    pub findings: FindingArgs,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// YAML files, merged in order (later files win).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct NumberArgs {
    /// Literals such as `8'hFF`, `0x1f`, or `42`.
    #[arg(required = true, allow_hyphen_values = true)]
    pub literals: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = NumberStyle::Verilog)]
    pub style: NumberStyle,
}

/// How `socnet number` prints a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NumberStyle {
    /// Sized Verilog literal (`8'hff`).
    Verilog,
    /// C literal (`0xff`).
    C,
    /// Unsized Verilog literal (`'hff`).
    Plain,
    /// Sized Verilog literal zero-padded to its width (`8'h0f`).
    Padded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One rendered block per diagnostic on stderr.
    Text,
    /// One JSON object per line on stdout.
    Json,
}

/// Flags shared by every subcommand, with `--color` already resolved.
pub struct GlobalArgs {
    pub quiet: bool,
    pub verbose: bool,
    pub color: bool,
    /// Explicit `socnet.toml` path.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Log level implied by `--verbose` and `--quiet`.
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    // RUST_LOG, when set, overrides the flag-derived level.
    let _ = env_logger::Builder::new()
        .filter_level(global.log_level())
        .parse_default_env()
        .try_init();

    let result = match cli.command {
        Command::Expand(ref args) => expand::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Merge(ref args) => merge::run(args, &global),
        Command::Number(ref args) => number::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
