//! Lit semantic analyzer command line driver.
//!
//! Reads a single Lit source file, parses it, resolves it against an empty
//! externals table, and reports every diagnostic collected along the way
//! through `miette`'s graphical renderer. Exits with status 1 if parsing or
//! resolution produced any error.

use std::process::exit;

use clap::Parser as ClapParser;
use lit_resolve::error::Report;
use lit_resolve::file::SourceFile;
use lit_resolve::nom_tools::State;
use lit_resolve::resolver::scope::Scope;
use log::LevelFilter;
use miette::NamedSource;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelPadding, TermLogger, TerminalMode, ThreadLogMode};

/// Semantic analyzer for the Lit language.
#[derive(ClapParser)]
#[command(name = "litc", about = "Resolves a Lit source file and reports diagnostics")]
struct Cli {
    /// Path to the Lit source file to analyze.
    path: String,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Both)
        .set_level_padding(LevelPadding::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    CombinedLogger::init(vec![TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)]).unwrap();

    let content = match std::fs::read_to_string(&cli.path) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("Error reading file {}: {error}", cli.path);
            exit(1);
        }
    };

    let file_name = cli.path.rsplit('/').next().unwrap_or(&cli.path).to_string();
    let source_file = SourceFile::new(vec![file_name], content);
    let state = State::new(source_file.clone());

    let mut ast = match lit_resolve::parse(&state) {
        Ok(ast) => ast,
        Err(report) => {
            print_report(&source_file, report);
            exit(1);
        }
    };

    let report = lit_resolve::resolve(&mut ast, Scope::default());
    if !report.errors.is_empty() {
        print_report(&source_file, report);
        exit(1);
    }

    println!("{}: no errors found", cli.path);
}

fn print_report(source_file: &SourceFile, report: Report) {
    let source: NamedSource<String> = source_file.into();
    let report = miette::Report::new(report).with_source_code(source);
    eprintln!("{report:?}");
}
