//! finreport CLI - financial statement extraction tool

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use finreport::analyze::{classify, validate};
use finreport::{
    AnalyzeOptions, BatchAnalyzer, LopdfBackend, OutputOptions, PageScanner, PdfBackend,
    ProcessMode, TableSettings,
};

#[derive(Parser)]
#[command(name = "finreport")]
#[command(version)]
#[command(about = "Extract financial statements from PDF reports to Excel and Word", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze reports and write statement workbooks and narrative documents
    Analyze {
        /// Report PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Processing mode (doc2x or ragflow)
        #[arg(short, long, env = "FINREPORT_MODE", default_value = "doc2x")]
        mode: String,

        /// Directory relative report paths are resolved against
        #[arg(long, env = "FINREPORT_BASE_DIR", value_name = "DIR")]
        base_dir: Option<PathBuf>,

        /// Print the batch outcome as JSON
        #[arg(long)]
        json: bool,

        /// Font family for the word document
        #[arg(long)]
        font: Option<String>,

        /// Only accept tables ruled with stroked lines
        #[arg(long)]
        strict: bool,
    },

    /// List the tables found on each page and how they classify
    Classify {
        /// Report PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only accept tables ruled with stroked lines
        #[arg(long)]
        strict: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Analyze {
            inputs,
            mode,
            base_dir,
            json,
            font,
            strict,
        }) => cmd_analyze(&inputs, &mode, base_dir, json, font, strict),
        Some(Commands::Classify { input, strict }) => cmd_classify(&input, strict),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: finreport analyze <FILES>...".yellow());
            println!("       finreport --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn table_settings(strict: bool) -> TableSettings {
    if strict {
        TableSettings::new().with_strategy(finreport::parser::TableStrategy::LinesStrict)
    } else {
        TableSettings::new()
    }
}

fn cmd_analyze(
    inputs: &[PathBuf],
    mode: &str,
    base_dir: Option<PathBuf>,
    json: bool,
    font: Option<String>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode: ProcessMode = mode.parse()?;

    let mut output = OutputOptions::new();
    if let Some(font) = font {
        output = output.with_font_family(font);
    }
    let mut options = AnalyzeOptions::new()
        .with_mode(mode)
        .with_table_settings(table_settings(strict))
        .with_output(output);
    if let Some(dir) = base_dir {
        options = options.with_base_dir(dir);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Analyzing {} report(s) in {} mode...", inputs.len(), mode));

    let outcome = BatchAnalyzer::new(options).run(inputs);
    pb.finish_and_clear();
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    for result in &outcome.results {
        println!("{} {}", "Analyzed".green().bold(), result.title);
        let excel = result.excel_path.as_deref();
        let word = result.word_path.as_deref();
        println!(
            "  {} {}",
            "├─".dimmed(),
            excel.unwrap_or("(no statements found)")
        );
        println!(
            "  {} {}",
            "└─".dimmed(),
            word.unwrap_or("(no narrative text)")
        );
    }

    if !outcome.errors.is_empty() {
        println!();
        println!("{}", "Errors".yellow().bold());
        for error in &outcome.errors {
            println!("  {} {}", "-".dimmed(), error);
        }
    }

    Ok(())
}

fn cmd_classify(input: &Path, strict: bool) -> Result<(), Box<dyn std::error::Error>> {
    let backend = LopdfBackend::new();
    let doc = backend.open(input)?;
    let scanner = PageScanner::new(table_settings(strict));

    println!("{}", "Detected Tables".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!();

    let pb = ProgressBar::new(doc.page_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    let mut lines = Vec::new();
    let mut found = 0;
    for page in 0..doc.page_count() {
        pb.inc(1);
        let scan = match scanner.scan(doc.as_ref(), page) {
            Ok(scan) => scan,
            Err(e) => {
                lines.push(format!("{} {}: {}", "Page".bold(), page + 1, e.to_string().red()));
                continue;
            }
        };

        for scanned in &scan.tables {
            let table = scanned.table.cleaned();
            let label = match classify(&table) {
                Some(kind) if validate(&table, kind) => kind.label().green().to_string(),
                Some(kind) => format!("{} (incomplete)", kind.label()).yellow().to_string(),
                None => "unclassified".dimmed().to_string(),
            };
            lines.push(format!(
                "{} {}: {}x{} {}",
                "Page".bold(),
                page + 1,
                table.row_count(),
                table.column_count(),
                label
            ));
            found += 1;
        }
    }
    pb.finish_and_clear();

    for line in &lines {
        println!("{}", line);
    }
    println!("\n{} {} table(s) found", "Done!".green().bold(), found);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "finreport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Financial statement extraction tool");
    println!();
    println!("License: MIT");
}
