//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cellbridge_ooxml::config::{LoggingSettings, CONFIG_FILE_NAME};
use cellbridge_ooxml::{
    PackageReader, PackageWriter, Settings, StructuredEncoder, Workbook, Worksheet,
};

/// Output format for `dump`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// Tab-separated rows, prefixed with the row number
    #[default]
    Text,
    /// Rows as JSON objects keyed by column letters
    Json,
}

#[derive(Parser)]
#[command(name = "cellbridge")]
#[command(author, version, about = "Read, write and map XLSX workbooks", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./cellbridge.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the sheets of a workbook
    Inspect {
        /// Input XLSX file
        input: PathBuf,
    },
    /// Print sheet contents
    Dump {
        /// Input XLSX file
        input: PathBuf,

        /// Only this sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: DumpFormat,
    },
    /// Encode a JSON document into a workbook
    FromJson {
        /// Input JSON file (a top-level object)
        input: PathBuf,

        /// Output XLSX file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Run the CLI
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(&settings.logging, cli.verbose);

    match cli.command {
        Commands::Inspect { input } => {
            inspect_command(&input, &settings)?;
        }
        Commands::Dump {
            input,
            sheet,
            format,
        } => {
            dump_command(&input, sheet.as_deref(), format, &settings)?;
        }
        Commands::FromJson { input, output } => {
            from_json_command(&input, &output, &settings)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `-v` forces debug output; otherwise `RUST_LOG` wins over the settings filter.
pub fn init_logging(logging: &LoggingSettings, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter))
    };

    // A subscriber may already be installed when embedded in another program
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load settings from a config file or use defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Settings::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => {
            let candidate = Path::new(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Settings::load(candidate)
                    .with_context(|| format!("Failed to load config: {}", candidate.display()));
            }
            Ok(Settings::default())
        }
    }
}

fn read_workbook(input: &Path, settings: &Settings) -> Result<Workbook> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    PackageReader::from_settings(&settings.reader)
        .read(input)
        .with_context(|| format!("Failed to read workbook: {}", input.display()))
}

/// Execute the inspect command
pub fn inspect_command(input: &Path, settings: &Settings) -> Result<()> {
    let workbook = read_workbook(input, settings)?;
    print!("{}", inspect_report(input, &workbook));
    Ok(())
}

/// Sheet names with cell and row counts, plus the shared string count.
pub fn inspect_report(input: &Path, workbook: &Workbook) -> String {
    let mut report = format!("{}\n", input.display());
    report.push_str(&format!("  Sheets: {}\n", workbook.sheets().len()));
    report.push_str(&format!(
        "  Shared strings: {}\n",
        workbook.shared_strings().len()
    ));
    for sheet in workbook.sheets() {
        report.push_str(&format!(
            "  - {} ({} cells, {} rows)\n",
            sheet.name(),
            sheet.len(),
            sheet.rows().len()
        ));
    }
    report
}

/// Execute the dump command
pub fn dump_command(
    input: &Path,
    sheet: Option<&str>,
    format: DumpFormat,
    settings: &Settings,
) -> Result<()> {
    let workbook = read_workbook(input, settings)?;
    let output = match format {
        DumpFormat::Text => dump_text(&workbook, sheet)?,
        DumpFormat::Json => {
            let json = dump_json(&workbook, sheet)?;
            let mut text = serde_json::to_string_pretty(&json)
                .context("Failed to serialize workbook to JSON")?;
            text.push('\n');
            text
        }
    };
    print!("{output}");
    Ok(())
}

fn selected_sheets<'a>(
    workbook: &'a Workbook,
    sheet: Option<&str>,
) -> Result<Vec<&'a Worksheet>> {
    match sheet {
        Some(name) => match workbook.sheet(name) {
            Some(found) => Ok(vec![found]),
            None => anyhow::bail!(
                "Sheet not found: {name} (available: {})",
                workbook.sheet_names().join(", ")
            ),
        },
        None => Ok(workbook.sheets().iter().collect()),
    }
}

/// Rows as text: a `== name ==` heading per sheet, then one tab-separated
/// line per row with gaps left empty.
pub fn dump_text(workbook: &Workbook, sheet: Option<&str>) -> Result<String> {
    let mut output = String::new();
    for sheet in selected_sheets(workbook, sheet)? {
        output.push_str(&format!("== {} ==\n", sheet.name()));
        for row in sheet.rows() {
            let width = row.cells.last().map_or(0, |c| c.address.column()) as usize;
            let mut fields = vec![""; width];
            for cell in &row.cells {
                fields[cell.address.column() as usize - 1] = cell.value.as_str();
            }
            output.push_str(&format!("{}\t{}\n", row.number, fields.join("\t")));
        }
    }
    Ok(output)
}

/// Selected sheets as `{name: [rows]}`.
pub fn dump_json(workbook: &Workbook, sheet: Option<&str>) -> Result<serde_json::Value> {
    let object = selected_sheets(workbook, sheet)?
        .into_iter()
        .map(|s| (s.name().to_string(), s.to_json()))
        .collect();
    Ok(serde_json::Value::Object(object))
}

/// Execute the from-json command
pub fn from_json_command(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let document: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", input.display()))?;

    let workbook = StructuredEncoder::with_settings(settings.encoder.clone())
        .encode(&document)
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    debug!(sheets = workbook.sheets().len(), "encoded JSON document");

    PackageWriter::new()
        .write(&workbook, output)
        .with_context(|| format!("Failed to write workbook: {}", output.display()))?;

    println!("Created: {}", output.display());
    println!("  Sheets: {}", workbook.sheet_names().join(", "));
    Ok(())
}
