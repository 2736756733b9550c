mod script;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use canvas::consts::{DEFAULT_COLOR, HIT_TOLERANCE_PX};
use canvas::doc::{DocStore, ElementKind, Point};
use canvas::engine::{EngineConfig, EngineCore};
use canvas::hit::FixedAdvanceMetrics;
use canvas::persist::{self, PersistError};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid document {path}: {source}")]
    Document { path: PathBuf, source: PersistError },
    #[error("failed to encode document: {0}")]
    Encode(PersistError),
    #[error("invalid script {path}: {source}")]
    Script { path: PathBuf, source: script::ScriptError },
    #[error("tolerance must be a non-negative number, got {0}")]
    Tolerance(f64),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "illustrator", about = "Headless host for the illustration canvas engine")]
struct Cli {
    /// Pick radius in pixels.
    #[arg(long, env = "ILLUSTRATOR_TOLERANCE", default_value_t = HIT_TOLERANCE_PX)]
    tolerance: f64,

    /// CSS color for new elements.
    #[arg(long, env = "ILLUSTRATOR_COLOR", default_value = DEFAULT_COLOR)]
    color: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one line per element of a saved document.
    Inspect { file: PathBuf },
    /// Run a pointer script against a document and write the result.
    Replay {
        script: PathBuf,
        /// Document to start from; empty when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write the result; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the index of the topmost element under a point.
    Hit { file: PathBuf, x: f64, y: f64 },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.tolerance.is_nan() || cli.tolerance < 0.0 {
        return Err(CliError::Tolerance(cli.tolerance));
    }
    let config = EngineConfig { tolerance: cli.tolerance, color: cli.color, ..EngineConfig::default() };

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Inspect { file } => run_inspect(&file, &mut out),
        Command::Replay { script, input, output } => {
            run_replay(config, &script, input.as_deref(), output.as_deref(), &mut out)
        }
        Command::Hit { file, x, y } => run_hit(&config, &file, Point::new(x, y), &mut out),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn load_doc(path: &Path) -> Result<DocStore, CliError> {
    let elements =
        persist::decode_document(&read(path)?).map_err(|source| CliError::Document { path: path.to_owned(), source })?;
    let mut doc = DocStore::new();
    doc.replace_all(elements);
    tracing::info!(path = %path.display(), elements = doc.len(), "loaded document");
    Ok(doc)
}

fn run_inspect(file: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let doc = load_doc(file)?;
    for (index, element) in doc.iter().enumerate() {
        let detail = match &element.kind {
            ElementKind::Stroke { points } => format!("{} points", points.len()),
            ElementKind::Line { a, b } => format!("({}, {}) -> ({}, {})", a.x, a.y, b.x, b.y),
            ElementKind::Label { anchor, text } => format!("{text:?} at ({}, {})", anchor.x, anchor.y),
        };
        writeln!(out, "{index}\t{}\t{}\t{detail}", element.kind_name(), element.color)?;
    }
    Ok(())
}

fn run_replay(
    config: EngineConfig,
    script_path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let steps = script::parse(&read(script_path)?)
        .map_err(|source| CliError::Script { path: script_path.to_owned(), source })?;

    let mut core = EngineCore::with_config(config);
    if let Some(path) = input {
        core.load_document(&read(path)?)
            .map_err(|source| CliError::Document { path: path.to_owned(), source })?;
        tracing::info!(path = %path.display(), elements = core.doc.len(), "loaded document");
    }

    let summary = script::replay(&mut core, &steps);
    tracing::info!(
        steps = steps.len(),
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        "replay finished"
    );

    let json = core.save_document().map_err(CliError::Encode)?;
    match output {
        Some(path) => {
            fs::write(path, json).map_err(|source| CliError::Write { path: path.to_owned(), source })?;
            tracing::info!(path = %path.display(), elements = core.doc.len(), "wrote document");
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

fn run_hit(config: &EngineConfig, file: &Path, pt: Point, out: &mut impl Write) -> Result<(), CliError> {
    let doc = load_doc(file)?;
    let metrics = FixedAdvanceMetrics::new(config.font_size, config.line_height);
    let found = doc
        .find_near(pt, config.tolerance, &metrics)
        .and_then(|element| doc.index_of(&element.id));
    match found {
        Some(index) => writeln!(out, "{index}")?,
        None => writeln!(out, "none")?,
    }
    Ok(())
}
