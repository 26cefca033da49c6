//! vecdraw: command-line host for the vector editing engine.
//!
//! Loads SVG into a fresh editor session, either from a file or from the
//! hosted generation model, and prints what a canvas would paint as JSON on
//! stdout. Logs go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use canvas::geometry::{ScreenRect, ViewBox, ViewportTransform};
use canvas::layers::LayerEntry;
use canvas::render::DrawInstruction;
use canvas::{EditorError, EditorSession, ImportReport};
use clap::{Parser, Subcommand};
use generator::{GenerateError, ReplicateClient, SvgGenerate};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("JSON encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn failure(&self) -> Failure {
        let (kind, code) = match self {
            Self::Editor(e) => (e.kind().as_str(), e.error_code()),
            Self::Read { .. } => ("io", "E_READ"),
            Self::Json(_) => ("internal", "E_JSON"),
        };
        Failure { kind, code, message: self.to_string() }
    }
}

/// Structured failure printed on stdout when a command fails.
#[derive(Debug, Serialize)]
struct Failure {
    kind: &'static str,
    code: &'static str,
    message: String,
}

#[derive(Parser, Debug)]
#[command(name = "vecdraw", about = "Import or generate SVG into an editable shape session")]
struct Cli {
    /// Document frame to start from, e.g. "0 0 2048 2048". An imported viewBox replaces it.
    #[arg(long, global = true, env = "VECDRAW_VIEW_BOX", value_parser = parse_view_box)]
    view_box: Option<ViewBox>,

    /// On-screen canvas size used for the reported viewport transform.
    #[arg(long, global = true, env = "VECDRAW_SCREEN", value_parser = parse_screen, default_value = "1024x1024")]
    screen: ScreenRect,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import an SVG file.
    Import { file: PathBuf },
    /// Generate SVG from a text prompt and import it.
    Generate { prompt: String },
}

/// What the session looks like after a command.
#[derive(Debug, Serialize)]
struct SessionReport {
    view_box: ViewBox,
    viewport: ViewportTransform,
    added: usize,
    layers: Vec<LayerEntry>,
    instructions: Vec<DrawInstruction>,
}

impl SessionReport {
    fn new(session: &EditorSession, import: &ImportReport) -> Self {
        Self {
            view_box: session.view_box(),
            viewport: session.viewport(),
            added: import.added.len(),
            layers: session.model.layer_entries(),
            instructions: session.project(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            match serde_json::to_string_pretty(&e.failure()) {
                Ok(json) => println!("{json}"),
                Err(encode) => eprintln!("{e} (and the failure report could not be encoded: {encode})"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    let mut session = cli.view_box.map_or_else(EditorSession::new, EditorSession::with_view_box);
    session.set_screen(cli.screen);

    let report = match cli.command {
        Command::Import { file } => import_file(&mut session, &file)?,
        Command::Generate { prompt } => {
            let client = ReplicateClient::from_env();
            let generator = client.as_ref().map(|c| c as &dyn SvgGenerate);
            generate_into(&mut session, generator, &prompt).await?
        }
    };

    Ok(serde_json::to_string_pretty(&SessionReport::new(&session, &report))?)
}

fn import_file(session: &mut EditorSession, path: &Path) -> Result<ImportReport, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: path.display().to_string(), source })?;
    let report = session.import_svg(&text)?;
    info!(file = %path.display(), added = report.added.len(), "imported file");
    Ok(report)
}

/// Run one generation request through the session's generation boundary.
///
/// The prompt is validated before the collaborator is consulted, so a blank
/// prompt is a validation error even when the generator is misconfigured.
async fn generate_into(
    session: &mut EditorSession,
    generator: Result<&dyn SvgGenerate, &GenerateError>,
    prompt: &str,
) -> Result<ImportReport, EditorError> {
    let prompt = session.begin_generation(prompt)?;
    let outcome = match generator {
        Ok(generator) => generator.generate(&prompt).await.map_err(|e| {
            warn!(code = e.error_code(), retryable = e.retryable(), error = %e, "generation failed");
            e.to_string()
        }),
        Err(e) => Err(e.to_string()),
    };
    session.finish_generation(outcome)
}

fn parse_view_box(raw: &str) -> Result<ViewBox, String> {
    ViewBox::parse(raw).ok_or_else(|| format!("invalid view box '{raw}' (expected four numbers, positive width and height)"))
}

fn parse_screen(raw: &str) -> Result<ScreenRect, String> {
    let invalid = || format!("invalid screen size '{raw}' (expected WIDTHxHEIGHT)");
    let (w, h) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    let screen = ScreenRect::new(0.0, 0.0, width, height);
    if !screen.has_area() {
        return Err(invalid());
    }
    Ok(screen)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
