use std::sync::Mutex;

use clap::CommandFactory;

use super::*;

const SVG: &str = r#"<svg viewBox="0 0 100 100"><circle cx="50" cy="50" r="10"/><rect width="5" height="5"/></svg>"#;

struct MockGenerator {
    prompts: Mutex<Vec<String>>,
    reply: fn() -> Result<String, GenerateError>,
}

impl MockGenerator {
    fn new(reply: fn() -> Result<String, GenerateError>) -> Self {
        Self { prompts: Mutex::new(Vec::new()), reply }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SvgGenerate for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        (self.reply)()
    }
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parse_screen_accepts_width_x_height() {
    assert_eq!(parse_screen("800x600").unwrap(), ScreenRect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(parse_screen(" 10 X 20 ").unwrap(), ScreenRect::new(0.0, 0.0, 10.0, 20.0));
}

#[test]
fn parse_screen_rejects_garbage_and_empty_area() {
    assert!(parse_screen("800").is_err());
    assert!(parse_screen("axb").is_err());
    assert!(parse_screen("0x600").is_err());
}

#[test]
fn parse_view_box_validates() {
    assert_eq!(parse_view_box("0 0 10 20").unwrap(), ViewBox::new(0.0, 0.0, 10.0, 20.0));
    assert!(parse_view_box("0 0 10").unwrap_err().contains("invalid view box"));
}

#[test]
fn cli_parses_generate_with_globals() {
    let cli = Cli::try_parse_from(["vecdraw", "generate", "a red fox", "--screen", "200x100"]).unwrap();
    assert!(matches!(cli.command, Command::Generate { ref prompt } if prompt == "a red fox"));
    assert_eq!(cli.screen, ScreenRect::new(0.0, 0.0, 200.0, 100.0));
    assert!(cli.view_box.is_none());
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn import_missing_file_is_read_error() {
    let mut session = EditorSession::new();
    let err = import_file(&mut session, Path::new("/definitely/not/here.svg")).unwrap_err();
    assert_eq!(err.failure().code, "E_READ");
}

#[test]
fn report_lists_layers_and_instructions() {
    let mut session = EditorSession::new();
    session.set_screen(ScreenRect::new(0.0, 0.0, 200.0, 200.0));
    let import = session.import_svg(SVG).unwrap();
    let report = SessionReport::new(&session, &import);
    assert_eq!(report.added, 2);
    assert_eq!(report.view_box, ViewBox::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(report.layers.len(), 2);
    assert_eq!(report.instructions.len(), 2);
    assert!((report.viewport.scale_x - 2.0).abs() < 1e-12);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["layers"][0]["name"], "Imported circle 1");
    assert_eq!(json["instructions"][1]["primitive"]["type"], "rect");
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn generate_imports_result_with_trimmed_prompt() {
    let generator = MockGenerator::new(|| Ok(SVG.to_owned()));
    let mut session = EditorSession::new();
    let report = generate_into(&mut session, Ok(&generator), "  a red fox ").await.unwrap();
    assert_eq!(report.added.len(), 2);
    assert_eq!(generator.prompts(), vec!["a red fox".to_owned()]);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn blank_prompt_never_reaches_generator() {
    let generator = MockGenerator::new(|| Ok(SVG.to_owned()));
    let mut session = EditorSession::new();
    let err = generate_into(&mut session, Ok(&generator), "   ").await.unwrap_err();
    assert_eq!(err.error_code(), "E_VALIDATION");
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn blank_prompt_is_validation_even_without_generator() {
    let mut session = EditorSession::new();
    let missing = GenerateError::MissingApiKey { var: "REPLICATE_API_TOKEN".into() };
    let err = generate_into(&mut session, Err(&missing), "").await.unwrap_err();
    assert_eq!(err.error_code(), "E_VALIDATION");
}

#[tokio::test]
async fn generator_failure_is_remote_failure() {
    let generator = MockGenerator::new(|| Err(GenerateError::ApiResponse { status: 502, body: String::new() }));
    let mut session = EditorSession::new();
    let err = generate_into(&mut session, Ok(&generator), "cat").await.unwrap_err();
    let failure = CliError::from(err).failure();
    assert_eq!(failure.kind, "remote_failure");
    assert_eq!(failure.code, "E_REMOTE_FAILURE");
    assert_eq!(failure.message, "generation failed: API response error: status 502");
    assert!(session.model.is_empty());
    assert!(!session.is_busy());
}

#[tokio::test]
async fn misconfigured_generator_is_remote_failure() {
    let mut session = EditorSession::new();
    let missing = GenerateError::MissingApiKey { var: "REPLICATE_API_TOKEN".into() };
    let err = generate_into(&mut session, Err(&missing), "cat").await.unwrap_err();
    assert!(err.to_string().contains("REPLICATE_API_TOKEN"));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn malformed_generated_svg_is_import_failure() {
    let generator = MockGenerator::new(|| Ok("<svg><rect".to_owned()));
    let mut session = EditorSession::new();
    let err = generate_into(&mut session, Ok(&generator), "cat").await.unwrap_err();
    assert_eq!(CliError::from(err).failure().kind, "import");
}
