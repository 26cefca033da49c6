use std::sync::Mutex;

use super::*;

// =============================================================================
// GenerateError::error_code
// =============================================================================

#[test]
fn error_codes_are_stable() {
    let cases = [
        (GenerateError::ConfigParse("bad".into()), "E_CONFIG_PARSE"),
        (GenerateError::MissingApiKey { var: "KEY".into() }, "E_MISSING_API_KEY"),
        (GenerateError::EmptyPrompt, "E_EMPTY_PROMPT"),
        (GenerateError::HttpClientBuild("tls".into()), "E_HTTP_CLIENT_BUILD"),
        (GenerateError::ApiRequest("timeout".into()), "E_API_REQUEST"),
        (GenerateError::ApiResponse { status: 500, body: "oops".into() }, "E_API_RESPONSE"),
        (GenerateError::ApiParse("json".into()), "E_API_PARSE"),
        (GenerateError::PredictionFailed { status: "failed".into(), message: "nsfw".into() }, "E_PREDICTION_FAILED"),
        (GenerateError::MissingOutput, "E_MISSING_OUTPUT"),
        (GenerateError::Timeout { polls: 3 }, "E_TIMEOUT"),
    ];
    for (err, code) in cases {
        assert_eq!(err.error_code(), code, "{err}");
    }
}

#[test]
fn error_messages() {
    assert_eq!(GenerateError::MissingApiKey { var: "REPLICATE_API_TOKEN".into() }.to_string(), "missing API key: env var REPLICATE_API_TOKEN not set");
    assert_eq!(
        GenerateError::PredictionFailed { status: "canceled".into(), message: "user".into() }.to_string(),
        "prediction canceled: user"
    );
    assert_eq!(GenerateError::Timeout { polls: 60 }.to_string(), "prediction still running after 60 polls");
}

// =============================================================================
// GenerateError::retryable
// =============================================================================

#[test]
fn retryable_transport_and_timeout() {
    assert!(GenerateError::ApiRequest("conn refused".into()).retryable());
    assert!(GenerateError::Timeout { polls: 1 }.retryable());
}

#[test]
fn retryable_rate_limit_and_server_errors() {
    assert!(GenerateError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(GenerateError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn not_retryable_client_errors() {
    assert!(!GenerateError::ApiResponse { status: 401, body: String::new() }.retryable());
    assert!(!GenerateError::EmptyPrompt.retryable());
    assert!(!GenerateError::MissingOutput.retryable());
    assert!(!GenerateError::PredictionFailed { status: "failed".into(), message: String::new() }.retryable());
}

// =============================================================================
// SvgGenerate through a trait object
// =============================================================================

struct CannedGenerator {
    prompts: Mutex<Vec<String>>,
    reply: Result<String, String>,
}

#[async_trait::async_trait]
impl SvgGenerate for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.reply.clone().map_err(|m| GenerateError::PredictionFailed { status: "failed".into(), message: m })
    }
}

#[tokio::test]
async fn trait_object_returns_svg() {
    let generator = CannedGenerator { prompts: Mutex::new(Vec::new()), reply: Ok("<svg/>".into()) };
    let dyn_gen: &dyn SvgGenerate = &generator;
    assert_eq!(dyn_gen.generate("a cat").await.unwrap(), "<svg/>");
    assert_eq!(*generator.prompts.lock().unwrap(), vec!["a cat".to_owned()]);
}

#[tokio::test]
async fn trait_object_propagates_failure() {
    let generator = CannedGenerator { prompts: Mutex::new(Vec::new()), reply: Err("model offline".into()) };
    let err = generator.generate("a dog").await.unwrap_err();
    assert_eq!(err.to_string(), "prediction failed: model offline");
}
