//! Replicate predictions client.
//!
//! Creates a prediction for the configured model, waits for it to reach a
//! terminal state, and downloads the SVG it produced. Response handling lives
//! in pure functions (`parse_prediction`, `next_step`) for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::{GeneratorConfig, ModelSlug, PollPolicy};
use super::types::{GenerateError, SvgGenerate};

// =============================================================================
// CLIENT
// =============================================================================

pub struct ReplicateClient {
    http: reqwest::Client,
    api_key: String,
    model: ModelSlug,
    base_url: String,
    poll: PollPolicy,
}

impl ReplicateClient {
    /// Build a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP client
    /// fails to build.
    pub fn from_env() -> Result<Self, GenerateError> {
        Self::new(GeneratorConfig::from_env()?)
    }

    /// Build a client from a parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| GenerateError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key, model: config.model, base_url: config.base_url, poll: config.poll })
    }

    #[must_use]
    pub fn model(&self) -> &ModelSlug {
        &self.model
    }

    async fn run(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut prediction = self.create_prediction(prompt).await?;
        let mut polls = 0;
        loop {
            match next_step(&prediction)? {
                Step::Done(url) => {
                    info!(id = %prediction.id, polls, "prediction succeeded");
                    return self.download(&url).await;
                }
                Step::Pending(url) => {
                    if polls >= self.poll.max_polls {
                        return Err(GenerateError::Timeout { polls });
                    }
                    polls += 1;
                    debug!(id = %prediction.id, status = prediction.status.as_str(), polls, "prediction pending");
                    tokio::time::sleep(Duration::from_millis(self.poll.interval_ms)).await;
                    prediction = self.get_prediction(&url).await?;
                }
            }
        }
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, GenerateError> {
        let body = PredictionRequest { input: PredictionInput { prompt } };
        let response = self
            .http
            .post(predictions_url(&self.base_url, &self.model))
            .bearer_auth(&self.api_key)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::ApiRequest(e.to_string()))?;
        parse_prediction(&read_body(response).await?)
    }

    async fn get_prediction(&self, url: &str) -> Result<Prediction, GenerateError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| GenerateError::ApiRequest(e.to_string()))?;
        parse_prediction(&read_body(response).await?)
    }

    async fn download(&self, url: &str) -> Result<String, GenerateError> {
        let response = self.http.get(url).send().await.map_err(|e| GenerateError::ApiRequest(e.to_string()))?;
        read_body(response).await
    }
}

#[async_trait::async_trait]
impl SvgGenerate for ReplicateClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }
        info!(model = %self.model, prompt_len = prompt.len(), "creating prediction");
        self.run(prompt).await
    }
}

/// Body text of a successful response; any other status is an error.
async fn read_body(response: reqwest::Response) -> Result<String, GenerateError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| GenerateError::ApiRequest(e.to_string()))?;
    if !status.is_success() {
        return Err(GenerateError::ApiResponse { status: status.as_u16(), body: text });
    }
    Ok(text)
}

fn predictions_url(base_url: &str, model: &ModelSlug) -> String {
    format!("{base_url}/models/{}/{}/predictions", model.owner, model.name)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    /// Anything newer than this client; treated as still running.
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// What to do after looking at a prediction.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Finished; download the SVG from this URL.
    Done(String),
    /// Still running; poll this URL.
    Pending(String),
}

fn parse_prediction(json: &str) -> Result<Prediction, GenerateError> {
    serde_json::from_str(json).map_err(|e| GenerateError::ApiParse(e.to_string()))
}

fn next_step(prediction: &Prediction) -> Result<Step, GenerateError> {
    match prediction.status {
        PredictionStatus::Succeeded => output_url(prediction.output.as_ref()).map(Step::Done),
        PredictionStatus::Failed | PredictionStatus::Canceled => Err(GenerateError::PredictionFailed {
            status: prediction.status.as_str().to_owned(),
            message: error_message(prediction.error.as_ref()),
        }),
        PredictionStatus::Starting | PredictionStatus::Processing | PredictionStatus::Unknown => prediction
            .urls
            .as_ref()
            .and_then(|u| u.get.clone())
            .map(Step::Pending)
            .ok_or_else(|| GenerateError::ApiParse("pending prediction has no poll URL".to_owned())),
    }
}

/// The model reports its file as a URL string, or a list whose first entry is one.
fn output_url(output: Option<&serde_json::Value>) -> Result<String, GenerateError> {
    let url = match output {
        Some(serde_json::Value::String(s)) => Some(s.as_str()),
        Some(serde_json::Value::Array(items)) => items.first().and_then(serde_json::Value::as_str),
        _ => None,
    };
    match url {
        Some(s) if !s.trim().is_empty() => Ok(s.to_owned()),
        _ => Err(GenerateError::MissingOutput),
    }
}

fn error_message(error: Option<&serde_json::Value>) -> String {
    match error {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(v) if !v.is_null() => v.to_string(),
        _ => "no error message".to_owned(),
    }
}

#[cfg(test)]
#[path = "replicate_test.rs"]
mod tests;
