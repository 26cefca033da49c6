//! Generation types: the collaborator trait and its errors.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while turning a prompt into SVG text.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API token environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The prompt was empty after trimming.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request failed before a response arrived.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The prediction reached a terminal state other than success.
    #[error("prediction {status}: {message}")]
    PredictionFailed { status: String, message: String },

    /// The prediction succeeded but carried no usable output URL.
    #[error("prediction returned no output")]
    MissingOutput,

    /// The prediction was still running when the poll budget ran out.
    #[error("prediction still running after {polls} polls")]
    Timeout { polls: u32 },
}

impl GenerateError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::PredictionFailed { .. } => "E_PREDICTION_FAILED",
            Self::MissingOutput => "E_MISSING_OUTPUT",
            Self::Timeout { .. } => "E_TIMEOUT",
        }
    }

    /// Whether the same request might succeed if sent again. Informational
    /// only; nothing in this crate retries.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::Timeout { .. } | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Anything that can turn a text prompt into SVG document text.
#[async_trait::async_trait]
pub trait SvgGenerate: Send + Sync {
    /// Generate an SVG document for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] for a blank prompt, a transport or
    /// provider failure, or a prediction that never produced output.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
