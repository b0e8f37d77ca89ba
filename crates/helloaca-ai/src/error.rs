use thiserror::Error;

/// Why a model reply could not be used as an analysis.
///
/// All three are absorbed by the analyzer and answered with the fallback.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no JSON object found in model response")]
    Extraction,

    #[error("model response is not valid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        /// Leading characters of the rejected candidate, for logs only.
        excerpt: String,
    },

    #[error("model response failed validation: {0}")]
    Validation(#[from] ValidationError),
}

impl AnalysisError {
    /// Stage at which the pipeline gave up, for structured logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Parse { .. } => "parse",
            Self::Validation(_) => "validation",
        }
    }
}

/// First structural check a parsed reply failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid overallRiskLevel: {0}")]
    InvalidRiskLevel(String),

    #[error("keyFindings must be a non-empty array")]
    EmptyKeyFindings,

    #[error("missing section: {0}")]
    MissingSection(&'static str),

    #[error("riskSummary must be an object")]
    RiskSummaryNotObject,

    #[error("missing risk category: {0}")]
    MissingRiskCategory(&'static str),

    #[error("schema mismatch: {0}")]
    Schema(String),
}

/// Failure of the outbound call to the text-generation provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API key is not configured")]
    MissingCredential,

    #[error("provider rejected the API key ({status})")]
    Unauthorized { status: u16 },

    #[error("provider rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("provider request timed out")]
    Timeout,

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("provider returned no text content")]
    EmptyCompletion,

    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Worth another attempt under a retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout | Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Failures reported to the caller as HTTP errors instead of being
    /// answered with the fallback analysis.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::Unauthorized { .. }
                | Self::RateLimited { .. }
                | Self::Timeout
        )
    }
}
