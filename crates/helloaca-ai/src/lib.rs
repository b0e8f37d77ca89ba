//! Contract risk analysis: prompt construction, LLM integration, and
//! best-effort normalisation of the model's reply.

mod analyzer;
mod error;
pub mod extract;
pub mod fallback;
mod generator;
pub mod prompt;
pub mod validate;

#[cfg(feature = "http")]
mod anthropic;

pub use analyzer::{Analysis, ContractAnalyzer, FallbackReason, analyze_response, normalize_response};
pub use error::{AnalysisError, ProviderError, ValidationError};
pub use fallback::fallback_analysis;
pub use generator::{Completion, RetryPolicy, TextGenerator, generate_with_retry};
pub use prompt::build_analysis_prompt;

#[cfg(feature = "http")]
pub use anthropic::AnthropicClient;
