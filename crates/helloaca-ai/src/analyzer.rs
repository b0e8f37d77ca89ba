//! Contract analysis pipeline: prompt, model call, extraction, parsing,
//! validation, and fallback.
//!
//! Output-quality failures never escape: a reply that cannot be extracted,
//! parsed or validated is answered with [`fallback_analysis`]. Only provider
//! failures that mean no usable reply was produced at all (credentials, rate
//! limit, timeout) are returned as errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use helloaca_core::{AnalysisEnvelope, AnalysisResult};
use serde_json::Value;
use tracing::{info, warn};

use crate::extract::{extract_json_object, parse_candidate};
use crate::fallback::fallback_analysis;
use crate::generator::{RetryPolicy, TextGenerator, generate_with_retry};
use crate::prompt::build_analysis_prompt;
use crate::validate::{validate_strict, validate_structure};
use crate::{AnalysisError, ProviderError};

/// Characters of a bad model reply included in logs.
const LOG_PREFIX_CHARS: usize = 200;

/// Why the fallback analysis was served.
#[derive(Debug)]
pub enum FallbackReason {
    /// The model replied, but the reply was unusable.
    Output(AnalysisError),
    /// The provider failed in a way treated as transient.
    Provider(ProviderError),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Output(e) => write!(f, "{e}"),
            Self::Provider(e) => write!(f, "{e}"),
        }
    }
}

/// Result of analysing one contract.
#[derive(Debug)]
pub enum Analysis {
    /// Model output that passed validation, kept exactly as parsed.
    Validated(Value),
    /// The static substitute.
    Fallback {
        analysis: AnalysisResult,
        reason: FallbackReason,
    },
}

impl Analysis {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The analysis as it will appear on the wire.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Validated(value) => value.clone(),
            Self::Fallback { analysis, .. } => analysis.to_value(),
        }
    }

    pub fn into_envelope(self, contract_id: Option<Value>, at: DateTime<Utc>) -> AnalysisEnvelope {
        match self {
            Self::Validated(value) => AnalysisEnvelope::validated(value, contract_id, at),
            Self::Fallback { analysis, .. } => AnalysisEnvelope::degraded(&analysis, at),
        }
    }

    fn fallback(reason: FallbackReason) -> Self {
        Self::Fallback {
            analysis: fallback_analysis(),
            reason,
        }
    }
}

/// Extract, parse and validate a raw model reply.
pub fn normalize_response(raw: &str, strict: bool) -> Result<Value, AnalysisError> {
    let candidate = extract_json_object(raw)?;
    let value = parse_candidate(&candidate)?;
    if strict {
        validate_strict(&value)?;
    } else {
        validate_structure(&value)?;
    }
    Ok(value)
}

/// Turn a raw model reply into an [`Analysis`]. Never fails.
pub fn analyze_response(raw: &str, strict: bool) -> Analysis {
    match normalize_response(raw, strict) {
        Ok(value) => Analysis::Validated(value),
        Err(err) => {
            let prefix: String = raw.chars().take(LOG_PREFIX_CHARS).collect();
            warn!(
                stage = err.stage(),
                error = %err,
                response_len = raw.len(),
                response_prefix = %prefix,
                "model output unusable, serving fallback analysis"
            );
            Analysis::fallback(FallbackReason::Output(err))
        }
    }
}

/// Runs contract text through the model and normalises the reply.
pub struct ContractAnalyzer {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    strict: bool,
}

impl ContractAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            retry: RetryPolicy::default(),
            strict: false,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Analyse one contract.
    ///
    /// Returns `Err` only for fatal provider failures (see
    /// [`ProviderError::is_fatal`]); everything else yields an [`Analysis`].
    pub async fn analyze(&self, contract_text: &str) -> Result<Analysis, ProviderError> {
        let prompt = build_analysis_prompt(contract_text);

        let completion = match generate_with_retry(self.generator.as_ref(), &prompt, self.retry).await {
            Ok(completion) => completion,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(error = %err, "provider call failed, serving fallback analysis");
                return Ok(Analysis::fallback(FallbackReason::Provider(err)));
            }
        };

        info!(
            response_len = completion.text.len(),
            tokens_used = completion.tokens_used,
            "model response received"
        );
        Ok(analyze_response(&completion.text, self.strict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::stub::ScriptedGenerator;
    use crate::validate::valid_analysis_json;
    use crate::ValidationError;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn analyzer(generator: ScriptedGenerator) -> ContractAnalyzer {
        ContractAnalyzer::new(Arc::new(generator))
    }

    fn fallback_payload(analysis: Analysis) -> String {
        assert!(analysis.is_fallback());
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        serde_json::to_string(&analysis.into_envelope(None, at).analysis).unwrap()
    }

    #[test]
    fn bare_valid_reply_round_trips() {
        let expected = valid_analysis_json();
        let raw = serde_json::to_string(&expected).unwrap();
        match analyze_response(&raw, false) {
            Analysis::Validated(value) => assert_eq!(value, expected),
            other => panic!("expected validated analysis, got {other:?}"),
        }
    }

    #[test]
    fn fenced_reply_matches_bare_reply() {
        let raw = serde_json::to_string_pretty(&valid_analysis_json()).unwrap();
        let fenced = format!("Sure! ```json\n{raw}\n```");
        assert_eq!(
            normalize_response(&fenced, false).unwrap(),
            normalize_response(&raw, false).unwrap()
        );
    }

    #[test]
    fn refusal_serves_fallback() {
        match analyze_response("I cannot process this.", false) {
            Analysis::Fallback {
                reason: FallbackReason::Output(AnalysisError::Extraction),
                analysis,
            } => assert_eq!(analysis, fallback_analysis()),
            other => panic!("expected extraction fallback, got {other:?}"),
        }
    }

    #[test]
    fn invalid_risk_level_serves_fallback() {
        let mut value = valid_analysis_json();
        value["overallRiskLevel"] = "Severe".into();
        let analysis = analyze_response(&value.to_string(), false);
        assert!(matches!(
            analysis,
            Analysis::Fallback {
                reason: FallbackReason::Output(AnalysisError::Validation(
                    ValidationError::InvalidRiskLevel(_)
                )),
                ..
            }
        ));
    }

    #[test]
    fn missing_risk_summary_serves_fallback() {
        let mut value = valid_analysis_json();
        value.as_object_mut().unwrap().remove("riskSummary");
        let analysis = analyze_response(&value.to_string(), false);
        assert!(matches!(
            analysis,
            Analysis::Fallback {
                reason: FallbackReason::Output(AnalysisError::Validation(
                    ValidationError::MissingField("riskSummary")
                )),
                ..
            }
        ));
        assert_eq!(analysis.to_value(), fallback_analysis().to_value());
    }

    #[test]
    fn fallback_is_identical_across_failure_kinds() {
        let extraction = analyze_response("no json here", false);

        let mut value = valid_analysis_json();
        value["keyFindings"] = serde_json::json!([]);
        let validation = analyze_response(&value.to_string(), false);

        let parse = analyze_response("{\"overallRiskLevel\": }", false);

        let a = fallback_payload(extraction);
        assert_eq!(a, fallback_payload(validation));
        assert_eq!(a, fallback_payload(parse));
    }

    #[test]
    fn strict_mode_rejects_malformed_leaves() {
        let mut value = valid_analysis_json();
        value["keyFindings"][0]["category"] = "cosmic".into();
        let raw = value.to_string();
        assert!(!analyze_response(&raw, false).is_fallback());
        assert!(analyze_response(&raw, true).is_fallback());
    }

    #[test]
    fn validated_envelope_has_no_fallback_flag() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let envelope = analyze_response(&valid_analysis_json().to_string(), false)
            .into_envelope(Some("c-1".into()), at);
        assert!(envelope.success);
        assert_eq!(envelope.fallback, None);
        assert_eq!(envelope.contract_id, Some("c-1".into()));
    }

    #[tokio::test]
    async fn analyze_validates_model_reply() {
        let raw = format!("Sure! ```json\n{}\n```", valid_analysis_json());
        let analysis = analyzer(ScriptedGenerator::text(raw))
            .analyze("The parties agree...")
            .await
            .unwrap();
        assert_eq!(analysis.to_value(), valid_analysis_json());
    }

    #[tokio::test]
    async fn fatal_provider_errors_are_returned() {
        let cases = [
            ProviderError::MissingCredential,
            ProviderError::Unauthorized { status: 401 },
            ProviderError::RateLimited {
                retry_after_secs: None,
            },
            ProviderError::Timeout,
        ];
        for case in cases {
            let result = analyzer(ScriptedGenerator::new(vec![Err(case.clone())]))
                .analyze("text")
                .await;
            assert!(result.is_err(), "{case} should be returned as an error");
        }
    }

    #[tokio::test]
    async fn transient_provider_errors_serve_fallback() {
        let generator = ScriptedGenerator::new(vec![Err(ProviderError::Api {
            status: 529,
            body: "overloaded".into(),
        })]);
        let analysis = analyzer(generator).analyze("text").await.unwrap();
        assert!(matches!(
            analysis,
            Analysis::Fallback {
                reason: FallbackReason::Provider(ProviderError::Api { status: 529, .. }),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn retry_policy_is_applied() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Err(ProviderError::Timeout),
            Ok(valid_analysis_json().to_string()),
        ]));
        let analyzer = ContractAnalyzer::new(generator.clone()).with_retry(RetryPolicy {
            max_retries: 1,
            base_delay: std::time::Duration::from_millis(1),
            ..RetryPolicy::default()
        });
        let analysis = analyzer.analyze("text").await.unwrap();
        assert!(!analysis.is_fallback());
        assert_eq!(generator.calls(), 2);
    }
}
