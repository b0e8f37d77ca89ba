//! JSON envelopes returned by the analysis endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AnalysisResult;

/// Response body for a completed analysis request.
///
/// Both the validated and the degraded path report `success: true`; only the
/// `fallback` flag tells a consumer that the analysis is the static
/// substitute. Clients must check `fallback` rather than `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEnvelope {
    pub success: bool,
    pub analysis: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<Value>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

impl AnalysisEnvelope {
    /// Wrap a model analysis that passed validation. `analysis` is served as-is.
    pub fn validated(analysis: Value, contract_id: Option<Value>, at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            analysis,
            contract_id: contract_id.filter(|id| !id.is_null()),
            timestamp: format_timestamp(at),
            fallback: None,
        }
    }

    /// Wrap the fallback analysis. The contract id is not echoed on this path.
    pub fn degraded(analysis: &AnalysisResult, at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            analysis: analysis.to_value(),
            contract_id: None,
            timestamp: format_timestamp(at),
            fallback: Some(true),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.unwrap_or(false)
    }
}

/// Response body for requests rejected before or during the model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// ISO 8601 with millisecond precision and a `Z` suffix.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sample_analysis;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn validated_envelope_echoes_contract_id_and_omits_fallback() {
        let env = AnalysisEnvelope::validated(json!({"k": 1}), Some(json!("c-42")), fixed_time());
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "analysis": {"k": 1},
                "contractId": "c-42",
                "timestamp": "2026-03-14T09:30:00.000Z"
            })
        );
        assert!(!env.is_fallback());
    }

    #[test]
    fn null_contract_id_is_dropped() {
        let env = AnalysisEnvelope::validated(json!({}), Some(Value::Null), fixed_time());
        assert!(env.contract_id.is_none());
    }

    #[test]
    fn degraded_envelope_is_still_success() {
        let env = AnalysisEnvelope::degraded(&sample_analysis(), fixed_time());
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["fallback"], true);
        assert!(value.get("contractId").is_none());
        assert_eq!(value["analysis"]["overallRiskLevel"], "Medium Risk");
        assert!(env.is_fallback());
    }

    #[test]
    fn error_envelope_shape() {
        let value = serde_json::to_value(ErrorEnvelope::new("Contract text is required")).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "error": "Contract text is required"})
        );
    }
}
