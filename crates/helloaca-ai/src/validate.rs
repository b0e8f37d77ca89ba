//! Structural validation of parsed model output.
//!
//! The default check is shallow: top-level keys, the overall risk level, a
//! non-empty `keyFindings` list and the key sets of `sections` and
//! `riskSummary`. Leaf shapes inside lists and sections are trusted.
//! [`validate_strict`] additionally requires the fully-typed schema.

use helloaca_core::{
    AnalysisResult, REQUIRED_FIELDS, RISK_CATEGORIES, RiskLevel, SECTION_KEYS, UnknownRiskLevel,
};
use serde_json::Value;

use crate::ValidationError;

/// Run the five shallow checks in order, stopping at the first failure.
pub fn validate_structure(value: &Value) -> Result<(), ValidationError> {
    // 1. Required top-level keys. A JSON null counts as absent.
    for &field in REQUIRED_FIELDS {
        if value.get(field).is_none_or(Value::is_null) {
            return Err(ValidationError::MissingField(field));
        }
    }

    // 2. Overall risk level.
    let level = &value["overallRiskLevel"];
    match level.as_str() {
        Some(s) => {
            s.parse::<RiskLevel>()
                .map_err(|UnknownRiskLevel(s)| ValidationError::InvalidRiskLevel(s))?;
        }
        None => return Err(ValidationError::InvalidRiskLevel(level.to_string())),
    }

    // 3. At least one key finding.
    if !value["keyFindings"]
        .as_array()
        .is_some_and(|findings| !findings.is_empty())
    {
        return Err(ValidationError::EmptyKeyFindings);
    }

    // 4. Every section key.
    let sections = &value["sections"];
    for &key in SECTION_KEYS {
        if sections.get(key).is_none() {
            return Err(ValidationError::MissingSection(key));
        }
    }

    // 5. Every risk category.
    let summary = value["riskSummary"]
        .as_object()
        .ok_or(ValidationError::RiskSummaryNotObject)?;
    for &key in RISK_CATEGORIES {
        if !summary.contains_key(key) {
            return Err(ValidationError::MissingRiskCategory(key));
        }
    }

    Ok(())
}

/// Shallow checks followed by a full typed decode.
pub fn validate_strict(value: &Value) -> Result<(), ValidationError> {
    validate_structure(value)?;
    AnalysisResult::from_value(value)
        .map(|_| ())
        .map_err(|e| ValidationError::Schema(e.to_string()))
}

#[cfg(test)]
pub(crate) fn valid_analysis_json() -> Value {
    let section = |title: &str| {
        serde_json::json!({
            "title": title,
            "content": format!("{title} reviewed"),
            "keyFindings": [
                {"finding": "Standard terms", "riskLevel": "low", "recommendation": "None"}
            ]
        })
    };
    let category = serde_json::json!({
        "level": "low",
        "description": "No material concerns",
        "keyConcerns": [],
        "recommendations": []
    });
    serde_json::json!({
        "overallRiskLevel": "Low Risk",
        "keyFindings": [{
            "title": "Auto-renewal",
            "description": "Renews annually unless cancelled 60 days ahead.",
            "severity": "medium",
            "category": "operational"
        }],
        "recommendations": [{
            "title": "Calendar the notice date",
            "description": "Track the cancellation window.",
            "priority": "medium",
            "category": "operational"
        }],
        "missingClauses": [],
        "sections": {
            "parties": section("Parties"),
            "paymentTerms": section("Payment Terms"),
            "termination": section("Termination"),
            "liability": section("Liability"),
            "intellectualProperty": section("Intellectual Property"),
            "confidentiality": section("Confidentiality"),
            "disputeResolution": section("Dispute Resolution"),
            "governingLaw": section("Governing Law")
        },
        "riskSummary": {
            "legal": category.clone(),
            "financial": category.clone(),
            "operational": category.clone(),
            "regulatory": category
        },
        "contractMetadata": {
            "estimatedValue": "$10,000",
            "contractDuration": "12 months",
            "partiesInvolved": ["Acme Ltd", "Initech LLC"],
            "industry": "Software",
            "contractType": "SaaS Subscription"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn complete_analysis_passes() {
        validate_structure(&valid_analysis_json()).expect("should validate");
    }

    #[test]
    fn missing_risk_summary_is_rejected() {
        let mut value = valid_analysis_json();
        value.as_object_mut().unwrap().remove("riskSummary");
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::MissingField("riskSummary"))
        );
    }

    #[test]
    fn null_field_counts_as_missing() {
        let mut value = valid_analysis_json();
        value["contractMetadata"] = Value::Null;
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::MissingField("contractMetadata"))
        );
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut value = valid_analysis_json();
        let obj = value.as_object_mut().unwrap();
        obj.remove("recommendations");
        obj.remove("contractMetadata");
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::MissingField("recommendations"))
        );
    }

    #[test]
    fn unknown_risk_level_is_rejected() {
        let mut value = valid_analysis_json();
        value["overallRiskLevel"] = "Severe".into();
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::InvalidRiskLevel("Severe".into()))
        );
    }

    #[test]
    fn risk_level_match_is_case_sensitive() {
        let mut value = valid_analysis_json();
        value["overallRiskLevel"] = "high risk".into();
        assert!(matches!(
            validate_structure(&value),
            Err(ValidationError::InvalidRiskLevel(_))
        ));
    }

    #[test]
    fn non_string_risk_level_is_rejected() {
        let mut value = valid_analysis_json();
        value["overallRiskLevel"] = 3.into();
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::InvalidRiskLevel("3".into()))
        );
    }

    #[test]
    fn empty_key_findings_is_rejected() {
        let mut value = valid_analysis_json();
        value["keyFindings"] = serde_json::json!([]);
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::EmptyKeyFindings)
        );
    }

    #[test]
    fn key_findings_object_is_rejected() {
        let mut value = valid_analysis_json();
        value["keyFindings"] = serde_json::json!({"title": "not a list"});
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::EmptyKeyFindings)
        );
    }

    #[test]
    fn missing_section_is_rejected() {
        let mut value = valid_analysis_json();
        value["sections"]
            .as_object_mut()
            .unwrap()
            .remove("governingLaw");
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::MissingSection("governingLaw"))
        );
    }

    #[test]
    fn sections_as_list_is_rejected() {
        let mut value = valid_analysis_json();
        value["sections"] = serde_json::json!(["parties"]);
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::MissingSection("parties"))
        );
    }

    #[test]
    fn risk_summary_must_be_an_object() {
        let mut value = valid_analysis_json();
        value["riskSummary"] = "all fine".into();
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::RiskSummaryNotObject)
        );
    }

    #[test]
    fn missing_risk_category_is_rejected() {
        let mut value = valid_analysis_json();
        value["riskSummary"]
            .as_object_mut()
            .unwrap()
            .remove("regulatory");
        assert_eq!(
            validate_structure(&value),
            Err(ValidationError::MissingRiskCategory("regulatory"))
        );
    }

    #[test]
    fn shallow_check_ignores_malformed_leaves() {
        let mut value = valid_analysis_json();
        value["keyFindings"][0]
            .as_object_mut()
            .unwrap()
            .remove("severity");
        validate_structure(&value).expect("leaf shapes are not checked");
        assert!(matches!(
            validate_strict(&value),
            Err(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn strict_accepts_fully_typed_analysis() {
        validate_strict(&valid_analysis_json()).expect("should validate strictly");
    }
}
