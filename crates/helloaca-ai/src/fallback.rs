//! Static analysis served when the model reply cannot be used.

use helloaca_core::{
    AnalysisResult, Category, ContractMetadata, KeyFinding, Recommendation, RiskCategorySummary,
    RiskLevel, RiskSummary, Section, Sections, Severity,
};

const UNAVAILABLE: &str = "Automated analysis is temporarily unavailable. Please try again \
    shortly or have this contract reviewed by a qualified professional.";

fn section(title: &str) -> Section {
    Section {
        title: title.to_string(),
        content: format!(
            "{title} could not be analysed because the analysis service is temporarily unavailable."
        ),
        key_findings: Vec::new(),
    }
}

fn category(name: &str) -> RiskCategorySummary {
    RiskCategorySummary {
        level: "medium".to_string(),
        description: format!(
            "{name} risk could not be assessed while the analysis service is unavailable."
        ),
        key_concerns: vec!["Automated review could not be completed".to_string()],
        recommendations: vec!["Retry the analysis or seek professional review".to_string()],
    }
}

/// Build the fallback analysis.
///
/// Built fresh on every call and identical each time. It passes the same
/// structural validation as a model reply.
pub fn fallback_analysis() -> AnalysisResult {
    AnalysisResult {
        overall_risk_level: RiskLevel::Medium,
        key_findings: vec![KeyFinding {
            title: "Analysis Service Temporarily Unavailable".to_string(),
            description: UNAVAILABLE.to_string(),
            severity: Severity::Medium,
            category: Category::Operational,
        }],
        recommendations: vec![
            Recommendation {
                title: "Retry Analysis".to_string(),
                description: "Submit the contract again in a few minutes to receive a full \
                    risk analysis."
                    .to_string(),
                priority: Severity::High,
                category: Category::Operational,
            },
            Recommendation {
                title: "Seek Professional Review".to_string(),
                description: "Have a qualified legal professional review this contract before \
                    signing."
                    .to_string(),
                priority: Severity::Medium,
                category: Category::Legal,
            },
        ],
        missing_clauses: Vec::new(),
        sections: Sections {
            parties: section("Parties"),
            payment_terms: section("Payment Terms"),
            termination: section("Termination"),
            liability: section("Liability"),
            intellectual_property: section("Intellectual Property"),
            confidentiality: section("Confidentiality"),
            dispute_resolution: section("Dispute Resolution"),
            governing_law: section("Governing Law"),
        },
        risk_summary: RiskSummary {
            legal: category("Legal"),
            financial: category("Financial"),
            operational: category("Operational"),
            regulatory: category("Regulatory"),
        },
        contract_metadata: ContractMetadata {
            estimated_value: "Unknown".to_string(),
            contract_duration: "Unknown".to_string(),
            parties_involved: Vec::new(),
            industry: "Unknown".to_string(),
            contract_type: "Unknown".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{validate_strict, validate_structure};

    #[test]
    fn fallback_is_identical_across_calls() {
        let a = serde_json::to_string(&fallback_analysis()).unwrap();
        let b = serde_json::to_string(&fallback_analysis()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_passes_validation() {
        let value = fallback_analysis().to_value();
        validate_structure(&value).expect("fallback must satisfy the shallow checks");
        validate_strict(&value).expect("fallback must satisfy the typed schema");
    }

    #[test]
    fn fallback_says_service_is_unavailable() {
        let analysis = fallback_analysis();
        assert!(analysis.key_findings[0].title.contains("Unavailable"));
        assert!(
            analysis
                .sections
                .iter()
                .all(|(_, s)| s.content.contains("temporarily unavailable"))
        );
    }
}
