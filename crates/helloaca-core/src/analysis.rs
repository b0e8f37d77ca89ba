//! Typed contract risk report.
//!
//! Serialises to the camelCase wire format the dashboard consumes. Model
//! output is only deserialised into these types in strict validation mode;
//! the fallback analysis is always built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overall risk rating of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown risk level: {0:?}")]
pub struct UnknownRiskLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    /// Exact match only: `"high risk"` or `"High"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low Risk" => Ok(Self::Low),
            "Medium Risk" => Ok(Self::Medium),
            "High Risk" => Ok(Self::High),
            other => Err(UnknownRiskLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Same scale as [`Severity`], used for recommendations.
pub type Priority = Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Legal,
    Financial,
    Operational,
    Regulatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    Important,
    Recommended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFinding {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingClause {
    pub clause: String,
    pub importance: Importance,
    pub description: String,
    pub potential_risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFinding {
    pub finding: String,
    pub risk_level: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub content: String,
    pub key_findings: Vec<SectionFinding>,
}

/// The eight contract sections every analysis reports on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub parties: Section,
    pub payment_terms: Section,
    pub termination: Section,
    pub liability: Section,
    pub intellectual_property: Section,
    pub confidentiality: Section,
    pub dispute_resolution: Section,
    pub governing_law: Section,
}

impl Sections {
    /// Sections paired with their wire keys, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Section)> {
        [
            ("parties", &self.parties),
            ("paymentTerms", &self.payment_terms),
            ("termination", &self.termination),
            ("liability", &self.liability),
            ("intellectualProperty", &self.intellectual_property),
            ("confidentiality", &self.confidentiality),
            ("disputeResolution", &self.dispute_resolution),
            ("governingLaw", &self.governing_law),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCategorySummary {
    pub level: String,
    pub description: String,
    pub key_concerns: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub legal: RiskCategorySummary,
    pub financial: RiskCategorySummary,
    pub operational: RiskCategorySummary,
    pub regulatory: RiskCategorySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub estimated_value: String,
    pub contract_duration: String,
    pub parties_involved: Vec<String>,
    pub industry: String,
    pub contract_type: String,
}

/// A complete contract risk report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_risk_level: RiskLevel,
    pub key_findings: Vec<KeyFinding>,
    pub recommendations: Vec<Recommendation>,
    pub missing_clauses: Vec<MissingClause>,
    pub sections: Sections,
    pub risk_summary: RiskSummary,
    pub contract_metadata: ContractMetadata,
}

impl AnalysisResult {
    /// Deserialise a fully-typed report out of an untyped JSON tree.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    pub fn to_value(&self) -> serde_json::Value {
        // Every field is a string, list or enum; serialising cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
pub(crate) fn sample_analysis() -> AnalysisResult {
    fn section(title: &str) -> Section {
        Section {
            title: title.into(),
            content: format!("{title} clause reviewed."),
            key_findings: vec![SectionFinding {
                finding: "Standard wording".into(),
                risk_level: "low".into(),
                recommendation: "No change required".into(),
            }],
        }
    }
    fn category(level: &str) -> RiskCategorySummary {
        RiskCategorySummary {
            level: level.into(),
            description: "Within normal bounds".into(),
            key_concerns: vec!["None material".into()],
            recommendations: vec!["Monitor at renewal".into()],
        }
    }

    AnalysisResult {
        overall_risk_level: RiskLevel::Medium,
        key_findings: vec![KeyFinding {
            title: "Uncapped indemnity".into(),
            description: "Supplier indemnity has no monetary cap.".into(),
            severity: Severity::High,
            category: Category::Financial,
        }],
        recommendations: vec![Recommendation {
            title: "Cap indemnity".into(),
            description: "Limit indemnity to 12 months of fees.".into(),
            priority: Severity::High,
            category: Category::Legal,
        }],
        missing_clauses: vec![MissingClause {
            clause: "Force majeure".into(),
            importance: Importance::Important,
            description: "No relief for events outside either party's control.".into(),
            potential_risk: "Liability for unavoidable delays.".into(),
        }],
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
            legal: category("medium"),
            financial: category("high"),
            operational: category("low"),
            regulatory: category("low"),
        },
        contract_metadata: ContractMetadata {
            estimated_value: "$120,000".into(),
            contract_duration: "24 months".into(),
            parties_involved: vec!["Acme Ltd".into(), "Globex Inc".into()],
            industry: "Software".into(),
            contract_type: "Master Services Agreement".into(),
        },
    }
}
