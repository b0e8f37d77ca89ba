//! Field names of the contract analysis wire format.
//!
//! The validator walks a raw `serde_json::Value`, so the key sets live here as
//! plain string tables rather than being derived from the typed structs.

/// Top-level keys every analysis must carry, in the order they are checked.
pub const REQUIRED_FIELDS: &[&str] = &[
    "overallRiskLevel",
    "keyFindings",
    "recommendations",
    "missingClauses",
    "sections",
    "riskSummary",
    "contractMetadata",
];

/// Contract sections reported under `sections`.
pub const SECTION_KEYS: &[&str] = &[
    "parties",
    "paymentTerms",
    "termination",
    "liability",
    "intellectualProperty",
    "confidentiality",
    "disputeResolution",
    "governingLaw",
];

/// Risk categories reported under `riskSummary`.
pub const RISK_CATEGORIES: &[&str] = &["legal", "financial", "operational", "regulatory"];

/// Permitted values of `overallRiskLevel`.
pub const RISK_LEVELS: &[&str] = &["Low Risk", "Medium Risk", "High Risk"];
