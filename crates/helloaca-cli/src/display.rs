//! Vertical card display for contract analyses.
//!
//! Renders an analysis as a grouped, human-readable card. Works on the raw
//! JSON tree so that validated model output with unexpected leaf shapes
//! still prints; absent or mistyped fields are skipped.

use std::fmt;

use helloaca_core::{RISK_CATEGORIES, SECTION_KEYS};
use serde_json::Value;

const MAX_LIST_ITEMS: usize = 10;

// ── Field groupings ──

const METADATA: &[(&str, &str)] = &[
    ("contractType", "Contract type"),
    ("industry", "Industry"),
    ("estimatedValue", "Estimated value"),
    ("contractDuration", "Duration"),
    ("partiesInvolved", "Parties"),
];

// ── Public API ──

/// A printable analysis card.
pub struct AnalysisCard<'a> {
    analysis: &'a Value,
    fallback: bool,
}

impl<'a> AnalysisCard<'a> {
    pub fn new(analysis: &'a Value, fallback: bool) -> Self {
        Self { analysis, fallback }
    }
}

impl fmt::Display for AnalysisCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.analysis;
        writeln!(f, "=== Contract Analysis ===")?;
        writeln!(f, "Overall risk: {}", text(&a["overallRiskLevel"]))?;
        if self.fallback {
            writeln!(
                f,
                "(fallback result: the analysis service was unavailable)"
            )?;
        }
        writeln!(f)?;

        write_metadata(f, &a["contractMetadata"])?;
        write_key_findings(f, &a["keyFindings"])?;
        write_recommendations(f, &a["recommendations"])?;
        write_missing_clauses(f, &a["missingClauses"])?;
        write_risk_summary(f, &a["riskSummary"])?;
        write_sections(f, &a["sections"])?;
        Ok(())
    }
}

// ── Section rendering ──

fn write_metadata(f: &mut fmt::Formatter<'_>, meta: &Value) -> fmt::Result {
    if !meta.is_object() {
        return Ok(());
    }
    writeln!(f, "Contract")?;
    for &(key, label) in METADATA {
        let value = match &meta[key] {
            Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
            other => text(other).to_string(),
        };
        if !value.is_empty() {
            writeln!(f, "  {label:<18} {value}")?;
        }
    }
    writeln!(f)
}

fn write_key_findings(f: &mut fmt::Formatter<'_>, findings: &Value) -> fmt::Result {
    write_list(f, "Key findings", findings, |f, item| {
        writeln!(
            f,
            "  [{}] {} ({})",
            text(&item["severity"]).to_uppercase(),
            text(&item["title"]),
            text(&item["category"])
        )?;
        write_detail(f, &item["description"])
    })
}

fn write_recommendations(f: &mut fmt::Formatter<'_>, recs: &Value) -> fmt::Result {
    write_list(f, "Recommendations", recs, |f, item| {
        writeln!(
            f,
            "  [{}] {}",
            text(&item["priority"]).to_uppercase(),
            text(&item["title"])
        )?;
        write_detail(f, &item["description"])
    })
}

fn write_missing_clauses(f: &mut fmt::Formatter<'_>, clauses: &Value) -> fmt::Result {
    write_list(f, "Missing clauses", clauses, |f, item| {
        writeln!(
            f,
            "  {} ({})",
            text(&item["clause"]),
            text(&item["importance"])
        )?;
        write_detail(f, &item["potentialRisk"])
    })
}

fn write_risk_summary(f: &mut fmt::Formatter<'_>, summary: &Value) -> fmt::Result {
    if !summary.is_object() {
        return Ok(());
    }
    writeln!(f, "Risk summary")?;
    for &key in RISK_CATEGORIES {
        let entry = &summary[key];
        if entry.is_null() {
            continue;
        }
        writeln!(f, "  {key:<12} {}", text(&entry["level"]))?;
        write_detail(f, &entry["description"])?;
    }
    writeln!(f)
}

fn write_sections(f: &mut fmt::Formatter<'_>, sections: &Value) -> fmt::Result {
    if !sections.is_object() {
        return Ok(());
    }
    writeln!(f, "Sections")?;
    for &key in SECTION_KEYS {
        let section = &sections[key];
        if section.is_null() {
            continue;
        }
        let title = match text(&section["title"]) {
            "" => key,
            title => title,
        };
        let findings = section["keyFindings"].as_array().map_or(0, Vec::len);
        writeln!(f, "  {title} ({findings} findings)")?;
        write_detail(f, &section["content"])?;
    }
    Ok(())
}

// ── Helpers ──

fn write_list(
    f: &mut fmt::Formatter<'_>,
    header: &str,
    list: &Value,
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &Value) -> fmt::Result,
) -> fmt::Result {
    let Some(items) = list.as_array().filter(|items| !items.is_empty()) else {
        return Ok(());
    };
    writeln!(f, "{header}")?;
    for entry in items.iter().take(MAX_LIST_ITEMS) {
        item(f, entry)?;
    }
    if items.len() > MAX_LIST_ITEMS {
        writeln!(f, "    ... and {} more", items.len() - MAX_LIST_ITEMS)?;
    }
    writeln!(f)
}

fn write_detail(f: &mut fmt::Formatter<'_>, detail: &Value) -> fmt::Result {
    match text(detail) {
        "" => Ok(()),
        detail => writeln!(f, "      {detail}"),
    }
}

/// String content of a leaf, or empty for anything else.
fn text(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}
