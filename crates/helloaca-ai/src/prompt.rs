//! Prompt construction for contract risk analysis.

// ── Prompt templates ──

const ROLE_PREAMBLE: &str = "\
You are an expert contract analyst and legal risk assessor. Review the contract below \
and produce a structured risk analysis covering legal, financial, operational and \
regulatory exposure for the party requesting the review.";

const RESPONSE_SCHEMA: &str = "\
Respond with a single JSON object of exactly this shape:
{
  \"overallRiskLevel\": \"Low Risk\" | \"Medium Risk\" | \"High Risk\",
  \"keyFindings\": [                      // at least one entry
    {
      \"title\": \"short headline\",
      \"description\": \"what the clause says and why it matters\",
      \"severity\": \"high\" | \"medium\" | \"low\",
      \"category\": \"legal\" | \"financial\" | \"operational\" | \"regulatory\"
    }
  ],
  \"recommendations\": [
    {
      \"title\": \"short headline\",
      \"description\": \"concrete action to take\",
      \"priority\": \"high\" | \"medium\" | \"low\",
      \"category\": \"legal\" | \"financial\" | \"operational\" | \"regulatory\"
    }
  ],
  \"missingClauses\": [
    {
      \"clause\": \"name of the missing clause\",
      \"importance\": \"critical\" | \"important\" | \"recommended\",
      \"description\": \"what the clause would cover\",
      \"potentialRisk\": \"exposure created by its absence\"
    }
  ],
  \"sections\": {                         // all eight keys are required
    \"parties\": SECTION,
    \"paymentTerms\": SECTION,
    \"termination\": SECTION,
    \"liability\": SECTION,
    \"intellectualProperty\": SECTION,
    \"confidentiality\": SECTION,
    \"disputeResolution\": SECTION,
    \"governingLaw\": SECTION
  },
  \"riskSummary\": {                      // all four keys are required
    \"legal\": CATEGORY,
    \"financial\": CATEGORY,
    \"operational\": CATEGORY,
    \"regulatory\": CATEGORY
  },
  \"contractMetadata\": {
    \"estimatedValue\": \"total value, or \\\"Not specified\\\"\",
    \"contractDuration\": \"term of the agreement, or \\\"Not specified\\\"\",
    \"partiesInvolved\": [\"party name\"],
    \"industry\": \"industry sector\",
    \"contractType\": \"type of agreement\"
  }
}

where SECTION is:
{
  \"title\": \"section heading\",
  \"content\": \"summary of what the contract says on this topic\",
  \"keyFindings\": [
    { \"finding\": \"observation\", \"riskLevel\": \"high\" | \"medium\" | \"low\", \"recommendation\": \"suggested change\" }
  ]
}

and CATEGORY is:
{
  \"level\": \"high\" | \"medium\" | \"low\",
  \"description\": \"overall assessment for this category\",
  \"keyConcerns\": [\"concern\"],
  \"recommendations\": [\"recommendation\"]
}";

const FORMATTING_RULES: &str = "\
Rules:
1. Respond with raw JSON only. No markdown fences, no commentary before or after the object.
2. Use double quotes for every key and string value.
3. No trailing commas.
4. No null values. Use an empty string or empty array when information is absent.
5. overallRiskLevel must be exactly \"Low Risk\", \"Medium Risk\" or \"High Risk\".
6. keyFindings must contain at least one finding.
7. sections must contain all eight keys, even when the contract is silent on a topic; say so in content.
8. riskSummary must contain all four categories.
9. Escape quotation marks and line breaks inside string values.";

const CLOSING_REMINDER: &str = "\
Remember: return only the JSON object described above, starting with { and ending with }.";

/// Build the full analysis prompt for one contract.
///
/// Pure and deterministic; the contract text is embedded verbatim. Length
/// limits are the caller's responsibility.
pub fn build_analysis_prompt(contract_text: &str) -> String {
    format!(
        "{ROLE_PREAMBLE}\n\
         \n\
         {RESPONSE_SCHEMA}\n\
         \n\
         {FORMATTING_RULES}\n\
         \n\
         Contract text:\n\
         ---BEGIN CONTRACT---\n\
         {contract_text}\n\
         ---END CONTRACT---\n\
         \n\
         {CLOSING_REMINDER}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use helloaca_core::{RISK_CATEGORIES, RISK_LEVELS, SECTION_KEYS};

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(
            build_analysis_prompt("Clause 1."),
            build_analysis_prompt("Clause 1.")
        );
    }

    #[test]
    fn contract_text_is_embedded_verbatim() {
        let text = "The Supplier shall {not} be liable for \"indirect\" loss.\n\n  Indented.";
        let prompt = build_analysis_prompt(text);
        assert!(prompt.contains(&format!("---BEGIN CONTRACT---\n{text}\n---END CONTRACT---")));
    }

    #[test]
    fn parts_appear_in_order() {
        let prompt = build_analysis_prompt("CONTRACT BODY");
        let preamble = prompt.find("expert contract analyst").unwrap();
        let schema = prompt.find("\"overallRiskLevel\"").unwrap();
        let rules = prompt.find("Rules:").unwrap();
        let contract = prompt.find("CONTRACT BODY").unwrap();
        let reminder = prompt.find("Remember:").unwrap();
        assert!(preamble < schema && schema < rules && rules < contract && contract < reminder);
    }

    #[test]
    fn schema_names_every_required_key() {
        let prompt = build_analysis_prompt("x");
        for key in SECTION_KEYS.iter().chain(RISK_CATEGORIES) {
            assert!(prompt.contains(&format!("\"{key}\"")), "prompt lacks {key}");
        }
        for level in RISK_LEVELS {
            assert!(prompt.contains(level), "prompt lacks {level}");
        }
    }

    #[test]
    fn formatting_rules_forbid_fences_commas_and_nulls() {
        let prompt = build_analysis_prompt("x");
        assert!(prompt.contains("No markdown fences"));
        assert!(prompt.contains("No trailing commas"));
        assert!(prompt.contains("No null values"));
    }
}
