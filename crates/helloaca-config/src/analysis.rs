//! Analysis pipeline configuration.

use serde::{Deserialize, Serialize};

const fn default_max_contract_chars() -> usize {
    100_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Longest contract text accepted, in characters.
    #[serde(default = "default_max_contract_chars")]
    pub max_contract_chars: usize,

    /// Also require model output to match the fully-typed schema.
    #[serde(default)]
    pub strict_validation: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_contract_chars: default_max_contract_chars(),
            strict_validation: false,
        }
    }
}
