pub mod analysis;
pub mod contract;
pub mod envelope;
pub mod schema;

pub use analysis::{
    AnalysisResult, Category, ContractMetadata, Importance, KeyFinding, MissingClause, Priority,
    Recommendation, RiskCategorySummary, RiskLevel, RiskSummary, Section, SectionFinding,
    Sections, Severity, UnknownRiskLevel,
};
pub use contract::{ContractTextError, check_contract_text};
pub use envelope::{AnalysisEnvelope, ErrorEnvelope};
pub use schema::{REQUIRED_FIELDS, RISK_CATEGORIES, RISK_LEVELS, SECTION_KEYS};
