use serde::{Deserialize, Serialize};
use std::fmt;

/// Package-style identifier declared in a catalyst manifest (e.g. `@acme/api-design`).
///
/// Merged content is attributed to this value, so it is kept verbatim from
/// the manifest rather than normalized.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalystId(pub String);

impl CatalystId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalystId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CatalystId {
    fn from(value: &str) -> Self {
        CatalystId(value.to_string())
    }
}

/// One of the six content categories a catalyst can provide.
///
/// The set is closed: there is no `Other` variant, so every match over
/// categories in the merger and renderer is exhaustive. Declaration order is
/// the canonical scan and render order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetCategory {
    Questions,
    Constraints,
    OutputTemplates,
    DomainKnowledge,
    ProcessGuidance,
    ValidationRules,
}

/// All categories in canonical order.
pub const FACET_CATEGORIES: [FacetCategory; 6] = [
    FacetCategory::Questions,
    FacetCategory::Constraints,
    FacetCategory::OutputTemplates,
    FacetCategory::DomainKnowledge,
    FacetCategory::ProcessGuidance,
    FacetCategory::ValidationRules,
];

impl FacetCategory {
    /// Logical name, as used for manifest `facets` keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetCategory::Questions => "questions",
            FacetCategory::Constraints => "constraints",
            FacetCategory::OutputTemplates => "outputTemplates",
            FacetCategory::DomainKnowledge => "domainKnowledge",
            FacetCategory::ProcessGuidance => "processGuidance",
            FacetCategory::ValidationRules => "validationRules",
        }
    }

    /// Directory name under the catalyst root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            FacetCategory::Questions => "questions",
            FacetCategory::Constraints => "constraints",
            FacetCategory::OutputTemplates => "output-templates",
            FacetCategory::DomainKnowledge => "domain-knowledge",
            FacetCategory::ProcessGuidance => "process-guidance",
            FacetCategory::ValidationRules => "validation-rules",
        }
    }

    /// Title-cased label for summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            FacetCategory::Questions => "Questions",
            FacetCategory::Constraints => "Constraints",
            FacetCategory::OutputTemplates => "Output Templates",
            FacetCategory::DomainKnowledge => "Domain Knowledge",
            FacetCategory::ProcessGuidance => "Process Guidance",
            FacetCategory::ValidationRules => "Validation Rules",
        }
    }

    /// Parse either the logical name or the directory name.
    pub fn parse(value: &str) -> Option<Self> {
        FACET_CATEGORIES
            .into_iter()
            .find(|category| category.as_str() == value || category.dir_name() == value)
    }
}

impl fmt::Display for FacetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
