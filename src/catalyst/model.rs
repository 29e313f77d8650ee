//! In-memory representation of a loaded catalyst.
//!
//! The manifest types mirror `schema/catalyst_manifest.schema.json`; they are
//! only constructed after the raw YAML value has passed validation, so field
//! contents can be trusted downstream.

use crate::catalyst::identity::{CatalystId, FacetCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// File name of the manifest at the catalyst root.
pub const CATALYST_MANIFEST_FILE: &str = "catalyst.yaml";

/// Extension of facet content files.
pub const FACET_FILE_EXTENSION: &str = "md";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Declared identity of a catalyst.
pub struct CatalystManifest {
    pub id: CatalystId,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<FacetDeclarations>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Optional per-category presence flags from the manifest `facets` block.
pub struct FacetDeclarations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_templates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_knowledge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_guidance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<bool>,
}

/// What the manifest says about one category.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FacetDeclaration {
    Present,
    Absent,
    Undeclared,
}

impl FacetDeclarations {
    pub fn flag(&self, category: FacetCategory) -> Option<bool> {
        match category {
            FacetCategory::Questions => self.questions,
            FacetCategory::Constraints => self.constraints,
            FacetCategory::OutputTemplates => self.output_templates,
            FacetCategory::DomainKnowledge => self.domain_knowledge,
            FacetCategory::ProcessGuidance => self.process_guidance,
            FacetCategory::ValidationRules => self.validation_rules,
        }
    }
}

impl CatalystManifest {
    pub fn declaration(&self, category: FacetCategory) -> FacetDeclaration {
        match self.facets.as_ref().and_then(|facets| facets.flag(category)) {
            Some(true) => FacetDeclaration::Present,
            Some(false) => FacetDeclaration::Absent,
            None => FacetDeclaration::Undeclared,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// One markdown file loaded from a facet directory, verbatim.
pub struct FacetContent {
    pub filename: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize)]
/// A fully loaded catalyst. Read-only once the loader returns it.
pub struct Catalyst {
    pub manifest: CatalystManifest,
    /// Only categories with at least one file are present.
    pub facets: BTreeMap<FacetCategory, Vec<FacetContent>>,
    pub directory_path: PathBuf,
}

impl Catalyst {
    pub fn id(&self) -> &CatalystId {
        &self.manifest.id
    }

    /// Files for `category`, empty when the category was not found.
    pub fn facet(&self, category: FacetCategory) -> &[FacetContent] {
        self.facets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories with content, in canonical order.
    pub fn facet_categories(&self) -> impl Iterator<Item = FacetCategory> + '_ {
        self.facets.keys().copied()
    }

    /// Total number of loaded files across all categories.
    pub fn content_count(&self) -> usize {
        self.facets.values().map(Vec::len).sum()
    }
}
