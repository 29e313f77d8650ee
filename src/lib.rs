//! Shared library for catalyst guidance packages.
//!
//! A catalyst is a directory of markdown grouped into six fixed facets plus a
//! `catalyst.yaml` manifest. The crate loads and validates catalysts, merges
//! several of them into one attributed view, renders the merged facets as
//! text, and maintains the small `plan.yaml` that lists which catalysts apply
//! to a plan. The `catalyst` binary is a thin CLI over these functions.
//!
//! Data flows one way: paths → [`load_catalyst`] / [`resolve_catalysts`] →
//! [`Catalyst`]s → [`merge_catalysts`] → [`MergedCatalyst`] → [`render_facet`]
//! and friends.

pub mod catalyst;
pub mod error;
pub mod merge;
pub mod plan;
pub mod render;
pub mod schema;

pub use catalyst::{
    CATALYST_MANIFEST_FILE, Catalyst, CatalystId, CatalystManifest, FACET_CATEGORIES,
    FacetAction, FacetCategory, FacetContent, FacetDeclaration, FacetDeclarations, FacetWarning,
    FacetWarningKind, LoadOptions, LoadReport, LoadedCatalyst, ResolvedCatalysts, load_catalyst,
    reconcile_facet, resolve_catalysts, resolve_path, try_load_catalyst,
};
pub use error::{CatalystError, ErrorKind, Result};
pub use merge::{AttributedContent, Contribution, Contributions, MergedCatalyst, merge_catalysts};
pub use plan::{
    PLAN_MANIFEST_FILE, PlanManifest, PlanUpdate, add_catalyst_to_plan, load_plan_catalysts,
    read_plan_manifest, remove_catalyst_from_plan, update_plan_manifest, write_plan_manifest,
};
pub use render::{
    EMPTY_MERGE_SUMMARY, render_all_facets, render_document, render_facet, summarize_merge,
};
pub use schema::{
    ManifestSchema, SchemaViolation, format_violations, validate_manifest, validate_value,
};

/// Split comma- or whitespace-delimited identifier lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
