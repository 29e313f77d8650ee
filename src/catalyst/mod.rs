//! Catalyst packages: identity, in-memory model, and directory loading.
//!
//! A catalyst is a directory with a `catalyst.yaml` manifest and up to six
//! facet directories of markdown. `loader` turns a directory into a validated
//! [`Catalyst`]; callers merge several with [`crate::merge`].

pub mod identity;
pub mod loader;
pub mod model;

pub use identity::{CatalystId, FACET_CATEGORIES, FacetCategory};
pub use loader::{
    FacetAction, FacetWarning, FacetWarningKind, LoadOptions, LoadReport, LoadedCatalyst,
    ResolvedCatalysts, load_catalyst, reconcile_facet, resolve_catalysts, resolve_path,
    try_load_catalyst,
};
pub use model::{
    CATALYST_MANIFEST_FILE, Catalyst, CatalystManifest, FACET_FILE_EXTENSION, FacetContent,
    FacetDeclaration, FacetDeclarations,
};
