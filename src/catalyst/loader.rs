//! Catalyst discovery and loading.
//!
//! A catalyst directory holds a `catalyst.yaml` manifest plus up to six facet
//! directories of markdown files. Loading validates the manifest, scans each
//! facet directory in canonical order, and reconciles what the manifest
//! declared against what is on disk. Mismatches never fail a load; they come
//! back as [`FacetWarning`] values and are additionally logged unless the
//! caller asked for strict mode.

use crate::catalyst::identity::{CatalystId, FACET_CATEGORIES, FacetCategory};
use crate::catalyst::model::{
    CATALYST_MANIFEST_FILE, Catalyst, CatalystManifest, FACET_FILE_EXTENSION, FacetContent,
    FacetDeclaration,
};
use crate::error::{CatalystError, ErrorKind, Result};
use crate::schema::{ManifestSchema, load_manifest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Caller-controlled knobs for a load.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Suppress the logged copy of facet warnings. Warnings are still returned.
    pub strict: bool,
    /// Warn when a facet is declared `true` but has no content on disk.
    pub warn_on_missing_facets: bool,
    /// Warn when a facet is declared `false` but content was found.
    pub warn_on_undeclared_facets: bool,
    /// Base for relative paths; the current directory when unset.
    pub base_path: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict: false,
            warn_on_missing_facets: true,
            warn_on_undeclared_facets: false,
            base_path: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetWarningKind {
    /// Declared `true`, but the directory is missing or holds no markdown.
    DeclaredButMissing,
    /// Declared `false`, but markdown files were found and loaded.
    UndeclaredButFound,
}

/// Non-fatal disagreement between the manifest and the directory contents.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FacetWarning {
    pub catalyst_id: CatalystId,
    pub category: FacetCategory,
    pub kind: FacetWarningKind,
    pub directory: PathBuf,
}

impl fmt::Display for FacetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FacetWarningKind::DeclaredButMissing => write!(
                f,
                "catalyst '{}' declares facet '{}' but {} has no .{} files",
                self.catalyst_id,
                self.category,
                self.directory.display(),
                FACET_FILE_EXTENSION
            ),
            FacetWarningKind::UndeclaredButFound => write!(
                f,
                "catalyst '{}' declares facet '{}' absent but {} contains content",
                self.catalyst_id,
                self.category,
                self.directory.display()
            ),
        }
    }
}

/// Outcome of reconciling one category.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FacetAction {
    Load,
    LoadAndWarn,
    Skip,
    SkipAndWarn,
}

impl FacetAction {
    fn loads(self) -> bool {
        matches!(self, FacetAction::Load | FacetAction::LoadAndWarn)
    }

    fn warns(self) -> bool {
        matches!(self, FacetAction::LoadAndWarn | FacetAction::SkipAndWarn)
    }
}

/// Declaration × discovery → action. Content found on disk is always loaded.
pub fn reconcile_facet(
    declaration: FacetDeclaration,
    found: bool,
    options: &LoadOptions,
) -> FacetAction {
    match (declaration, found) {
        (FacetDeclaration::Present, true) => FacetAction::Load,
        (FacetDeclaration::Present, false) if options.warn_on_missing_facets => {
            FacetAction::SkipAndWarn
        }
        (FacetDeclaration::Present, false) => FacetAction::Skip,
        (FacetDeclaration::Absent, true) if options.warn_on_undeclared_facets => {
            FacetAction::LoadAndWarn
        }
        (FacetDeclaration::Absent, true) => FacetAction::Load,
        (FacetDeclaration::Absent, false) => FacetAction::Skip,
        (FacetDeclaration::Undeclared, true) => FacetAction::Load,
        (FacetDeclaration::Undeclared, false) => FacetAction::Skip,
    }
}

/// A catalyst plus the warnings produced while loading it.
#[derive(Clone, Debug)]
pub struct LoadedCatalyst {
    pub catalyst: Catalyst,
    pub warnings: Vec<FacetWarning>,
}

/// Non-throwing load outcome, serializable for tooling.
#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalyst: Option<Catalyst>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FacetWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
}

/// Catalysts resolved from a batch of identifiers, in input order.
#[derive(Clone, Debug, Default)]
pub struct ResolvedCatalysts {
    pub catalysts: Vec<Catalyst>,
    pub warnings: Vec<FacetWarning>,
}

/// Load one catalyst directory.
///
/// Fails with `DirectoryNotFound`, `ManifestMissing`, or `ManifestInvalid`;
/// facet mismatches only produce warnings.
pub fn load_catalyst(path: impl AsRef<Path>, options: &LoadOptions) -> Result<LoadedCatalyst> {
    let requested = resolve_path(path.as_ref(), options.base_path.as_deref())?;
    if !requested.is_dir() {
        return Err(CatalystError::DirectoryNotFound { path: requested });
    }
    let directory = fs::canonicalize(&requested)
        .map_err(|err| CatalystError::io("canonicalizing", &requested, err))?;

    let manifest: CatalystManifest = load_manifest(
        &directory.join(CATALYST_MANIFEST_FILE),
        ManifestSchema::Catalyst,
    )?;

    let mut facets = BTreeMap::new();
    let mut warnings = Vec::new();
    for category in FACET_CATEGORIES {
        let facet_dir = directory.join(category.dir_name());
        let files = read_facet_files(&facet_dir)?;
        let action = reconcile_facet(manifest.declaration(category), !files.is_empty(), options);

        if action.warns() {
            let kind = if action.loads() {
                FacetWarningKind::UndeclaredButFound
            } else {
                FacetWarningKind::DeclaredButMissing
            };
            warnings.push(FacetWarning {
                catalyst_id: manifest.id.clone(),
                category,
                kind,
                directory: facet_dir,
            });
        }
        if action.loads() {
            tracing::debug!(
                catalyst = %manifest.id,
                facet = %category,
                files = files.len(),
                "loaded facet"
            );
            facets.insert(category, files);
        }
    }

    if !options.strict {
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
    }

    Ok(LoadedCatalyst {
        catalyst: Catalyst {
            manifest,
            facets,
            directory_path: directory,
        },
        warnings,
    })
}

/// Like [`load_catalyst`], but folds failures into the report.
pub fn try_load_catalyst(path: impl AsRef<Path>, options: &LoadOptions) -> LoadReport {
    match load_catalyst(path, options) {
        Ok(loaded) => LoadReport {
            success: true,
            catalyst: Some(loaded.catalyst),
            warnings: loaded.warnings,
            error: None,
            error_kind: None,
        },
        Err(err) => LoadReport {
            success: false,
            catalyst: None,
            warnings: Vec::new(),
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        },
    }
}

/// Load every identifier as a local path relative to `base_path`, in order.
///
/// The first failure aborts the batch with `BatchLoadFailure` naming the
/// identifier; no partial list is returned.
pub fn resolve_catalysts<S: AsRef<str>>(
    identifiers: &[S],
    base_path: &Path,
    options: &LoadOptions,
) -> Result<ResolvedCatalysts> {
    let batch_options = LoadOptions {
        base_path: Some(base_path.to_path_buf()),
        ..options.clone()
    };
    let mut resolved = ResolvedCatalysts::default();
    for identifier in identifiers {
        let identifier = identifier.as_ref();
        tracing::debug!(identifier, base = %base_path.display(), "resolving catalyst");
        let loaded = load_catalyst(Path::new(identifier), &batch_options).map_err(|err| {
            CatalystError::BatchLoadFailure {
                identifier: identifier.to_string(),
                source: Box::new(err),
            }
        })?;
        resolved.catalysts.push(loaded.catalyst);
        resolved.warnings.extend(loaded.warnings);
    }
    Ok(resolved)
}

/// Absolute form of `path`; relative paths join onto `base` or the cwd.
pub fn resolve_path(path: &Path, base: Option<&Path>) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let base = match base {
        Some(base) if base.is_absolute() => base.to_path_buf(),
        Some(base) => current_dir()?.join(base),
        None => current_dir()?,
    };
    Ok(base.join(path))
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|err| CatalystError::io("reading current directory", ".", err))
}

/// Markdown files directly inside `dir`, ordered by file name.
///
/// A missing directory yields an empty list. Subdirectories and other
/// extensions are ignored.
fn read_facet_files(dir: &Path) -> Result<Vec<FacetContent>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let suffix = format!(".{FACET_FILE_EXTENSION}");
    let mut entries_found = Vec::new();
    let entries = fs::read_dir(dir).map_err(|err| CatalystError::io("listing", dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| CatalystError::io("listing", dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // Suffix match, so a bare `.md` counts too.
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !filename.ends_with(&suffix) {
            continue;
        }
        entries_found.push((filename.to_string(), path));
    }
    entries_found.sort();

    let mut files = Vec::with_capacity(entries_found.len());
    for (filename, path) in entries_found {
        let content =
            fs::read_to_string(&path).map_err(|err| CatalystError::io("reading", &path, err))?;
        files.push(FacetContent { filename, content });
    }
    Ok(files)
}
