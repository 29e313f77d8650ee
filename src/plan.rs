//! Plan manifest persistence.
//!
//! A plan directory holds a `plan.yaml` recording which catalysts apply to
//! it, earliest first. A missing manifest is "no manifest yet" and reads as
//! `None`; a present manifest that fails validation is an error.

use crate::catalyst::{LoadOptions, ResolvedCatalysts, resolve_catalysts};
use crate::error::{CatalystError, ErrorKind, Result};
use crate::schema::{
    ManifestSchema, SchemaViolation, format_violations, load_manifest, validate_value,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PLAN_MANIFEST_FILE: &str = "plan.yaml";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlanManifest {
    pub id: String,
    pub title: String,
    /// Catalyst identifiers; earlier entries are the base layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalysts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl PlanManifest {
    /// New manifest stamped with the current UTC time.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            catalysts: None,
            created: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            metadata: None,
        }
    }

    pub fn catalyst_ids(&self) -> &[String] {
        self.catalysts.as_deref().unwrap_or_default()
    }

    /// Violations against the plan schema; empty when valid.
    pub fn validate(&self) -> Vec<SchemaViolation> {
        match serde_json::to_value(self) {
            Ok(value) => validate_value(ManifestSchema::Plan, &value),
            Err(err) => vec![SchemaViolation {
                field: "(root)".to_string(),
                message: err.to_string(),
            }],
        }
    }
}

/// Partial update applied by [`update_plan_manifest`]. Unset fields are kept.
#[derive(Clone, Debug, Default)]
pub struct PlanUpdate {
    pub title: Option<String>,
    pub catalysts: Option<Vec<String>>,
    /// Merged key-wise into the existing metadata.
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Read `plan.yaml` from `plan_dir`.
pub fn read_plan_manifest(plan_dir: &Path) -> Result<Option<PlanManifest>> {
    if !plan_dir.is_dir() {
        return Err(CatalystError::DirectoryNotFound {
            path: plan_dir.to_path_buf(),
        });
    }
    match load_manifest(&plan_dir.join(PLAN_MANIFEST_FILE), ManifestSchema::Plan) {
        Ok(manifest) => Ok(Some(manifest)),
        Err(err) if err.kind() == ErrorKind::ManifestMissing => Ok(None),
        Err(err) => Err(err),
    }
}

/// Validate and write `manifest`, creating `plan_dir` when needed.
pub fn write_plan_manifest(plan_dir: &Path, manifest: &PlanManifest) -> Result<()> {
    let path = plan_dir.join(PLAN_MANIFEST_FILE);
    let violations = manifest.validate();
    if !violations.is_empty() {
        return Err(CatalystError::ManifestInvalid {
            path,
            message: format_violations(&violations),
        });
    }
    fs::create_dir_all(plan_dir).map_err(|err| CatalystError::io("creating", plan_dir, err))?;
    let yaml =
        serde_yaml::to_string(manifest).map_err(|err| CatalystError::ManifestUnreadable {
            path: path.clone(),
            reason: err.to_string(),
        })?;
    fs::write(&path, yaml).map_err(|err| CatalystError::io("writing", &path, err))?;
    tracing::debug!(plan = %manifest.id, path = %path.display(), "wrote plan manifest");
    Ok(())
}

/// Read, apply `update`, and write back.
pub fn update_plan_manifest(plan_dir: &Path, update: PlanUpdate) -> Result<PlanManifest> {
    modify_plan(plan_dir, |manifest| {
        if let Some(title) = update.title {
            manifest.title = title;
        }
        if let Some(catalysts) = update.catalysts {
            manifest.catalysts = Some(catalysts);
        }
        if let Some(metadata) = update.metadata {
            manifest.metadata.get_or_insert_with(BTreeMap::new).extend(metadata);
        }
    })
}

/// Append `catalyst_id` unless the plan already lists it.
pub fn add_catalyst_to_plan(plan_dir: &Path, catalyst_id: &str) -> Result<PlanManifest> {
    modify_plan(plan_dir, |manifest| {
        let catalysts = manifest.catalysts.get_or_insert_with(Vec::new);
        if !catalysts.iter().any(|existing| existing == catalyst_id) {
            catalysts.push(catalyst_id.to_string());
        }
    })
}

/// Drop every occurrence of `catalyst_id` from the plan.
pub fn remove_catalyst_from_plan(plan_dir: &Path, catalyst_id: &str) -> Result<PlanManifest> {
    modify_plan(plan_dir, |manifest| {
        if let Some(catalysts) = manifest.catalysts.as_mut() {
            catalysts.retain(|existing| existing != catalyst_id);
        }
    })
}

/// Load the plan's catalysts, resolving identifiers against the plan directory.
pub fn load_plan_catalysts(plan_dir: &Path, options: &LoadOptions) -> Result<ResolvedCatalysts> {
    let manifest = read_plan_manifest(plan_dir)?.ok_or_else(|| CatalystError::ManifestMissing {
        path: plan_dir.join(PLAN_MANIFEST_FILE),
    })?;
    resolve_catalysts(manifest.catalyst_ids(), plan_dir, options)
}

fn modify_plan(plan_dir: &Path, apply: impl FnOnce(&mut PlanManifest)) -> Result<PlanManifest> {
    let mut manifest = read_plan_manifest(plan_dir)?.ok_or_else(|| {
        CatalystError::ManifestMissing {
            path: plan_dir.join(PLAN_MANIFEST_FILE),
        }
    })?;
    apply(&mut manifest);
    write_plan_manifest(plan_dir, &manifest)?;
    Ok(manifest)
}
