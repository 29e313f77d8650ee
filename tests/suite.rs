// Integration suite for catalyst loading, batch resolution, merging, and
// rendering against real directory fixtures.
mod support;

use anyhow::{Context, Result, bail};
use catalyst_kit::{
    CatalystError, CatalystId, ErrorKind, FACET_CATEGORIES, FacetCategory, FacetWarningKind,
    LoadOptions, PlanManifest, load_catalyst, load_plan_catalysts, merge_catalysts,
    render_all_facets, render_facet, resolve_catalysts, summarize_merge, try_load_catalyst,
    write_plan_manifest,
};
use serde_json::Value;
use std::fs;
use support::{Workspace, manifest_yaml};

fn quiet() -> LoadOptions {
    LoadOptions {
        strict: true,
        ..Default::default()
    }
}

fn expect_kind<T: std::fmt::Debug>(
    result: catalyst_kit::Result<T>,
    kind: ErrorKind,
) -> Result<CatalystError> {
    match result {
        Ok(value) => bail!("expected {kind:?}, got {value:?}"),
        Err(err) if err.kind() == kind => Ok(err),
        Err(err) => bail!("expected {kind:?}, got {err}"),
    }
}

// Two markdown files in questions/ load verbatim, in file-name order, with
// base-name filenames and an absolute directory path.
#[test]
fn loads_questions_verbatim() -> Result<()> {
    let ws = Workspace::new()?;
    let exploration = "# Exploration Questions\n\n- What problem are we solving?\n";
    ws.catalyst("discovery", "discovery")?
        .file("questions", "shaping.md", "# Shaping\n")?
        .file("questions", "exploration.md", exploration)?;

    let loaded = load_catalyst(ws.root().join("discovery"), &quiet())?;
    let catalyst = loaded.catalyst;
    let questions = catalyst.facet(FacetCategory::Questions);
    assert_eq!(questions.len(), 2);
    assert!(questions.iter().all(|f| f.filename.ends_with(".md")));
    assert_eq!(questions[0].filename, "exploration.md");
    assert_eq!(questions[0].content, exploration);
    assert!(questions[0].content.contains("Exploration Questions"));
    assert_eq!(questions[1].filename, "shaping.md");

    assert!(catalyst.directory_path.is_absolute());
    assert_eq!(
        catalyst.directory_path,
        fs::canonicalize(ws.root().join("discovery"))?
    );
    assert_eq!(catalyst.id().as_str(), "discovery");
    assert_eq!(
        catalyst.facet_categories().collect::<Vec<_>>(),
        vec![FacetCategory::Questions]
    );
    assert!(loaded.warnings.is_empty());
    Ok(())
}

// Only top-level .md regular files count; other extensions and nested
// directories are ignored, and an all-ignored directory leaves the facet out.
#[test]
fn ignores_non_markdown_and_subdirectories() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("mixed", "mixed")?
        .file("constraints", "limits.md", "stay small")?
        .file("constraints", "notes.txt", "ignored")?
        .file("constraints", "nested/deep.md", "ignored")?
        .file("domain-knowledge", "README", "ignored")?;

    let catalyst = load_catalyst(ws.root().join("mixed"), &quiet())?.catalyst;
    let constraints = catalyst.facet(FacetCategory::Constraints);
    assert_eq!(constraints.len(), 1);
    assert_eq!(constraints[0].filename, "limits.md");
    assert!(!catalyst.facets.contains_key(&FacetCategory::DomainKnowledge));
    assert_eq!(catalyst.content_count(), 1);
    Ok(())
}

// Every facet directory maps to its category.
#[test]
fn loads_all_six_facet_directories() -> Result<()> {
    let ws = Workspace::new()?;
    let fixture = ws.catalyst("full", "@scope/full")?;
    for category in FACET_CATEGORIES {
        fixture.file(category.dir_name(), "item.md", category.as_str())?;
    }

    let catalyst = load_catalyst(&fixture.path, &quiet())?.catalyst;
    for category in FACET_CATEGORIES {
        let files = catalyst.facet(category);
        assert_eq!(files.len(), 1, "{category}");
        assert_eq!(files[0].content, category.as_str());
    }
    Ok(())
}

// Relative paths resolve against the configured base path.
#[test]
fn relative_path_uses_base() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("packs/api", "api")?;
    let options = LoadOptions {
        base_path: Some(ws.root().join("packs")),
        ..quiet()
    };
    let catalyst = load_catalyst("api", &options)?.catalyst;
    assert_eq!(catalyst.id().as_str(), "api");
    Ok(())
}

#[test]
fn nonexistent_directory_is_directory_not_found() -> Result<()> {
    let ws = Workspace::new()?;
    let err = expect_kind(
        load_catalyst(ws.root().join("missing"), &quiet()),
        ErrorKind::DirectoryNotFound,
    )?;
    assert!(err.to_string().contains("missing"));
    Ok(())
}

#[test]
fn directory_without_manifest_is_manifest_missing() -> Result<()> {
    let ws = Workspace::new()?;
    fs::create_dir_all(ws.root().join("bare/questions"))?;
    let err = expect_kind(
        load_catalyst(ws.root().join("bare"), &quiet()),
        ErrorKind::ManifestMissing,
    )?;
    assert!(err.to_string().contains("manifest missing"), "{err}");
    assert!(err.to_string().contains("catalyst.yaml"), "{err}");
    Ok(())
}

// Invalid manifests report every violated field in one message.
#[test]
fn invalid_manifest_lists_every_field() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("broken", "broken")?.manifest(
        "id: \"@invalid//package\"\nname: \"\"\ndescription: ok\nversion: v1.0.0\n",
    )?;
    let err = expect_kind(
        load_catalyst(ws.root().join("broken"), &quiet()),
        ErrorKind::ManifestInvalid,
    )?;
    let CatalystError::ManifestInvalid { message, .. } = &err else {
        bail!("unexpected error shape: {err:?}");
    };
    assert!(message.contains("id: must match pattern"), "{message}");
    assert!(message.contains("name: must not be empty"), "{message}");
    assert!(message.contains("version: must match pattern"), "{message}");
    assert!(!message.contains("description"), "{message}");
    Ok(())
}

#[test]
fn manifest_acceptance_cases() -> Result<()> {
    let ws = Workspace::new()?;
    let fixture = ws.catalyst("cases", "cases")?;

    let accepted = [
        "id: \"@scope/valid-name\"\nname: n\ndescription: d\nversion: 1.0.0\n",
        "id: plain\nname: n\ndescription: d\nversion: 1.0.0-dev.0\n",
    ];
    for yaml in accepted {
        fixture.manifest(yaml)?;
        load_catalyst(&fixture.path, &quiet()).with_context(|| format!("accepting {yaml}"))?;
    }

    let rejected = [
        "id: \"@invalid//package\"\nname: n\ndescription: d\nversion: 1.0.0\n",
        "id: plain\nname: n\ndescription: d\nversion: v1.0.0\n",
        "id: plain\nname: \"\"\ndescription: d\nversion: 1.0.0\n",
        "id: plain\nname: n\ndescription: \"\"\nversion: 1.0.0\n",
        "id: plain\nname: n\ndescription: d\nversion: 1.0.0\nfacets:\n  questions: maybe\n",
    ];
    for yaml in rejected {
        fixture.manifest(yaml)?;
        expect_kind(
            load_catalyst(&fixture.path, &quiet()),
            ErrorKind::ManifestInvalid,
        )
        .with_context(|| format!("rejecting {yaml}"))?;
    }
    Ok(())
}

#[test]
fn malformed_yaml_is_unreadable() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("garbled", "garbled")?
        .manifest("id: [unterminated\n")?;
    expect_kind(
        load_catalyst(ws.root().join("garbled"), &quiet()),
        ErrorKind::ManifestUnreadable,
    )?;
    Ok(())
}

// Declared-but-missing warns by default; declared-false-but-present warns
// only when opted in, and the content still loads.
#[test]
fn facet_mismatches_are_warnings_not_failures() -> Result<()> {
    let ws = Workspace::new()?;
    let fixture = ws.catalyst("declared", "declared")?;
    fixture
        .manifest(&manifest_yaml(
            "declared",
            Some("questions: true\nconstraints: false\nprocessGuidance: true"),
        ))?
        .file("constraints", "extra.md", "surprise")?
        .file("process-guidance", "steps.md", "1. start")?;

    let defaults = load_catalyst(&fixture.path, &LoadOptions::default())?;
    let kinds: Vec<_> = defaults
        .warnings
        .iter()
        .map(|w| (w.category, w.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![(FacetCategory::Questions, FacetWarningKind::DeclaredButMissing)]
    );
    assert_eq!(
        defaults.catalyst.facet(FacetCategory::Constraints)[0].content,
        "surprise"
    );

    let all = LoadOptions {
        warn_on_undeclared_facets: true,
        ..quiet()
    };
    let loaded = load_catalyst(&fixture.path, &all)?;
    let kinds: Vec<_> = loaded
        .warnings
        .iter()
        .map(|w| (w.category, w.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (FacetCategory::Questions, FacetWarningKind::DeclaredButMissing),
            (FacetCategory::Constraints, FacetWarningKind::UndeclaredButFound),
        ]
    );
    assert!(loaded.warnings[0].to_string().contains("declared"));

    let none = LoadOptions {
        warn_on_missing_facets: false,
        ..quiet()
    };
    assert!(load_catalyst(&fixture.path, &none)?.warnings.is_empty());
    Ok(())
}

// An empty declared directory counts as missing.
#[test]
fn empty_declared_directory_warns_as_missing() -> Result<()> {
    let ws = Workspace::new()?;
    let fixture = ws.catalyst("hollow", "hollow")?;
    fixture
        .manifest(&manifest_yaml("hollow", Some("validationRules: true")))?
        .file("validation-rules", "readme.txt", "not markdown")?;
    let loaded = load_catalyst(&fixture.path, &quiet())?;
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].kind, FacetWarningKind::DeclaredButMissing);
    assert!(loaded.catalyst.facets.is_empty());
    Ok(())
}

#[test]
fn try_load_reports_instead_of_failing() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("ok", "ok")?.file("questions", "q.md", "why?")?;

    let good = try_load_catalyst(ws.root().join("ok"), &quiet());
    assert!(good.success);
    assert!(good.error.is_none());
    let value: Value = serde_json::to_value(&good)?;
    assert_eq!(
        value.pointer("/catalyst/manifest/id").and_then(Value::as_str),
        Some("ok")
    );

    let bad = try_load_catalyst(ws.root().join("nope"), &quiet());
    assert!(!bad.success);
    assert!(bad.catalyst.is_none());
    assert_eq!(bad.error_kind, Some(ErrorKind::DirectoryNotFound));
    assert!(bad.error.as_deref().unwrap_or_default().contains("nope"));
    Ok(())
}

// Batch resolution keeps input order and passes absolute identifiers through.
#[test]
fn resolve_catalysts_in_order() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("base", "base")?;
    let other = ws.catalyst("elsewhere/layer", "layer")?;
    let absolute = other.path.to_string_lossy().into_owned();

    let resolved = resolve_catalysts(&["base", absolute.as_str(), "base"], ws.root(), &quiet())?;
    let ids: Vec<&str> = resolved.catalysts.iter().map(|c| c.id().as_str()).collect();
    assert_eq!(ids, vec!["base", "layer", "base"]);
    Ok(())
}

// The first failure aborts the batch and names the identifier.
#[test]
fn resolve_catalysts_fails_atomically() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("ok-path", "ok")?;

    let result = resolve_catalysts(&["ok-path", "/nonexistent"], ws.root(), &quiet());
    let err = expect_kind(result, ErrorKind::BatchLoadFailure)?;
    let CatalystError::BatchLoadFailure { identifier, .. } = &err else {
        bail!("unexpected error shape: {err:?}");
    };
    assert_eq!(identifier, "/nonexistent");
    assert!(err.to_string().contains("/nonexistent"));
    assert_eq!(err.root_cause().kind(), ErrorKind::DirectoryNotFound);

    let empty: [&str; 0] = [];
    assert!(resolve_catalysts(&empty, ws.root(), &quiet())?
        .catalysts
        .is_empty());
    Ok(())
}

// Loaded catalysts merge and render with attribution in input order.
#[test]
fn load_merge_render_end_to_end() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("base", "@team/base")?
        .file("questions", "a.md", "Base A")?
        .file("questions", "b.md", "Base B")?
        .file("constraints", "c.md", "Base constraint")?;
    ws.catalyst("layer", "layer")?
        .file("questions", "z.md", "Layer Z")?;

    let resolved = resolve_catalysts(&["base", "layer"], ws.root(), &quiet())?;
    let merged = merge_catalysts(&resolved.catalysts);

    assert_eq!(
        merged.catalyst_ids,
        vec![CatalystId::from("@team/base"), CatalystId::from("layer")]
    );
    let sources: Vec<&str> = merged
        .facet(FacetCategory::Questions)
        .iter()
        .map(|item| item.source_id.as_str())
        .collect();
    assert_eq!(sources, vec!["@team/base", "@team/base", "layer"]);

    assert_eq!(
        render_facet(&merged, FacetCategory::Questions),
        "From `@team/base`:\nBase A\nBase B\n\nFrom `layer`:\nLayer Z"
    );
    let all = render_all_facets(&merged);
    assert_eq!(all.len(), 6);
    assert_eq!(all[&FacetCategory::OutputTemplates], "");

    let summary = summarize_merge(&merged);
    assert!(summary.starts_with("Merged 2 catalyst(s):"), "{summary}");
    assert!(summary.contains("- @team/base\n  Facets: Questions, Constraints\n  Content items: 3"));
    assert!(summary.contains("- layer\n  Facets: Questions\n  Content items: 1"));
    assert_eq!(summarize_merge(&merge_catalysts(&[])), "No catalysts merged");
    Ok(())
}

// A plan's catalyst list resolves relative to the plan directory.
#[test]
fn plan_catalysts_resolve_from_plan_dir() -> Result<()> {
    let ws = Workspace::new()?;
    ws.catalyst("catalysts/base", "base")?
        .file("domain-knowledge", "glossary.md", "terms")?;
    let plan_dir = ws.root().join("plans/alpha");
    let mut manifest = PlanManifest::new("alpha", "Alpha plan");
    manifest.catalysts = Some(vec!["../../catalysts/base".to_string()]);
    write_plan_manifest(&plan_dir, &manifest)?;

    let resolved = load_plan_catalysts(&plan_dir, &quiet())?;
    assert_eq!(resolved.catalysts.len(), 1);
    assert_eq!(resolved.catalysts[0].id().as_str(), "base");

    let unplanned = ws.root().join("plans/empty");
    fs::create_dir_all(&unplanned)?;
    expect_kind(
        load_plan_catalysts(&unplanned, &quiet()),
        ErrorKind::ManifestMissing,
    )?;
    Ok(())
}
