use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding one or more catalyst fixtures.
pub struct Workspace {
    temp: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("failed to allocate temp dir")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Start a catalyst directory at `<root>/<dir>` with a valid manifest.
    pub fn catalyst(&self, dir: &str, id: &str) -> Result<CatalystFixture> {
        let path = self.root().join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("creating fixture {}", path.display()))?;
        let fixture = CatalystFixture { path };
        fixture.manifest(&manifest_yaml(id, None))?;
        Ok(fixture)
    }
}

pub struct CatalystFixture {
    pub path: PathBuf,
}

impl CatalystFixture {
    /// Replace `catalyst.yaml` with `yaml`.
    pub fn manifest(&self, yaml: &str) -> Result<&Self> {
        write(&self.path.join("catalyst.yaml"), yaml)?;
        Ok(self)
    }

    /// Write `<facet_dir>/<name>` with `content`.
    pub fn file(&self, facet_dir: &str, name: &str, content: &str) -> Result<&Self> {
        write(&self.path.join(facet_dir).join(name), content)?;
        Ok(self)
    }
}

/// Minimal valid manifest, optionally with a `facets:` block body.
pub fn manifest_yaml(id: &str, facets: Option<&str>) -> String {
    let mut yaml = format!(
        "id: \"{id}\"\nname: \"{id} catalyst\"\ndescription: \"Fixture catalyst {id}\"\nversion: 1.0.0\n"
    );
    if let Some(facets) = facets {
        yaml.push_str("facets:\n");
        for line in facets.lines() {
            yaml.push_str("  ");
            yaml.push_str(line.trim());
            yaml.push('\n');
        }
    }
    yaml
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
