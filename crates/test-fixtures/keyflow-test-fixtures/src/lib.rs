//! Shared JSON fixtures for keyflow tests and benches.
//!
//! `fixtures/manifest.json` maps fixture names to files under `fixtures/`:
//! animation documents, and golden samples recorded against a document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    documents: BTreeMap<String, String>,
    #[serde(default)]
    goldens: BTreeMap<String, GoldenEntry>,
}

#[derive(Debug, Deserialize)]
struct GoldenEntry {
    document: String,
    samples: String,
}

/// One recorded evaluation: entity name, query time and expected output
/// components.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GoldenSample {
    pub entity: String,
    pub time: f32,
    pub expected: Vec<f32>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a BTreeMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod documents {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.documents.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod goldens {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.goldens.keys().cloned().collect()
    }

    /// Document JSON the golden samples were recorded against.
    pub fn document_json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.goldens, "golden", name)?;
        super::documents::json(&entry.document)
    }

    pub fn samples(name: &str) -> Result<Vec<GoldenSample>> {
        let entry = lookup(&MANIFEST.goldens, "golden", name)?;
        super::load_json(&entry.samples)
    }
}
