//! Shared test fixtures for integration tests.
//!
//! # Available Fixtures
//!
//! - `core_modules`: raw docs for the `acme/core/1.0.0` sample package
//! - `docs_dump`: the same docs written to a temporary JSON file
//!
//! Use [`loaded_session`] for a fresh [`SearchSession`] with the sample package
//! already indexed.

use rstest::fixture;
use sigsearch::{PackageId, RawModuleDocs, SearchSession};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CORE_PACKAGE: &str = "acme/core/1.0.0";

pub const CORE_DOCS: &str = r#"[
  {
    "name": "Basics",
    "comment": "Basic arithmetic and conversions.\n@docs negate, toString\n\n# Identity\n@docs identity",
    "entries": {
      "negate": { "type": "Int -> Int", "comment": "Negate a number." },
      "toString": { "type": "Int -> String", "comment": "Render an integer." },
      "identity": { "type": "a -> a", "comment": "Return the argument unchanged." }
    }
  },
  {
    "name": "List",
    "comment": "Working with lists.\n@docs map, filterMap, sum, head",
    "entries": {
      "map": { "type": "(a -> b) -> List a -> List b", "comment": "Apply a function to every element." },
      "filterMap": { "type": "(a -> Maybe b) -> List a -> List b", "comment": "Map and keep the successes." },
      "sum": { "type": "List number -> number", "comment": "Add all the numbers." },
      "head": { "type": "List a -> Maybe a", "comment": "The first element, if any." }
    }
  },
  {
    "name": "Broken",
    "comment": "Refers to something undocumented.\n@docs missing",
    "entries": {}
  }
]"#;

pub fn core_package() -> PackageId {
    CORE_PACKAGE.parse().unwrap()
}

/// A second package with one module, for multi-package tests.
#[allow(dead_code)] // Used by a subset of integration test crates
pub fn extra_package(project: &str) -> (PackageId, Vec<RawModuleDocs>) {
    let json = format!(
        r#"[{{
            "name": "{project}",
            "comment": "Extras.\n@docs wrap, unwrap",
            "entries": {{
                "wrap": {{ "type": "a -> Box a" }},
                "unwrap": {{ "type": "Box a -> a" }}
            }}
        }}]"#
    );
    (
        PackageId::new("acme", project, "1.0.0"),
        serde_json::from_str(&json).unwrap(),
    )
}

#[fixture]
pub fn core_modules() -> Vec<RawModuleDocs> {
    serde_json::from_str(CORE_DOCS).unwrap()
}

/// The sample docs written to disk, removed when dropped.
pub struct DocsDump {
    _temp: TempDir,
    path: PathBuf,
}

impl DocsDump {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[fixture]
pub fn docs_dump() -> DocsDump {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("core.json");
    std::fs::write(&path, CORE_DOCS).unwrap();
    DocsDump { _temp: temp, path }
}

/// A fresh session with the sample package indexed.
#[allow(dead_code)] // Used by a subset of integration test crates
pub async fn loaded_session() -> SearchSession {
    let session = SearchSession::default();
    let modules: Vec<RawModuleDocs> = serde_json::from_str(CORE_DOCS).unwrap();
    session.load_package(core_package(), modules).await.unwrap();
    session
}
