//! Raw module documentation and its conversion into index batches.

mod chunks;
mod package;

pub use chunks::{DOCS_MARKER, EntryLookup, extract_chunks};
pub use package::index_package;

use crate::error::LoadError;
use crate::search::PackageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One documented value as delivered by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(alias = "type")]
    pub signature: String,
    #[serde(default)]
    pub comment: String,
}

/// A module's documentation comment plus its documented entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawModuleDocs {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub entries: BTreeMap<String, RawEntry>,
}

/// One ordered unit of a module's documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocChunk {
    Prose { text: String },
    NamedEntry { name: String, package: PackageId },
}

/// Read a JSON array of [`RawModuleDocs`] from a local dump.
pub async fn read_docs_file(
    package: &PackageId,
    path: &Path,
) -> Result<Vec<RawModuleDocs>, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound {
                package: package.to_string(),
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                package: package.to_string(),
                path: path.to_path_buf(),
                source,
            },
        })?;

    serde_json::from_str(&content).map_err(|e| LoadError::Malformed {
        package: package.to_string(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_raw_docs_accept_type_alias() {
        let json = r#"[{
            "name": "Maybe",
            "comment": "Optional values.\n@docs withDefault",
            "entries": { "withDefault": { "type": "a -> Maybe a -> a" } }
        }]"#;
        let modules: Vec<RawModuleDocs> = serde_json::from_str(json).unwrap();
        check!(modules[0].entries["withDefault"].signature == "a -> Maybe a -> a");
        check!(modules[0].entries["withDefault"].comment.is_empty());
    }

    #[tokio::test]
    async fn test_read_docs_file_errors() {
        let package = PackageId::new("acme", "core", "1.0.0");
        let dir = tempfile::tempdir().unwrap();

        let missing = read_docs_file(&package, &dir.path().join("missing.json")).await;
        check!(let Err(LoadError::NotFound { .. }) = missing);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        check!(let Err(LoadError::Malformed { .. }) = read_docs_file(&package, &broken).await);
    }

    #[tokio::test]
    async fn test_read_errors_keep_their_cause() {
        let package = PackageId::new("acme", "core", "1.0.0");
        let dir = tempfile::tempdir().unwrap();

        let binary = dir.path().join("binary.json");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        let result = read_docs_file(&package, &binary).await;
        check!(let Err(LoadError::Io { .. }) = &result);
        if let Err(LoadError::Io { source, .. }) = result {
            check!(source.kind() == std::io::ErrorKind::InvalidData);
        }

        check!(let Err(LoadError::Io { .. }) = read_docs_file(&package, dir.path()).await);
    }
}
