//! The session's append-only index of documented entries.

use crate::docs::{DocChunk, RawEntry};
use crate::error::{ExtractError, PackageIdError};
use crate::signature::{QualifiedName, Type, normalize, parse};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identity of one published package version, e.g. `acme/collections/1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId {
    pub owner: String,
    pub project: String,
    pub version: String,
}

impl PackageId {
    pub fn new(
        owner: impl Into<String>,
        project: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            project: project.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.project, self.version)
    }
}

impl FromStr for PackageId {
    type Err = PackageIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [owner, project, version]
                if !owner.is_empty() && !project.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*owner, *project, *version))
            }
            _ => Err(PackageIdError {
                input: s.to_string(),
            }),
        }
    }
}

/// One searchable documented value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedEntry {
    pub package: PackageId,
    /// `home` is the defining module, `name` the entry name.
    pub name: QualifiedName,
    pub raw_signature: String,
    /// Parse of `raw_signature`, or a fallback variable holding it.
    pub parsed: Type,
    /// `parsed` with canonical variable names.
    pub normalized: Type,
    pub doc_text: String,
}

impl IndexedEntry {
    pub fn new(package: PackageId, module: &str, name: &str, raw: &RawEntry) -> Self {
        let parsed = parse(&raw.signature);
        let normalized = normalize(&parsed);
        Self {
            package,
            name: QualifiedName::new(module, name),
            raw_signature: raw.signature.clone(),
            parsed,
            normalized,
            doc_text: raw.comment.clone(),
        }
    }

    /// The signature as the author wrote it, re-rendered from the tree.
    pub fn signature(&self) -> String {
        self.parsed.to_string()
    }
}

/// Local name → defining module, used to hyperlink rendered names.
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    names: AHashMap<String, String>,
}

impl NameDictionary {
    /// Record `name` as defined in `module`. The first definition wins.
    pub fn insert(&mut self, name: &str, module: &str) {
        self.names
            .entry(name.to_string())
            .or_insert_with(|| module.to_string());
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A module's documentation as an ordered chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedModule {
    pub package: PackageId,
    pub name: String,
    pub chunks: Vec<DocChunk>,
}

/// A module that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedModule {
    pub module: String,
    pub error: ExtractError,
}

/// Everything one package contributes to the index, built off-lock and appended
/// in one step.
#[derive(Debug, Clone)]
pub struct PackageBatch {
    pub package: PackageId,
    pub dictionary: NameDictionary,
    pub modules: Vec<IndexedModule>,
    pub entries: Vec<IndexedEntry>,
    pub skipped: Vec<SkippedModule>,
}

/// Per-package lookup tables into the index's flat vectors.
#[derive(Debug, Default)]
struct PackageSlots {
    dictionary: NameDictionary,
    /// module name → position in `SearchIndex::modules`
    modules: AHashMap<String, usize>,
    /// module name → entry name → position in `SearchIndex::entries`
    entries: AHashMap<String, AHashMap<String, usize>>,
}

/// Append-only index over every package loaded in a session.
#[derive(Debug, Default)]
pub struct SearchIndex {
    packages: Vec<PackageId>,
    slots: AHashMap<PackageId, PackageSlots>,
    modules: Vec<IndexedModule>,
    entries: Vec<IndexedEntry>,
    generation: u64,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a whole package. Returns `false` (and changes nothing) if the package
    /// is already present.
    pub fn append(&mut self, batch: PackageBatch) -> bool {
        if self.contains_package(&batch.package) {
            return false;
        }

        let PackageBatch {
            package,
            dictionary,
            modules,
            entries,
            skipped: _,
        } = batch;

        let mut slots = PackageSlots {
            dictionary,
            ..PackageSlots::default()
        };
        for (i, module) in modules.iter().enumerate() {
            slots
                .modules
                .entry(module.name.clone())
                .or_insert(self.modules.len() + i);
        }
        for (i, entry) in entries.iter().enumerate() {
            slots
                .entries
                .entry(entry.name.home.clone())
                .or_default()
                .entry(entry.name.name.clone())
                .or_insert(self.entries.len() + i);
        }

        self.slots.insert(package.clone(), slots);
        self.packages.push(package);
        self.modules.extend(modules);
        self.entries.extend(entries);
        self.generation += 1;
        true
    }

    pub fn contains_package(&self, package: &PackageId) -> bool {
        self.slots.contains_key(package)
    }

    /// Packages in load order.
    pub fn packages(&self) -> &[PackageId] {
        &self.packages
    }

    /// Every entry, in insertion order.
    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn modules(&self) -> &[IndexedModule] {
        &self.modules
    }

    pub fn module(&self, package: &PackageId, name: &str) -> Option<&IndexedModule> {
        let position = *self.slots.get(package)?.modules.get(name)?;
        self.modules.get(position)
    }

    pub fn entry(&self, package: &PackageId, module: &str, name: &str) -> Option<&IndexedEntry> {
        let position = *self.slots.get(package)?.entries.get(module)?.get(name)?;
        self.entries.get(position)
    }

    pub fn dictionary(&self, package: &PackageId) -> Option<&NameDictionary> {
        self.slots.get(package).map(|slots| &slots.dictionary)
    }

    /// Module defining `name` within `package`.
    pub fn resolve(&self, package: &PackageId, name: &str) -> Option<&str> {
        self.dictionary(package)?.resolve(name)
    }

    /// Bumped on every successful append.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
