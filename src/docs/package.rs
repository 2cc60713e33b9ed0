//! Building a [`PackageBatch`] from raw module docs.

use super::{DocChunk, RawModuleDocs, extract_chunks};
use crate::search::{
    IndexedEntry, IndexedModule, NameDictionary, PackageBatch, PackageId, SkippedModule,
};
use std::collections::HashSet;

/// Extract chunks and parse every signature of a package.
///
/// Entries are ordered as the module documents them; entries the comment never
/// lists follow in name order. A module whose `@docs` list names a missing entry is
/// skipped whole and reported in [`PackageBatch::skipped`].
pub fn index_package(package: PackageId, modules: Vec<RawModuleDocs>) -> PackageBatch {
    let start = std::time::Instant::now();
    let mut batch = PackageBatch {
        package,
        dictionary: NameDictionary::default(),
        modules: Vec::with_capacity(modules.len()),
        entries: Vec::new(),
        skipped: Vec::new(),
    };

    for module in modules {
        let chunks = match extract_chunks(&module.comment, &module.entries, &batch.package) {
            Ok(chunks) => chunks,
            Err(error) => {
                tracing::warn!(
                    "Skipping module '{}' of {}: {}",
                    module.name,
                    batch.package,
                    error
                );
                batch.skipped.push(SkippedModule {
                    module: module.name,
                    error,
                });
                continue;
            }
        };

        let order: Vec<&str> = {
            let mut seen = HashSet::new();
            let listed = chunks.iter().filter_map(|chunk| match chunk {
                DocChunk::NamedEntry { name, .. } => Some(name.as_str()),
                DocChunk::Prose { .. } => None,
            });
            listed
                .chain(module.entries.keys().map(String::as_str))
                .filter(|name| seen.insert(*name))
                .collect()
        };

        for name in order {
            if let Some(raw) = module.entries.get(name) {
                batch.dictionary.insert(name, &module.name);
                batch
                    .entries
                    .push(IndexedEntry::new(batch.package.clone(), &module.name, name, raw));
            }
        }

        tracing::debug!(
            "Indexed module '{}' ({} chunks, {} entries)",
            module.name,
            chunks.len(),
            module.entries.len()
        );
        batch.modules.push(IndexedModule {
            package: batch.package.clone(),
            name: module.name,
            chunks,
        });
    }

    tracing::info!(
        "Indexed {} in {:?}: {} modules, {} entries, {} skipped",
        batch.package,
        start.elapsed(),
        batch.modules.len(),
        batch.entries.len(),
        batch.skipped.len()
    );
    batch
}
