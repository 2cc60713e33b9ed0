//! Splitting a module comment into prose and `@docs` entry references.
//!
//! ```text
//! Intro prose.
//! @docs map, filter,
//!       foldl, (|>)
//!
//! # More prose
//! ```
//!
//! becomes `Prose, map, filter, foldl, |>, Prose`. A directive line ending in a
//! comma continues on the next line.

use super::DocChunk;
use crate::error::ExtractError;
use crate::search::PackageId;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Separator between leading prose and each directive block.
pub const DOCS_MARKER: &str = "\n@docs ";

/// Anything that can answer "does this module have an entry called `name`?".
pub trait EntryLookup {
    fn contains_entry(&self, name: &str) -> bool;
}

impl<V> EntryLookup for BTreeMap<String, V> {
    fn contains_entry(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl<V, S: BuildHasher> EntryLookup for HashMap<String, V, S> {
    fn contains_entry(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl EntryLookup for [&str] {
    fn contains_entry(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn is_operator_char(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && c != '_' && c != '\''
}

/// Lookup key for a directive token: the identifier itself, or an operator with
/// its parentheses removed.
fn entry_key(token: &str) -> Option<&str> {
    if !token.is_empty() && token.chars().all(is_identifier_char) {
        return Some(token);
    }
    let operator = token.strip_prefix('(')?.strip_suffix(')')?;
    (!operator.is_empty() && operator.chars().all(is_operator_char)).then_some(operator)
}

/// Split a block into its directive list and the prose after it.
///
/// The directive is the first line, extended by every following line while it
/// still ends with a comma.
fn split_directive(block: &str) -> (&str, &str) {
    let mut end = 0;
    loop {
        end = block[end..].find('\n').map_or(block.len(), |i| end + i);
        if end == block.len() || !block[..end].trim_end().ends_with(',') {
            break;
        }
        end += 1;
    }
    (&block[..end], block.get(end + 1..).unwrap_or(""))
}

fn push_prose(chunks: &mut Vec<DocChunk>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        chunks.push(DocChunk::Prose {
            text: text.to_string(),
        });
    }
}

fn directive_block<L: EntryLookup + ?Sized>(
    block: &str,
    lookup: &L,
    package: &PackageId,
    chunks: &mut Vec<DocChunk>,
) -> Result<(), ExtractError> {
    let (directive, rest) = split_directive(block);

    let mut offset = 0;
    for token in directive.split(',') {
        let start = offset;
        offset += token.len() + 1;

        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(key) = entry_key(trimmed) else {
            // Unlisted text: everything from here on is prose
            push_prose(chunks, &directive[start..]);
            break;
        };

        if !lookup.contains_entry(key) {
            return Err(ExtractError::UnknownEntry {
                name: key.to_string(),
            });
        }
        chunks.push(DocChunk::NamedEntry {
            name: key.to_string(),
            package: package.clone(),
        });
    }

    push_prose(chunks, rest);
    Ok(())
}

/// Turn a raw module comment into ordered chunks.
///
/// Fails when a listed name has no entry in `lookup`; the caller should drop the
/// whole module in that case.
pub fn extract_chunks<L: EntryLookup + ?Sized>(
    comment: &str,
    lookup: &L,
    package: &PackageId,
) -> Result<Vec<DocChunk>, ExtractError> {
    let mut chunks = Vec::new();

    let (leading, blocks) = match comment.strip_prefix(&DOCS_MARKER[1..]) {
        Some(blocks) => ("", Some(blocks)),
        None => match comment.split_once(DOCS_MARKER) {
            Some((leading, blocks)) => (leading, Some(blocks)),
            None => (comment, None),
        },
    };

    push_prose(&mut chunks, leading);
    for block in blocks.into_iter().flat_map(|blocks| blocks.split(DOCS_MARKER)) {
        directive_block(block, lookup, package, &mut chunks)?;
    }

    Ok(chunks)
}
