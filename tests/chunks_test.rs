mod common;

use assert2::check;
use common::{core_modules, core_package};
use rstest::rstest;
use sigsearch::error::ExtractError;
use sigsearch::{DocChunk, RawModuleDocs, extract_chunks, index_package};

fn prose(text: &str) -> DocChunk {
    DocChunk::Prose {
        text: text.to_string(),
    }
}

fn named(name: &str) -> DocChunk {
    DocChunk::NamedEntry {
        name: name.to_string(),
        package: core_package(),
    }
}

/// Test: Prose and directive lists interleave in comment order.
#[rstest]
fn chunks_follow_comment_order(core_modules: Vec<RawModuleDocs>) {
    let basics = &core_modules[0];
    let chunks = extract_chunks(&basics.comment, &basics.entries, &core_package()).unwrap();

    check!(
        chunks
            == vec![
                prose("Basic arithmetic and conversions."),
                named("negate"),
                named("toString"),
                prose("# Identity"),
                named("identity"),
            ]
    );
}

/// Test: A listed name without an entry fails the module.
#[rstest]
fn unknown_entry_fails_extraction(core_modules: Vec<RawModuleDocs>) {
    let broken = &core_modules[2];
    let result = extract_chunks(&broken.comment, &broken.entries, &core_package());
    check!(
        result
            == Err(ExtractError::UnknownEntry {
                name: "missing".to_string()
            })
    );
}

/// Test: Directive lists may continue across lines after a trailing comma.
#[test]
fn directive_continues_after_trailing_comma() {
    let lookup: &[&str] = &["map", "filter", "foldl", "::"];
    let comment = "Lists.\n@docs map, filter,\n    foldl, (::)\nMore prose.";
    let chunks = extract_chunks(comment, lookup, &core_package()).unwrap();

    check!(
        chunks
            == vec![
                prose("Lists."),
                named("map"),
                named("filter"),
                named("foldl"),
                named("::"),
                prose("More prose."),
            ]
    );
}

/// Test: A comment without directives is a single prose chunk.
#[rstest]
#[case("Just words.", vec![prose("Just words.")])]
#[case("", vec![])]
#[case("   \n  ", vec![])]
fn comment_without_directives(#[case] comment: &str, #[case] expected: Vec<DocChunk>) {
    let lookup: &[&str] = &[];
    check!(extract_chunks(comment, lookup, &core_package()).unwrap() == expected);
}

/// Test: Indexing skips broken modules and orders entries by documentation.
#[rstest]
fn index_package_skips_broken_modules(core_modules: Vec<RawModuleDocs>) {
    let batch = index_package(core_package(), core_modules);

    check!(batch.modules.len() == 2);
    check!(batch.skipped.len() == 1);
    check!(batch.skipped[0].module == "Broken");

    let order: Vec<&str> = batch.entries.iter().map(|e| e.name.name.as_str()).collect();
    check!(
        order
            == [
                "negate", "toString", "identity", "map", "filterMap", "sum", "head"
            ]
    );
    check!(batch.dictionary.resolve("head") == Some("List"));
}
