use crate::search::PackageId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sigsearch")]
#[command(about = "Search package documentation by name or type signature", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/sigsearch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the MCP tools over stdio
    Serve {
        /// Preload docs: owner/project/version=path.json
        #[arg(long = "docs", value_parser = parse_docs_source)]
        docs: Vec<DocsSource>,
    },
    /// Rank loaded entries against a query and print the results
    Search {
        query: String,
        #[arg(long = "docs", value_parser = parse_docs_source, required = true)]
        docs: Vec<DocsSource>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the chunk sequence extracted from each module of a docs dump
    Chunks {
        path: PathBuf,
        /// Only print this module
        #[arg(short, long)]
        module: Option<String>,
        /// Package the dump belongs to
        #[arg(short, long, default_value = "local/docs/0.0.0")]
        package: PackageId,
    },
}

/// A package identity paired with the local dump holding its docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsSource {
    pub package: PackageId,
    pub path: PathBuf,
}

/// Parse `owner/project/version=path`.
pub fn parse_docs_source(value: &str) -> Result<DocsSource, String> {
    let (package, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected owner/project/version=path, got '{}'", value))?;
    let package = package.parse().map_err(|e| format!("{}", e))?;
    let path = crate::config::expand_tilde(path.trim());
    Ok(DocsSource {
        package,
        path: PathBuf::from(path.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_parse_docs_source() {
        let source = parse_docs_source("acme/core/1.0.0=docs/core.json").unwrap();
        check!(source.package == PackageId::new("acme", "core", "1.0.0"));
        check!(source.path == PathBuf::from("docs/core.json"));
    }

    #[test]
    fn test_parse_docs_source_rejects_bad_input() {
        check!(parse_docs_source("docs/core.json").is_err());
        check!(parse_docs_source("acme/core=docs/core.json").is_err());
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "sigsearch",
            "search",
            "a -> a",
            "--docs",
            "acme/core/1.0.0=core.json",
            "-n",
            "5",
        ])
        .unwrap();
        let Commands::Search { query, docs, limit } = cli.command else {
            panic!("expected search command");
        };
        check!(query == "a -> a");
        check!(docs.len() == 1);
        check!(limit == Some(5));
    }

    #[test]
    fn test_cli_chunks_default_package() {
        let cli = Cli::try_parse_from(["sigsearch", "chunks", "core.json"]).unwrap();
        let Commands::Chunks { package, module, .. } = cli.command else {
            panic!("expected chunks command");
        };
        check!(package == PackageId::new("local", "docs", "0.0.0"));
        check!(module.is_none());
    }
}
