use anyhow::Context;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use sigsearch::cli::{Cli, Commands, DocsSource};
use sigsearch::docs::{DocChunk, read_docs_file};
use sigsearch::tools::format_search_results;
use sigsearch::{Config, PackageId, SearchServer, SearchSession, extract_chunks, logging};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.logging);

    match cli.command {
        Commands::Serve { docs } => serve(&config, docs).await,
        Commands::Search { query, docs, limit } => {
            let session = SearchSession::new(&config.search);
            preload(&session, docs).await?;
            let limit = limit.unwrap_or_else(|| session.limit());
            let results = session.search(&query, limit).await?.unwrap_or_default();
            if results.is_empty() {
                println!("No results found for '{}'.", query);
            } else {
                print!("{}", format_search_results(&results, &query));
            }
            Ok(())
        }
        Commands::Chunks {
            path,
            module,
            package,
        } => print_chunks(&path, module.as_deref(), &package).await,
    }
}

async fn serve(config: &Config, docs: Vec<DocsSource>) -> anyhow::Result<()> {
    tracing::info!("Starting sigsearch MCP server");

    let session = Arc::new(SearchSession::new(&config.search));
    preload(&session, docs).await?;

    // Create and serve the MCP server over stdio
    let server = SearchServer::new(session);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}

async fn preload(session: &SearchSession, docs: Vec<DocsSource>) -> anyhow::Result<()> {
    for source in docs {
        let summary = session.load_file(source.package, &source.path).await?;
        tracing::info!(
            "Loaded {}: {} modules, {} entries, {} skipped",
            summary.package,
            summary.modules,
            summary.entries,
            summary.skipped.len()
        );
    }
    Ok(())
}

async fn print_chunks(path: &Path, only: Option<&str>, package: &PackageId) -> anyhow::Result<()> {
    let modules = read_docs_file(package, path).await?;
    let mut found = false;

    for module in modules
        .iter()
        .filter(|module| only.is_none_or(|name| module.name == name))
    {
        found = true;
        println!("== {}", module.name);
        let chunks = extract_chunks(&module.comment, &module.entries, package)
            .with_context(|| format!("Module '{}'", module.name))?;
        for chunk in chunks {
            match chunk {
                DocChunk::Prose { text } => println!("[prose] {}", text.trim()),
                DocChunk::NamedEntry { name, .. } => println!("[entry] {}", name),
            }
        }
    }

    if let Some(name) = only
        && !found
    {
        anyhow::bail!("No module named '{}' in {}", name, path.display());
    }
    Ok(())
}
