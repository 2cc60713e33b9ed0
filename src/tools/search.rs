//! Type and name search handler.

use crate::{
    search::{Query, RankedEntry},
    worker::SearchSession,
};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// A name fragment ("map") or a type signature ("(a -> b) -> List a -> List b")
    pub query: String,
    /// Maximum number of results to return (default: configured limit)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Execute a search against the session index.
pub async fn handle_search(
    session: &SearchSession,
    request: SearchRequest,
) -> Result<String, String> {
    let limit = request.limit.unwrap_or_else(|| session.limit());
    let results = session
        .search(&request.query, limit)
        .await
        .map_err(|e| format!("{:#}", e))?;

    let Some(results) = results else {
        return Ok(format!(
            "Search for '{}' was superseded by a newer query.",
            request.query
        ));
    };

    if results.is_empty() {
        let mut msg = format!("No results found for '{}'.\n\n", request.query);
        msg.push_str("Search tips:\n");
        msg.push_str("• A single lowercase word searches names, e.g. 'map'\n");
        msg.push_str("• Anything else searches by type, e.g. 'a -> List a -> Bool'\n");
        if session.index().await.is_empty() {
            msg.push_str("• No packages are loaded yet; use load_docs first\n");
        }
        return Ok(msg);
    }

    Ok(format_search_results(&results, &request.query))
}

/// Format search results into a readable string output.
pub fn format_search_results(results: &[RankedEntry], query: &str) -> String {
    let kind = match Query::parse(query) {
        Some(Query::Type(_)) => "type search",
        _ => "name search",
    };
    let mut output = format!("Search results for '{}' ({}):\n\n", query, kind);

    for (idx, result) in results.iter().enumerate() {
        let entry = &result.entry;
        let _ = write!(
            output,
            "{}. `{}` : {}  ({})",
            idx + 1,
            entry.name,
            entry.signature(),
            entry.package
        );
        if let Some(score) = result.score {
            let _ = write!(output, " - score: {}", score);
        }
        output.push('\n');

        let first_line = entry
            .doc_text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        if !first_line.is_empty() {
            let _ = writeln!(output, "   {}", first_line.trim());
        }
        output.push('\n');
    }

    output
}
