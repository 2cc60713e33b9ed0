//! Loading a local documentation dump into the session.

use crate::{config::expand_tilde, search::PackageId, worker::SearchSession};
use rmcp::schemars;
use serde::Deserialize;
use std::{fmt::Write as _, path::PathBuf};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadDocsRequest {
    /// Package identity as owner/project/version
    pub package: String,
    /// Path to a JSON array of module docs ({name, comment, entries})
    pub path: String,
}

/// Load one package and describe what was indexed.
pub async fn handle_load_docs(
    session: &SearchSession,
    request: LoadDocsRequest,
) -> Result<String, String> {
    let package: PackageId = request.package.parse().map_err(|e| format!("{}", e))?;
    let path = PathBuf::from(expand_tilde(&request.path).as_ref());

    let summary = session
        .load_file(package, &path)
        .await
        .map_err(|e| format!("{:#}", e))?;

    if !summary.appended {
        return Ok(format!("Package {} is already loaded.", summary.package));
    }

    let mut output = format!(
        "Loaded {}: {} modules, {} entries.\n",
        summary.package, summary.modules, summary.entries
    );
    if !summary.skipped.is_empty() {
        output.push_str("\nSkipped modules:\n");
        for skipped in &summary.skipped {
            let _ = writeln!(output, "• {}: {}", skipped.module, skipped.error);
        }
    }
    Ok(output)
}
