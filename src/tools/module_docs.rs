//! Rendering a module's documentation from its chunk sequence.

use crate::{docs::DocChunk, search::PackageId, worker::SearchSession};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ModuleDocsRequest {
    /// Package identity as owner/project/version
    pub package: String,
    /// Module name, e.g. "List"
    pub module: String,
}

pub async fn handle_module_docs(
    session: &SearchSession,
    request: ModuleDocsRequest,
) -> Result<String, String> {
    let package: PackageId = request.package.parse().map_err(|e| format!("{}", e))?;
    let index = session.index().await;

    let module = index.module(&package, &request.module).ok_or_else(|| {
        format!(
            "Module '{}' not found in {}. Load the package with load_docs first.",
            request.module, package
        )
    })?;

    let mut output = format!("# {} ({})\n\n", module.name, package);
    for chunk in &module.chunks {
        match chunk {
            DocChunk::Prose { text } => {
                let _ = writeln!(output, "{}\n", text);
            }
            DocChunk::NamedEntry { name, package } => {
                match index.entry(package, &module.name, name) {
                    Some(entry) => {
                        let _ = writeln!(output, "    {} : {}", name, entry.signature());
                        if !entry.doc_text.trim().is_empty() {
                            let _ = writeln!(output, "{}", entry.doc_text.trim());
                        }
                        output.push('\n');
                    }
                    None => {
                        let _ = writeln!(output, "    {}\n", name);
                    }
                }
            }
        }
    }
    Ok(output)
}
