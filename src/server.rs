//! MCP server exposing the search session as tools.

use crate::tools::load_docs::{LoadDocsRequest, handle_load_docs};
use crate::tools::module_docs::{ModuleDocsRequest, handle_module_docs};
use crate::tools::search::{SearchRequest, handle_search};
use crate::worker::SearchSession;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for type-signature search
#[derive(Clone)]
pub struct SearchServer {
    /// Shared search session (index, query cache)
    session: Arc<SearchSession>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("session", &self.session)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    /// Create a new SearchServer over an existing session.
    pub fn new(session: Arc<SearchSession>) -> Self {
        Self {
            session,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Load a package's module documentation from a local JSON dump. The file holds an array of modules, each with a name, a doc comment containing '@docs' lists, and a map of entry name to {type, comment}."
    )]
    async fn load_docs(
        &self,
        Parameters(request): Parameters<LoadDocsRequest>,
    ) -> std::result::Result<String, String> {
        handle_load_docs(&self.session, request).await
    }

    #[tool(
        description = "Search loaded documentation. A single lowercase word searches entry names; any other input is parsed as a type signature (e.g. 'a -> List a -> Bool') and entries are ranked by structural similarity, independent of type variable names."
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.session, request).await
    }

    #[tool(
        description = "Show a module's documentation in order: prose sections interleaved with each documented entry and its signature."
    )]
    async fn module_docs(
        &self,
        Parameters(request): Parameters<ModuleDocsRequest>,
    ) -> std::result::Result<String, String> {
        handle_module_docs(&self.session, request).await
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "sigsearch: search package documentation by name or by type signature. \
                 Load packages with load_docs, then query with search."
                    .to_string(),
            )
    }
}
