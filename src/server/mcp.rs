use crate::app::dto::*;
use crate::app::engine::AnalysisEngine;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};
use std::path::PathBuf;
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct DepscanMcpServer {
    engine: AnalysisEngine,
    root: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl DepscanMcpServer {
    pub fn new(engine: AnalysisEngine, root: PathBuf) -> Self {
        Self {
            engine,
            root,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl DepscanMcpServer {
    #[tool(
        description = "Build the full dependency graph of the project: nodes, external packages, cycles, orphans and diagnostics."
    )]
    async fn analyze_dependencies(
        &self,
        params: Parameters<AnalyzeRequest>,
    ) -> Result<Json<AnalysisResult>, String> {
        let engine = self.engine.clone();
        let root = self.root.clone();
        let req = params.0;
        spawn_blocking(move || engine.analyze(&root, req.options.as_ref()))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| format!("{e:#}"))
    }

    #[tool(description = "List circular import chains between project files.")]
    async fn find_cycles(
        &self,
        params: Parameters<AnalyzeRequest>,
    ) -> Result<Json<CyclesResponse>, String> {
        let engine = self.engine.clone();
        let root = self.root.clone();
        let req = params.0;
        spawn_blocking(move || engine.cycles(&root, req.options.as_ref()))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| format!("{e:#}"))
    }

    #[tool(description = "List files that no other file imports, excluding entry points.")]
    async fn find_orphans(
        &self,
        params: Parameters<AnalyzeRequest>,
    ) -> Result<Json<OrphansResponse>, String> {
        let engine = self.engine.clone();
        let root = self.root.clone();
        let req = params.0;
        spawn_blocking(move || engine.orphans(&root, req.options.as_ref()))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| format!("{e:#}"))
    }

    #[tool(
        description = "Show what one file imports, which files import it, and whether it is an orphan or part of a cycle."
    )]
    async fn file_dependencies(
        &self,
        params: Parameters<FileRequest>,
    ) -> Result<Json<FileDependencies>, String> {
        let engine = self.engine.clone();
        let root = self.root.clone();
        let req = params.0;
        spawn_blocking(move || engine.file(&root, &req.file, req.options.as_ref()))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| format!("{e:#}"))
    }
}

#[tool_handler]
impl ServerHandler for DepscanMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Analyze import dependencies between JavaScript/TypeScript source files: cycles, orphans and external packages."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
