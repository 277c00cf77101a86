pub mod server;
pub mod sse;

use anyhow::Result;

use rmcp::ServiceExt;
use rmcp::transport::stdio;

pub use server::SkillServer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    /// Line-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// HTTP with a Server-Sent Events stream and a message endpoint
    Sse,
}

pub async fn serve(server: SkillServer, transport: Transport, port: u16) -> Result<()> {
    match transport {
        Transport::Stdio => {
            tracing::info!(skills = %server.skills_dir().display(), "AgCel MCP server running on stdio");
            let service = server.serve(stdio()).await?;
            service.waiting().await?;
            Ok(())
        }
        Transport::Sse => sse::serve(server, port).await,
    }
}
