use std::path::{Path, PathBuf};
use std::sync::Arc;

use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::json;

use crate::model::Skill;
use crate::store::catalog;

/// Appended verbatim to every skill returned from a tool call.
pub const IRON_RULES: &str = "
## Iron Rules
1. If there is anything unclear, ask the user instead of inventing new stuff. Unless the user explicitly tells the AI to invent or suggest ideas.
";

const URI_PREFIX: &str = "agcel://skills/";
const URI_SUFFIX: &str = "/SKILL.md";
const MARKDOWN: &str = "text/markdown";

pub fn skill_uri(name: &str) -> String {
    format!("{URI_PREFIX}{name}{URI_SUFFIX}")
}

fn skill_name_from_uri(uri: &str) -> Option<&str> {
    let name = uri.strip_prefix(URI_PREFIX)?.strip_suffix(URI_SUFFIX)?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

/// Serves every skill under `skills_dir` as a tool and a resource. The
/// directory is rescanned on each request, so skills added or removed while
/// the server runs are picked up immediately.
#[derive(Debug, Clone)]
pub struct SkillServer {
    skills_dir: PathBuf,
}

impl SkillServer {
    pub fn new(skills_dir: PathBuf) -> Self {
        Self { skills_dir }
    }

    pub fn skills_dir(&self) -> &Path {
        &self.skills_dir
    }

    fn skills(&self) -> Vec<Skill> {
        catalog::skills(&self.skills_dir)
    }

    pub fn tools(&self) -> Vec<Tool> {
        let schema = Arc::new(input_schema());
        self.skills()
            .into_iter()
            .map(|skill| {
                let description = format!("Retrieve instructions for the {} skill", skill.name);
                Tool::new(skill.name, description, schema.clone())
            })
            .collect()
    }

    pub fn call(&self, name: &str) -> Result<CallToolResult, McpError> {
        let skill = catalog::find_skill(&self.skills_dir, name).ok_or_else(|| tool_not_found(name))?;
        let content = std::fs::read_to_string(skill.document()).map_err(|e| {
            tracing::warn!(skill = name, error = %e, "failed to read skill");
            tool_not_found(name)
        })?;
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{content}{IRON_RULES}"
        ))]))
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.skills()
            .into_iter()
            .map(|skill| {
                RawResource {
                    mime_type: Some(MARKDOWN.to_string()),
                    ..RawResource::new(skill_uri(&skill.name), format!("{} Documentation", skill.name))
                }
                .no_annotation()
            })
            .collect()
    }

    pub fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let skill = skill_name_from_uri(uri)
            .and_then(|name| catalog::find_skill(&self.skills_dir, name))
            .ok_or_else(|| resource_not_found(uri))?;
        let text = std::fs::read_to_string(skill.document()).map_err(|e| {
            tracing::warn!(uri, error = %e, "failed to read skill resource");
            resource_not_found(uri)
        })?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

fn input_schema() -> JsonObject {
    let schema = json!({
        "type": "object",
        "properties": {
            "instruction": {
                "type": "string",
                "description": "Context or specific requirements for retrieving the skill"
            }
        },
        "required": ["instruction"]
    });
    match schema {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

fn tool_not_found(name: &str) -> McpError {
    McpError::invalid_params(format!("Tool not found: {name}"), Some(json!({ "name": name })))
}

fn resource_not_found(uri: &str) -> McpError {
    McpError::resource_not_found(format!("Resource not found: {uri}"), Some(json!({ "uri": uri })))
}

impl ServerHandler for SkillServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "call_tool");
        self.call(&request.name)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        tracing::debug!(uri = %request.uri, "read_resource");
        self.read(&request.uri)
    }

    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.server_info.name = "agcel".to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(
            "Skill library for coding agents. Each tool returns the instructions of one \
             skill; the same documents are readable as agcel://skills/<name>/SKILL.md resources."
                .into(),
        );
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        info
    }
}
