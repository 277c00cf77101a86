use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::AgcelError;

/// Key of our entry under `mcpServers`.
pub const SERVER_NAME: &str = "agcel";

/// Launch description the host uses to start the server.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServerEntry {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Parse a host config, treating missing, empty, malformed or non-object
/// documents as an empty registry.
pub fn parse_or_default(existing: Option<&str>) -> Map<String, Value> {
    let parsed = existing
        .filter(|content| !content.trim().is_empty())
        .and_then(|content| serde_json::from_str::<Value>(content).ok());

    match parsed {
        Some(Value::Object(root)) => root,
        Some(_) | None => {
            let mut root = Map::new();
            root.insert("mcpServers".to_string(), json!({}));
            root
        }
    }
}

/// Insert or replace `name` in the registry, preserving everything else.
pub fn update_registry(existing: Option<&str>, name: &str, entry: Value) -> Value {
    let mut root = parse_or_default(existing);
    let servers = root
        .entry("mcpServers")
        .or_insert_with(|| json!({}));
    if !servers.is_object() {
        *servers = json!({});
    }
    if let Some(servers) = servers.as_object_mut() {
        servers.insert(name.to_string(), entry);
    }
    Value::Object(root)
}

/// Remove `name` from the registry. `None` when there was nothing to remove.
pub fn remove_from_registry(existing: &str, name: &str) -> Option<Value> {
    let mut doc: Value = serde_json::from_str(existing).ok()?;
    let servers = doc.get_mut("mcpServers")?.as_object_mut()?;
    servers.remove(name)?;
    Some(doc)
}

/// File adapter around the pure registry functions. Read-modify-write is not
/// locked across processes.
pub struct HostConfig {
    path: PathBuf,
}

impl HostConfig {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn upsert(&self, name: &str, entry: &ServerEntry) -> Result<(), AgcelError> {
        let existing = self.read()?;
        if existing.as_deref().is_some_and(|c| {
            !c.trim().is_empty() && serde_json::from_str::<Value>(c).is_err()
        }) {
            tracing::warn!(
                path = %self.path.display(),
                "existing MCP config is invalid, creating a new one"
            );
        }
        let doc = update_registry(existing.as_deref(), name, serde_json::to_value(entry)?);
        self.write(&doc)
    }

    /// Returns whether an entry was removed.
    pub fn remove(&self, name: &str) -> Result<bool, AgcelError> {
        let Some(existing) = self.read()? else {
            return Ok(false);
        };
        match remove_from_registry(&existing, name) {
            Some(doc) => {
                self.write(&doc)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read(&self) -> Result<Option<String>, AgcelError> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|source| AgcelError::FileRead {
                path: self.path.clone(),
                source,
            })
    }

    fn write(&self, doc: &Value) -> Result<(), AgcelError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| AgcelError::DirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, content + "\n").map_err(|source| AgcelError::FileWrite {
            path: self.path.clone(),
            source,
        })
    }
}

pub fn default_host_config_path() -> Result<PathBuf, AgcelError> {
    dirs::home_dir()
        .map(|home| home.join(".gemini").join("antigravity").join("mcp_config.json"))
        .ok_or(AgcelError::HomeDirNotFound)
}
