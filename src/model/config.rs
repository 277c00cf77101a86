use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PORT: u16 = 3000;

/// Per-location settings stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_skills_dir")]
    pub skills_dir: PathBuf,
    #[serde(default = "default_workflows_dir")]
    pub workflows_dir: PathBuf,
    /// Keys this version does not manage, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_skills_dir() -> PathBuf {
    PathBuf::from("./skills")
}

fn default_workflows_dir() -> PathBuf {
    PathBuf::from("./workflows")
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            skills_dir: default_skills_dir(),
            workflows_dir: default_workflows_dir(),
            extra: Map::new(),
        }
    }
}
