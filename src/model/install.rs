use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Written to `install.json` in the global directory by `agc install`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRecord {
    pub version: String,
    pub installed_at: DateTime<Utc>,
    pub package_root: PathBuf,
}

impl InstallRecord {
    pub fn new(package_root: PathBuf) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            installed_at: Utc::now(),
            package_root,
        }
    }
}
