use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::mcp::{self, SkillServer, Transport};
use crate::store::{Location, LocationKind};

pub async fn run(
    global_dir: Option<&Path>,
    mode: Transport,
    port: Option<u16>,
    root: Option<PathBuf>,
) -> Result<()> {
    let location = match root {
        Some(root) => {
            let global = super::global_dir(global_dir)?;
            let kind = if root == global {
                LocationKind::Global
            } else {
                LocationKind::Project
            };
            Location::open(root, kind)
        }
        None => super::current_location(global_dir)?.1,
    };
    let port = port.unwrap_or(location.config().port);

    tracing::debug!(root = %location.root().display(), kind = %location.kind(), "serving location");
    mcp::serve(SkillServer::new(location.skills_dir()), mode, port).await
}
