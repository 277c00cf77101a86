pub mod config;
pub mod install;
pub mod skill;

pub use config::LocationConfig;
pub use install::InstallRecord;
pub use skill::{SKILL_FILE, Skill, Workflow};
