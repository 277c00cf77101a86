pub mod catalog;
pub mod frontmatter;
pub mod location;
pub mod package;
pub mod project;
pub mod registry;
pub mod sync;

pub use location::{Location, LocationKind};
pub use registry::HostConfig;
