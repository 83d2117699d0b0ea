//! Static export: build the site as plain files, preview it, publish it.

pub mod builder;
pub mod deploy;
pub mod error;
pub mod preview;
pub mod rewrite;

pub use builder::{BuildReport, SiteBuilder};
pub use deploy::Deployer;
pub use error::ExportError;
pub use rewrite::rewrite_html;
