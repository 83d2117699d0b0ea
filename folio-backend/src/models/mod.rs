pub mod site_config;

pub use site_config::{ConfigError, SiteConfig};
