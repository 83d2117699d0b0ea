use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_HOST: &str = "BIND_HOST";
    /// Root of the site sources (posts/, static/, CNAME, extra dirs).
    pub const CONTENT_DIR: &str = "FOLIO_CONTENT_DIR";
    pub const POSTS_DIR: &str = "FOLIO_POSTS_DIR";
    pub const STATIC_DIR: &str = "FOLIO_STATIC_DIR";
    pub const SITE_CONFIG: &str = "FOLIO_SITE_CONFIG";
    pub const OUTPUT_DIR: &str = "FOLIO_OUTPUT_DIR";
    /// Set to "true" or "1" to re-read posts on every request.
    pub const DEBUG: &str = "FOLIO_DEBUG";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 5000;
    pub const BIND_HOST: &str = "127.0.0.1";
    pub const CONTENT_DIR: &str = "app";
    pub const POSTS_DIR: &str = "posts";
    pub const STATIC_DIR: &str = "static";
    pub const SITE_CONFIG: &str = "config/site.ron";
    pub const OUTPUT_DIR: &str = "_site";
    pub const PREVIEW_PORT: u16 = 8000;
}

/// Parse a boolean-ish env value ("1", "true", "yes")
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_host: String,
    pub content_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub static_dir: PathBuf,
    pub site_config_path: PathBuf,
    pub output_dir: PathBuf,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let content_dir = PathBuf::from(
            env::var(env_vars::CONTENT_DIR).unwrap_or_else(|_| defaults::CONTENT_DIR.to_string()),
        );

        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("{} is not a valid port ({}), using {}", env_vars::PORT, raw, defaults::PORT);
                defaults::PORT
            }),
            Err(_) => defaults::PORT,
        };

        Self {
            port,
            bind_host: env::var(env_vars::BIND_HOST)
                .unwrap_or_else(|_| defaults::BIND_HOST.to_string()),
            posts_dir: dir_override(env_vars::POSTS_DIR)
                .unwrap_or_else(|| content_dir.join(defaults::POSTS_DIR)),
            static_dir: dir_override(env_vars::STATIC_DIR)
                .unwrap_or_else(|| content_dir.join(defaults::STATIC_DIR)),
            site_config_path: dir_override(env_vars::SITE_CONFIG)
                .unwrap_or_else(|| PathBuf::from(defaults::SITE_CONFIG)),
            output_dir: dir_override(env_vars::OUTPUT_DIR)
                .unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_DIR)),
            debug: env::var(env_vars::DEBUG).map(|v| parse_flag(&v)).unwrap_or(false),
            content_dir,
        }
    }

    /// Config rooted at a single content directory, used by tests and the CLI
    pub fn for_content_dir(content_dir: &Path) -> Self {
        Self {
            port: defaults::PORT,
            bind_host: defaults::BIND_HOST.to_string(),
            content_dir: content_dir.to_path_buf(),
            posts_dir: content_dir.join(defaults::POSTS_DIR),
            static_dir: content_dir.join(defaults::STATIC_DIR),
            site_config_path: content_dir.join(defaults::SITE_CONFIG),
            output_dir: content_dir.join(defaults::OUTPUT_DIR),
            debug: false,
        }
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.bind_host.clone(), self.port)
    }
}

fn dir_override(var: &str) -> Option<PathBuf> {
    env::var(var).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_for_content_dir_layout() {
        let config = Config::for_content_dir(Path::new("/srv/site"));
        assert_eq!(config.posts_dir, PathBuf::from("/srv/site/posts"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/site/static"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/site/_site"));
        assert!(!config.debug);
    }
}
