//! `folio` — build, check, preview and publish the static site.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;

use folio_backend::config::{defaults, Config};
use folio_backend::export::{preview, Deployer, SiteBuilder};
use folio_backend::models::SiteConfig;
use folio_backend::posts::{MarkdownRenderer, PostIndex};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static export and publishing for the folio site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the whole site into the output directory
    Build {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Push the output directory to the GitHub Pages branch
    Deploy {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Remote name or URL; defaults to the site config
        #[arg(long)]
        remote: Option<String>,
        #[arg(long)]
        branch: Option<String>,
    },
    /// Serve the output directory locally without caching
    Serve {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = defaults::PREVIEW_PORT)]
        port: u16,
    },
    /// Parse every post and report the ones that fail
    Check,
    /// Build, deploy, then serve
    All {
        #[arg(long, default_value_t = defaults::PREVIEW_PORT)]
        port: u16,
    },
}

#[actix_web::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), String> {
    let mut config = Config::from_env();
    let site = SiteConfig::load(&config.site_config_path).map_err(|e| e.to_string())?;

    match command {
        Commands::Build { out } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            build(&config, &site)
        }
        Commands::Deploy { out, remote, branch } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            deploy(&config, &site, remote.as_deref(), branch.as_deref())
        }
        Commands::Serve { out, port } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            serve(&config, port).await
        }
        Commands::Check => check(&config, &site),
        Commands::All { port } => {
            build(&config, &site)?;
            deploy(&config, &site, None, None)?;
            serve(&config, port).await
        }
    }
}

fn build(config: &Config, site: &SiteConfig) -> Result<(), String> {
    let report = SiteBuilder::new(config, site)
        .build()
        .map_err(|e| e.to_string())?;

    println!(
        "Built {} pages and {} assets into {}",
        report.pages.len(),
        report.assets_copied,
        report.output_dir.display()
    );
    if report.posts_skipped > 0 {
        println!("{} posts skipped, run `folio check` for details", report.posts_skipped);
    }
    if !report.is_clean() {
        for failure in &report.failures {
            println!("  failed: {}", failure);
        }
        return Err(format!("build finished with {} failures", report.failures.len()));
    }
    Ok(())
}

fn deploy(
    config: &Config,
    site: &SiteConfig,
    remote: Option<&str>,
    branch: Option<&str>,
) -> Result<(), String> {
    let mut deployer = Deployer::new(&config.output_dir, &site.export);
    if let Some(remote) = remote {
        deployer = deployer.with_remote(remote);
    }
    if let Some(branch) = branch {
        deployer = deployer.with_branch(branch);
    }
    deployer.deploy().map_err(|e| e.to_string())?;
    println!("Deployed {} to {}", config.output_dir.display(), deployer.branch());
    Ok(())
}

async fn serve(config: &Config, port: u16) -> Result<(), String> {
    println!("Serving {} at http://{}:{}/ (Ctrl+C to stop)", config.output_dir.display(), config.bind_host, port);
    preview::serve(config.output_dir.clone(), &config.bind_host, port)
        .await
        .map_err(|e| e.to_string())
}

fn check(config: &Config, site: &SiteConfig) -> Result<(), String> {
    let renderer = MarkdownRenderer::new(&site.posts.code_css_class);
    let index = PostIndex::load(&config.posts_dir, &site.posts.extension, &renderer);

    for post in index.all() {
        println!("ok    {}  {}  {}", post.date, post.slug, post.title);
    }
    for skipped in index.skipped() {
        println!("FAIL  {} [{}] {}", skipped.path.display(), skipped.kind, skipped.reason);
    }
    println!("{} posts, {} failed", index.len(), index.skipped().len());

    if index.skipped().is_empty() {
        Ok(())
    } else {
        Err(format!("{} post files could not be loaded", index.skipped().len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_posts(root: &Path, broken: bool) {
        let posts = root.join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("2023-05-01-ok.markdown"),
            "---\ntitle: Fine\n---\nBody.\n",
        )
        .unwrap();
        if broken {
            fs::write(posts.join("2023-05-02-bad.markdown"), "---\ndate: 2023-05-02\n---\nNo title.\n")
                .unwrap();
        }
    }

    #[test]
    fn test_check_fails_on_broken_post() {
        let dir = tempdir().unwrap();
        write_posts(dir.path(), true);
        let config = Config::for_content_dir(dir.path());

        let err = check(&config, &SiteConfig::default()).unwrap_err();
        assert!(err.contains("1 post files could not be loaded"), "{}", err);
    }

    #[test]
    fn test_check_passes_on_clean_posts() {
        let dir = tempdir().unwrap();
        write_posts(dir.path(), false);
        let config = Config::for_content_dir(dir.path());

        assert!(check(&config, &SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_build_fails_when_report_has_failures() {
        let dir = tempdir().unwrap();
        write_posts(dir.path(), false);
        let config = Config::for_content_dir(dir.path());
        let mut site = SiteConfig::default();

        assert!(build(&config, &site).is_ok());
        assert!(config.output_dir.join("posts/ok/index.html").is_file());

        site.export.extra_dirs = vec!["missing".to_string()];
        let err = build(&config, &site).unwrap_err();
        assert!(err.contains("1 failures"), "{}", err);
    }

    #[test]
    fn test_build_refuses_source_dir_as_output() {
        let dir = tempdir().unwrap();
        write_posts(dir.path(), false);
        let mut config = Config::for_content_dir(dir.path());
        config.output_dir = config.posts_dir.clone();

        assert!(build(&config, &SiteConfig::default()).is_err());
        assert!(dir.path().join("posts/2023-05-01-ok.markdown").is_file());
    }
}
