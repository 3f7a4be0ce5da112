mod contact;
mod pages;
mod server;
mod smtp;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nain_core::{SiteConfig, Size2D};
use nain_motion::FramePath;

#[derive(Parser)]
#[command(
    name = "nain",
    version,
    about = "NAIN STUDIO site engine: scroll sequence, gallery and contact relay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site, the gallery catalogue and the contact relay
    Serve {
        /// Path to nain.config.toml (default: ./nain.config.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to listen on (overrides server.bind)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Directory with the static pages and frame assets (overrides server.public_dir)
        #[arg(long)]
        public: Option<PathBuf>,
    },

    /// Render the sequence section at a scroll progress to a PNG
    Preview {
        /// Scroll progress through the section, 0..=1
        #[arg(short, long, default_value_t = 0.5)]
        progress: f64,

        /// Output PNG path
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// Viewport width in CSS pixels
        #[arg(long, default_value_t = 1440.0)]
        width: f64,

        /// Viewport height in CSS pixels
        #[arg(long, default_value_t = 900.0)]
        height: f64,

        /// Device pixel ratio (values below 1 are treated as 1)
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        public: Option<PathBuf>,
    },

    /// Verify that every sequence frame exists and decodes
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        public: Option<PathBuf>,
    },

    /// Display version and configuration info
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Scaffold a new site directory
    Init {
        /// Name of the directory to create
        #[arg()]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            public,
        } => {
            let (config, root) = load_config(config)?;
            let bind = match bind {
                Some(addr) => addr,
                None => config
                    .server
                    .bind
                    .parse()
                    .with_context(|| format!("invalid server.bind: {}", config.server.bind))?,
            };
            let public = public_dir(&config, &root, public);
            run_async(server::run_server(
                config,
                bind,
                public,
                Arc::new(smtp::SmtpFactory),
            ))
        }
        Commands::Preview {
            progress,
            output,
            width,
            height,
            dpr,
            config,
            public,
        } => cmd_preview(config, public, progress, output, Size2D::new(width, height), dpr),
        Commands::Check { config, public } => cmd_check(config, public),
        Commands::Info { config } => cmd_info(config),
        Commands::Init { name } => cmd_init(&name),
    }
}

fn run_async<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    runtime.block_on(future)
}

/// Loads the explicit config file, or `./nain.config.toml` when present, or the
/// defaults. Returns the directory relative paths in the config resolve against.
fn load_config(path: Option<PathBuf>) -> Result<(SiteConfig, PathBuf)> {
    let path = match path {
        Some(path) => path,
        None => {
            let local = PathBuf::from(SiteConfig::FILE_NAME);
            if !local.exists() {
                tracing::debug!("no {} found, using defaults", SiteConfig::FILE_NAME);
                return Ok((SiteConfig::default(), PathBuf::from(".")));
            }
            local
        }
    };
    let config = SiteConfig::load_from_file(&path)
        .with_context(|| format!("failed to load config: {}", path.display()))?;
    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::info!("loaded {}", path.display());
    Ok((config, root))
}

fn public_dir(config: &SiteConfig, root: &Path, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| root.join(&config.server.public_dir))
}

fn cmd_preview(
    config: Option<PathBuf>,
    public: Option<PathBuf>,
    progress: f64,
    output: PathBuf,
    viewport: Size2D,
    dpr: f64,
) -> Result<()> {
    let (config, root) = load_config(config)?;
    let public = public_dir(&config, &root, public);
    let options = nain_render::PreviewOptions {
        progress,
        viewport,
        device_pixel_ratio: dpr,
    };

    println!("🎞  Rendering preview at progress {:.3}", progress);
    let start = Instant::now();
    let frame = nain_render::render_preview(&public, &config, &options)
        .context("preview failed")?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    nain_render::save_png(&frame, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "   ✓ {} ({}x{}) in {:.0?}",
        output.display(),
        frame.width,
        frame.height,
        start.elapsed()
    );
    Ok(())
}

fn cmd_check(config: Option<PathBuf>, public: Option<PathBuf>) -> Result<()> {
    let (config, root) = load_config(config)?;
    let public = public_dir(&config, &root, public);
    let path = FramePath::from(&config.sequence);

    println!(
        "🔍 Checking {} frames at {}",
        config.sequence.count,
        nain_render::resolve_asset(&public, &path.path_for(0)).display()
    );
    let report = nain_render::inspect_sequence(&public, &path, config.sequence.count);

    for (index, reason) in &report.failures {
        println!("   ✗ frame {}: {}", index, reason);
    }
    if let Some((w, h)) = report.dimensions {
        println!("   Dimensions: {}x{}", w, h);
    }
    for index in &report.mismatched {
        println!("   ⚠ frame {} has different dimensions", index);
    }

    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} frames missing or unreadable; the sequence will not play",
            report.failures.len(),
            report.count
        );
    }
    println!("   ✓ {} / {} frames OK", report.loaded, report.count);
    Ok(())
}

fn cmd_info(config: Option<PathBuf>) -> Result<()> {
    let (config, root) = load_config(config)?;
    let path = FramePath::from(&config.sequence);

    println!("🏛  {}", config.site.name);
    println!("   Version:   {}", env!("CARGO_PKG_VERSION"));
    println!(
        "   Sequence:  {} frames, {} .. {}",
        config.sequence.count,
        path.path_for(0),
        path.path_for(config.sequence.count.saturating_sub(1))
    );
    println!(
        "   Spring:    k={} c={} m={}",
        config.spring.stiffness, config.spring.damping, config.spring.mass
    );
    println!("   Gallery:   {} items", config.work.len());
    println!("   Public:    {}", public_dir(&config, &root, None).display());
    println!("   Bind:      {}", config.server.bind);
    println!(
        "   Mail:      {}",
        match contact::SmtpSettings::from_env() {
            Ok(settings) => format!(
                "{}:{} ({}) -> {}",
                settings.host,
                settings.port,
                if settings.secure { "TLS" } else { "STARTTLS" },
                settings.to
            ),
            Err(e) => format!("not configured ({})", e),
        }
    );
    Ok(())
}

fn cmd_init(name: &str) -> Result<()> {
    let site_dir = PathBuf::from(name);

    if site_dir.exists() {
        anyhow::bail!("Directory '{}' already exists", name);
    }

    let config = SiteConfig::default();
    let public = site_dir.join(&config.server.public_dir);
    let sequence_dir = nain_render::resolve_asset(
        &public,
        &FramePath::from(&config.sequence).path_for(0),
    );
    if let Some(dir) = sequence_dir.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    config
        .save_to_file(&site_dir.join(SiteConfig::FILE_NAME))
        .with_context(|| format!("failed to create {} in: {}", SiteConfig::FILE_NAME, name))?;

    for (page, html) in pages::starter_pages(&config) {
        let dir = public.join(page);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        std::fs::write(dir.join("index.html"), html)
            .with_context(|| format!("failed to write {}/index.html", dir.display()))?;
    }

    println!("✨ Created site '{}'", name);
    println!("   {}/{}", name, SiteConfig::FILE_NAME);
    println!("   {}/", public.display());
    println!();
    println!(
        "   Put {} frames at {} and run:",
        config.sequence.count,
        sequence_dir.display()
    );
    println!("   cd {} && nain check && nain serve", name);
    Ok(())
}
