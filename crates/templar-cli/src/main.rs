mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use templar_core::Mode;

#[derive(Parser)]
#[command(name = "templar", about = "Build, push, and publish runner template images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and push every template, then upload its manifest
    Publish {
        #[command(flatten)]
        target: TargetArgs,
        /// Bucket receiving `<id>.json` manifests
        #[arg(long)]
        bucket: Option<String>,
        /// Maximum number of templates processed at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Per-template timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Skip docker/gcloud availability checks
        #[arg(long)]
        skip_preflight: bool,
    },
    /// List discovered templates and the images they would produce
    List {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Check Docker, gcloud, and build context readiness
    Doctor {
        /// Build context directory
        #[arg(long, short = 'C', default_value = ".")]
        context: PathBuf,
    },
    /// Manage a single custom environment
    Env {
        #[command(subcommand)]
        action: EnvAction,
    },
}

#[derive(Subcommand)]
enum EnvAction {
    /// Build and push the environment described by dbk.toml and Dockerfile.dbk
    Push {
        /// Environment directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Where templates live and how their images are tagged.
#[derive(Args)]
struct TargetArgs {
    /// Build context directory (holds the Dockerfile and templar.toml)
    #[arg(long, short = 'C', default_value = ".")]
    context: PathBuf,
    /// Templates directory, relative to the build context
    #[arg(long)]
    templates_dir: Option<PathBuf>,
    /// Image registry prefix
    #[arg(long)]
    registry: Option<String>,
    /// Publish mode: `dev` tags `:dev` and skips uploads, `prod` tags `:latest`
    #[arg(long, default_value_t = Mode::Production)]
    mode: Mode,
    /// Shorthand for `--mode dev`
    #[arg(long)]
    dev: bool,
}

impl TargetArgs {
    fn mode(&self) -> Mode {
        if self.dev { Mode::Development } else { self.mode }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="unset or unparsable RUST_LOG falls back to info"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            target,
            bucket,
            concurrency,
            timeout,
            skip_preflight,
        } => {
            let overrides = commands::PublishOverrides {
                bucket,
                concurrency,
                timeout_secs: timeout,
                skip_preflight,
            };
            commands::publish(&target.into(), overrides).await?
        }
        Commands::List { target } => commands::list(&target.into())?,
        Commands::Doctor { context } => commands::doctor(&context).await?,
        Commands::Env { action } => match action {
            EnvAction::Push { dir } => commands::env_push(&dir).await?,
        },
    }

    Ok(())
}

impl From<TargetArgs> for commands::Target {
    fn from(args: TargetArgs) -> Self {
        let mode = args.mode();
        Self {
            context: args.context,
            templates_dir: args.templates_dir,
            registry: args.registry,
            mode,
        }
    }
}
