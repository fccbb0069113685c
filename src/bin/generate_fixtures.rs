use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use pixie_fixtures::{FixtureCatalog, FixtureConfig, UserFeedback};

#[derive(Parser, Debug)]
#[command(name = "generate-fixtures", version, about = "Generate image and mesh test fixtures")]
struct Args {
    /// Fixtures root directory
    #[arg(short, long, default_value = "fixtures")]
    root: PathBuf,

    /// JSON configuration file; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for geometric patterns and mesh jitter
    #[arg(short, long)]
    seed: Option<u64>,

    /// Only generate image fixtures
    #[arg(long, conflicts_with = "meshes_only")]
    images_only: bool,

    /// Only generate mesh fixtures
    #[arg(long)]
    meshes_only: bool,

    /// Encode one fixture at a time
    #[arg(long)]
    sequential: bool,

    /// Print the planned files without writing them
    #[arg(long)]
    list: bool,

    /// Write the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<FixtureConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            FixtureConfig::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => FixtureConfig::default(),
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.images_only {
        config = config.images_only();
    }
    if args.meshes_only {
        config = config.meshes_only();
    }
    if args.sequential {
        config.parallel = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", config.to_json().context("Failed to serialize config")?);
        return Ok(());
    }

    UserFeedback::show_welcome();
    UserFeedback::show_config(&config);

    let catalog = match FixtureCatalog::new(config) {
        Ok(catalog) => catalog,
        Err(e) => {
            UserFeedback::fixture_error(&e);
            return Err(e.into());
        }
    };

    if args.list {
        let plan = catalog.plan()?;
        UserFeedback::show_info(&format!("{} fixtures planned", plan.len()));
        for entry in plan {
            for path in entry.outputs() {
                println!("{}", args.root.join(path).display());
            }
        }
        return Ok(());
    }

    if args.root.read_dir().is_ok_and(|mut dir| dir.next().is_some()) {
        UserFeedback::show_warning(&format!("{} is not empty, existing fixtures will be overwritten", args.root.display()));
    }

    debug!("Writing fixtures to {}", args.root.display());
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").context("Invalid progress template")?);
    spinner.set_message(format!("Generating fixtures in {}", args.root.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = catalog.generate(&args.root);
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            UserFeedback::catalog_finished(&report);
            info!("Done: {} files", report.file_count());
            Ok(())
        }
        Err(e) => {
            UserFeedback::fixture_error(&e);
            Err(e).with_context(|| format!("Fixture generation under {} failed", args.root.display()))
        }
    }
}
