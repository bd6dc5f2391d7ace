use clap::{Parser, Subcommand};
use smelter::settings::{self, Settings};
use smelter::{Pipeline, Plugin};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smelter")]
#[command(about = "Plugin-driven file transformation pipeline")]
#[command(long_about = "\
Plugin-driven file transformation pipeline

Smelter reads every file under a source directory into an in-memory
document store, runs the store through an ordered plugin chain, and
mirrors the result to a destination directory:

  src/
  ├── index.md          # ---\\ntitle: Home\\n--- header becomes metadata,
  │                     # contents shrink to the body
  ├── style.css         # plain files pass through verbatim
  └── bin/deploy.sh     # permission bits are preserved (755 stays 755)

The CLI runs the pipeline with an empty plugin chain — a mirror copy with
front-matter stripping. Plugins are a library-level feature; see the crate
documentation for the Plugin trait.

Settings load from an optional smelter.toml, with flags taking precedence.
Run 'smelter gen-config' to print a documented settings file.")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = "smelter.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a build: clean (optional) → read → write
    Build(BuildArgs),
    /// Print a stock smelter.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Working directory (overrides the settings file)
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Source directory, relative to the working directory
    #[arg(long)]
    source: Option<PathBuf>,

    /// Destination directory, relative to the working directory
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Keep existing destination files instead of cleaning first
    #[arg(long)]
    no_clean: bool,

    /// Treat front-matter blocks as plain content
    #[arg(long)]
    no_frontmatter: bool,

    /// Cap simultaneously open files per build phase
    #[arg(long)]
    max_open_files: Option<usize>,

    /// Glob pattern to exclude from enumeration (repeatable)
    #[arg(long = "ignore")]
    ignores: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => {
            let mut settings = if cli.config.exists() {
                settings::load_settings(&cli.config)?
            } else {
                Settings::default()
            };
            apply_overrides(&mut settings, &args);

            println!("==> Building {}", settings.source().display());
            let plugins: Vec<Box<dyn Plugin>> = Vec::new();
            let files = Pipeline::new(settings.clone()).build(&plugins)?;
            println!(
                "==> Build complete: {} files → {}",
                files.len(),
                settings.destination().display()
            );
        }
        Command::GenConfig => {
            print!("{}", settings::stock_settings_toml());
        }
    }

    Ok(())
}

fn apply_overrides(settings: &mut Settings, args: &BuildArgs) {
    if let Some(directory) = &args.directory {
        settings.set_directory(directory.clone());
    }
    if let Some(source) = &args.source {
        settings.set_source(source.clone());
    }
    if let Some(destination) = &args.destination {
        settings.set_destination(destination.clone());
    }
    if args.no_clean {
        settings.set_clean(false);
    }
    if args.no_frontmatter {
        settings.set_frontmatter(false);
    }
    if args.max_open_files.is_some() {
        settings.set_max_open_files(args.max_open_files);
    }
    settings.add_ignores(args.ignores.iter().cloned());
}
