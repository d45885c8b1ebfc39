use clap::{Parser, Subcommand};
use gallerist::imaging::RustBackend;
use gallerist::render::ThemeSource;
use gallerist::{config, generate, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "gallerist")]
#[command(about = "Static HTML gallery generator for directory trees of photos")]
#[command(long_about = "\
Static HTML gallery generator for directory trees of photos

Every directory below SOURCE becomes an album. An index.html is written into
each album directory, linking to its sub-albums and listing its images.

Gallery structure:

  photos/
  ├── index.html                   # Written: root album page
  ├── theme/                       # Written: copy of the selected theme
  ├── vacation/
  │   ├── album_description        # Optional metadata, one assignment per line
  │   ├── beach.jpg
  │   ├── thumbnails/beach.jpg     # Produced elsewhere, referenced by pages
  │   └── index.html               # Written
  └── family/
      └── 2019/

album_description keys:
  album_name = My Trip             # Page title (default: directory name, capitalized)
  album_description = Sun and sea  # Free text shown on the page
  album_representative = beach.jpg # Image linked from the parent page

Run 'gallerist gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = config::SETTINGS_FILE, global = true)]
    config: PathBuf,

    /// Directory containing the themes (the default theme is built in)
    #[arg(long, default_value = "themes", global = true)]
    themes_dir: PathBuf,

    /// Theme name (overrides the settings file)
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate album pages for the gallery at SOURCE
    Build { source: PathBuf },
    /// Scan the gallery and print the album tree without writing anything
    Check { source: PathBuf },
    /// Print the scanned album store as JSON
    Scan { source: PathBuf },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(cli.verbose)?;

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut settings = config::load_settings(&cli.config)?;
    if let Some(theme) = cli.theme {
        settings.theme = theme;
    }
    settings.validate()?;

    match cli.command {
        Command::Build { source } => {
            let theme = ThemeSource::locate(&cli.themes_dir, &settings.theme);
            println!("==> Building {}", source.display());
            let report = generate::generate(&source, &settings, &theme)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", report.store.root().display());
        }
        Command::Check { source } => {
            println!("==> Checking {}", source.display());
            let store = generate::prepare(&source, &settings, &RustBackend::new())?;
            output::print_scan_output(&store);
            println!("==> Gallery is valid");
        }
        Command::Scan { source } => {
            let store = generate::prepare(&source, &settings, &RustBackend::new())?;
            info!("Scanned {} albums", store.len());
            println!("{}", serde_json::to_string_pretty(&store)?);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Install the global subscriber: warnings by default, more with each `-v`.
fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
