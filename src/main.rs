use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use feedformat::config::{parse_utc_offset, Config};
use feedformat::feed::{Dialect, Feed};

/// Get the config directory path (~/.config/feedformat/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("feedformat"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedformat",
    about = "Format a JSON or TOML feed description as RSS 1.0, RSS 2.0 or Atom 1.0"
)]
struct Args {
    /// Feed description: {"feed": {...}, "items": [...]}
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output dialect (rss1, rss2, atom); defaults to the config file setting
    #[arg(long, short)]
    dialect: Option<Dialect>,

    /// Write to FILE instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Indent the output
    #[arg(long)]
    pretty: bool,

    /// Skip required-field checks
    #[arg(long)]
    no_validate: bool,

    /// Prepend an XML declaration
    #[arg(long)]
    xml_declaration: bool,

    /// Fixed zone for dates ("Z", "+HH:MM" or "-HH:MM"); defaults to the system zone
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    utc_offset: Option<String>,

    /// Config file (default: ~/.config/feedformat/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Read a feed description, choosing the parser from the file extension.
fn read_feed(path: &Path) -> Result<Feed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed description: {}", path.display()))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let feed = if is_toml {
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML feed description: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON feed description: {}", path.display()))?
    };
    Ok(feed)
}

fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(ref path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    let mut options = config
        .format_options()
        .context("Invalid format settings in config file")?;
    if args.pretty {
        options.pretty = true;
    }
    if args.no_validate {
        options.validate = false;
    }
    if args.xml_declaration {
        options.xml_declaration = true;
    }
    if let Some(ref offset) = args.utc_offset {
        let offset = parse_utc_offset(offset).context("Invalid --utc-offset")?;
        options = options.with_utc_offset(offset);
    }

    let dialect = args.dialect.unwrap_or(config.dialect);
    let feed = read_feed(&args.input)?;
    tracing::info!(
        input = %args.input.display(),
        dialect = %dialect,
        entries = feed.items.len(),
        "Formatting feed"
    );

    match args.output {
        Some(ref path) => {
            feed.write_to_file(dialect, path, &options)
                .with_context(|| format!("Failed to write {} feed to {}", dialect, path.display()))?;
            eprintln!("Wrote {} feed to {}", dialect, path.display());
        }
        None => {
            let xml = feed
                .to_xml_string(dialect, &options)
                .with_context(|| format!("Failed to format {} feed", dialect))?;
            println!("{}", xml);
        }
    }

    Ok(())
}
