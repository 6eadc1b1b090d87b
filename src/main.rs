// quire-styles: inspect and combine style snapshots from the command line
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use quire_core::{sweep, PropertyRegistry, StyleCategory, StyleId, StyleRegistry};
use quire_runtime::{import_snapshot, ImportSummary, StyleSnapshot};

#[derive(Parser)]
#[command(name = "quire-styles")]
#[command(about = "Inspect, merge and prune Quire style snapshots", version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a snapshot of the predefined styles
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List a snapshot's styles in registry order
    List {
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Only list one category (text, paragraph, border, fill)
        #[arg(short, long)]
        category: Option<StyleCategory>,
    },
    /// Import INCOMING over BASE and write the result
    Merge {
        #[arg(value_name = "BASE")]
        base: PathBuf,

        #[arg(value_name = "INCOMING")]
        incoming: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Drop every custom style not named with --keep
    Prune {
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Style id still in use; repeat for several
        #[arg(short, long = "keep", value_name = "ID")]
        keep: Vec<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let schema = PropertyRegistry::new();

    match args.command {
        Command::Export { output } => {
            let registry = StyleRegistry::with_predefined();
            write_snapshot(&StyleSnapshot::capture(&registry), output.as_deref())
        }
        Command::List { snapshot, category } => {
            let mut registry = StyleRegistry::new();
            load_into(&mut registry, &schema, &snapshot)?;
            print_listing(&registry, category);
            Ok(())
        }
        Command::Merge {
            base,
            incoming,
            output,
        } => {
            let mut registry = StyleRegistry::new();
            load_into(&mut registry, &schema, &base)?;
            let summary = load_into(&mut registry, &schema, &incoming)?;
            eprintln!(
                "Merged {}: {} added, {} overwritten, {} fonts added",
                incoming.display(),
                summary.added,
                summary.overwritten,
                summary.fonts_added
            );
            write_snapshot(&StyleSnapshot::capture(&registry), output.as_deref())
        }
        Command::Prune {
            snapshot,
            keep,
            output,
        } => {
            let mut registry = StyleRegistry::new();
            load_into(&mut registry, &schema, &snapshot)?;
            let referenced: HashSet<StyleId> = keep.into_iter().map(StyleId::from).collect();
            let report = sweep(&mut registry, &referenced);
            for (category, id) in &report.removed {
                eprintln!("removed {} style {}", category, id);
            }
            eprintln!("Pruned {} styles", report.count());
            write_snapshot(&StyleSnapshot::capture(&registry), output.as_deref())
        }
    }
}

fn load_into(
    registry: &mut StyleRegistry,
    schema: &PropertyRegistry,
    path: &Path,
) -> Result<ImportSummary> {
    info!("Loading snapshot: {}", path.display());
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = StyleSnapshot::from_json(&json)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    import_snapshot(registry, schema, snapshot)
        .with_context(|| format!("Failed to import snapshot {}", path.display()))
}

fn write_snapshot(snapshot: &StyleSnapshot, output: Option<&Path>) -> Result<()> {
    let json = snapshot
        .to_json_pretty()
        .context("Failed to serialize snapshot")?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {} styles to {}", snapshot.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_listing(registry: &StyleRegistry, only: Option<StyleCategory>) {
    let categories: Vec<StyleCategory> = match only {
        Some(category) => vec![category],
        None => StyleCategory::ALL.to_vec(),
    };

    for category in categories {
        let styles = registry.list_all(category);
        println!("{} ({})", category, styles.len());
        for definition in styles {
            let marker = if definition.is_custom { "custom" } else { "predefined" };
            println!(
                "  {:<16} {:<24} {:<10} {} properties",
                definition.id.as_str(),
                definition.name,
                marker,
                definition.properties.len()
            );
        }
    }

    let fonts = registry.custom_fonts();
    if !fonts.is_empty() && only.is_none() {
        println!("fonts: {}", fonts.join(", "));
    }
}
