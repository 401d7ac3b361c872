//! NPC Generator - command line front end
//!
//! Loads a TOML schema, generates a population and prints it as CSV or JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use npc_generator::core::config::GenerationConfig;
use npc_generator::core::error::{NpcError, Result};
use npc_generator::definition::load_schema_file;
use npc_generator::export::to_csv;
use npc_generator::generation::{NpcFactory, NpcGroup, RandomSource, RngSource};
use npc_generator::schema::Replacement;
use npc_generator::validation::ValidationReport;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Generate NPC trait sets from a schema definition
#[derive(Parser, Debug)]
#[command(name = "npc-generator")]
#[command(about = "Generate NPCs from a TOML trait schema")]
struct Args {
    /// Schema definition file (TOML)
    #[arg(long)]
    schema: PathBuf,

    /// Number of NPCs to generate (overrides the config file)
    #[arg(long)]
    count: Option<usize>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Replace a trait's visible name, e.g. "Animal:Velociraptor=Tyrannosaurus Rex"
    #[arg(long = "replace", value_name = "CATEGORY:TRAIT=NAME")]
    replacements: Vec<Replacement>,

    /// Generation config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Skip checking the generated NPCs against the schema
    #[arg(long)]
    no_validate: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    npcs: &'a NpcGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a ValidationReport>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("npc_generator=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::new(),
    };
    if let Some(count) = args.count {
        config.npc_count = count;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_validate {
        config.validate_output = false;
    }
    config.validate().map_err(NpcError::Config)?;

    let schema = load_schema_file(&args.schema)?;
    for replacement in &args.replacements {
        if !schema.is_replaceable(&replacement.original) {
            tracing::warn!(
                "'{}' is not declared replaceable in {}",
                replacement.original,
                args.schema.display()
            );
        }
    }

    let mut random: Box<dyn RandomSource> = match config.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::secure()),
    };
    let group = NpcFactory::create(
        &schema,
        config.npc_count,
        &args.replacements,
        random.as_mut(),
    )?;

    let report = if config.validate_output {
        let report = NpcFactory::find_violations(&group, &schema, &args.replacements);
        for violation in &report.category_violations {
            tracing::warn!("{}", violation);
        }
        for (index, violations) in report.npc_violations.iter().enumerate() {
            for violation in violations {
                tracing::warn!("NPC {}: {}", index, violation);
            }
        }
        Some(report)
    } else {
        None
    };

    match args.format {
        OutputFormat::Csv => print!("{}", to_csv(&group, &config.trait_delimiter)),
        OutputFormat::Json => {
            let output = JsonOutput {
                npcs: &group,
                violations: report.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
