mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use rootsphere::config::Config;
use rootsphere::datasources::ModelStore;
use rootsphere::logic::{AgronomyTables, NutrientStandards, RecommendationService};
use rootsphere::models::RecommendationRequest;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Recommend { input, pretty } => recommend(&cli, input, *pretty),
        Commands::Standards { crop, stage } => {
            standards(crop, stage);
            Ok(())
        }
        Commands::Check => check(&cli),
        Commands::Init => {
            Config::setup_interactive(cli.config.clone())?;
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON output
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn recommend(cli: &Cli, input: &Path, pretty: bool) -> Result<()> {
    let request: RecommendationRequest = serde_json::from_str(&read_input(input)?)
        .with_context(|| format!("Invalid recommendation request in {}", input.display()))?;

    let config = Config::load_or_default(cli.config.clone())?;
    let models_dir = config.models_dir(cli.models_dir.as_ref())?;
    let store = Arc::new(ModelStore::open(models_dir));
    let service = RecommendationService::from_store(store, &config);

    let recommendation = service.handle(&request);
    let json = if pretty {
        serde_json::to_string_pretty(&recommendation)?
    } else {
        serde_json::to_string(&recommendation)?
    };
    println!("{}", json);
    Ok(())
}

fn standards(crop: &str, stage: &str) {
    let standards = NutrientStandards::builtin();
    let agronomy = AgronomyTables::builtin();
    let t = standards.lookup(crop, stage);
    let target = agronomy.fertilizer_target(crop, stage);

    println!("{}", t.description);
    println!();
    println!("Soil thresholds");
    println!("  Nitrogen    >= {:.0} kg/ha", t.n_min);
    println!("  Phosphorus  >= {:.0} kg/ha", t.p_min);
    println!("  Potassium   >= {:.0} kg/ha", t.k_min);
    println!("  pH          {:.1} - {:.1}", t.ph_range.0, t.ph_range.1);
    println!("  Moisture    >= {:.0}%", t.moisture_min);
    println!();
    println!("Irrigation");
    println!("  Trigger below {:.0}% moisture", agronomy.moisture_threshold(crop));
    println!("  Volume        {:.0} L/acre", agronomy.irrigation_liters(crop));
    println!();
    println!(
        "Fertilizer target  N {:.0} / P {:.0} / K {:.0} kg/acre",
        target.n, target.p, target.k
    );
    println!();
    println!("Sources");
    for source in &t.sources {
        println!("  - {}", source);
    }
}

fn check(cli: &Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.clone()).context("Config is invalid")?;
    println!("Config: OK");

    let models_dir = config.models_dir(cli.models_dir.as_ref())?;
    if !models_dir.exists() {
        println!("Models: directory {} does not exist", models_dir.display());
        println!("  Recommendations will use the live forecast and threshold checks only.");
        return Ok(());
    }

    let store = ModelStore::open(&models_dir);
    println!("Models: {}", store.dir().display());

    if store.classifier().is_some() {
        println!("  Soil classifier: OK");
    } else {
        println!("  Soil classifier: NOT AVAILABLE");
    }

    let fields = store.field_models_on_disk()?;
    if fields.is_empty() {
        println!("  Rainfall models: none");
    }
    for field_id in fields {
        match store.rainfall_model(&field_id) {
            Ok(Some(_)) => println!("  Rainfall model {}: OK", field_id),
            Ok(None) => println!("  Rainfall model {}: MISSING", field_id),
            Err(e) => println!("  Rainfall model {}: ERROR ({})", field_id, e),
        }
    }

    Ok(())
}
