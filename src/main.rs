//! Command-line host for the recognition engine.
//!
//! Loads the config and medication catalog from JSON files next to the
//! executable, selects the vision backend (real when an API key is
//! configured, simulated otherwise) and prints the engine's results as
//! JSON for each analysis. The real UI lives elsewhere; this host exists
//! so every public operation can be driven end to end.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;

use medtrack_vision::backend::backend_from_config;
use medtrack_vision::catalog::{load_catalog, KnownMedication};
use medtrack_vision::config::RecognitionConfig;
use medtrack_vision::supply::{evaluate_course_completion, forecast_supply};
use medtrack_vision::{
    estimate_inventory_from_image, estimate_inventory_from_video, reconcile_schedule,
    MedicationRecord, VisionBackend,
};

const USAGE: &str = "usage: medtrack-vision <chart|inventory|video> <uri> | demo";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("demo");

    let config = RecognitionConfig::load_or_default(&sibling_file("config.json"));
    let catalog = load_catalog(&sibling_file("medication_catalog.json"));
    let backend = backend_from_config(&config, &catalog);
    log::info!("using {} backend", backend.name());

    match command {
        "chart" => {
            let uri = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
            run_chart(backend.as_ref(), uri, &catalog, &config)
        }
        "inventory" => {
            let uri = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
            run_inventory(backend.as_ref(), uri, &catalog, &config)
        }
        "video" => {
            let uri = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
            run_video(backend.as_ref(), uri, &catalog, &config)
        }
        "demo" => {
            run_chart(backend.as_ref(), "demo://chart", &catalog, &config)?;
            run_inventory(backend.as_ref(), "demo://shelf", &catalog, &config)?;
            run_video(backend.as_ref(), "demo://clip", &catalog, &config)
        }
        _ => Err(anyhow!(USAGE)),
    }
}

/// Path of a data file sitting next to the executable, falling back to
/// the working directory when the executable path is unavailable.
fn sibling_file(name: &str) -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(name)
}

fn run_chart(
    backend: &dyn VisionBackend,
    uri: &str,
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> Result<()> {
    let annotations = backend
        .annotate_image(uri)
        .with_context(|| format!("chart analysis of {uri} failed"))?;
    let confirmations = reconcile_schedule(&annotations.elements, catalog, config);
    log::info!("{} dose confirmation(s)", confirmations.len());
    println!("{}", serde_json::to_string_pretty(&confirmations)?);
    Ok(())
}

fn run_inventory(
    backend: &dyn VisionBackend,
    uri: &str,
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> Result<()> {
    let annotations = backend
        .annotate_image(uri)
        .with_context(|| format!("inventory analysis of {uri} failed"))?;
    let estimate = estimate_inventory_from_image(
        &annotations.elements,
        &annotations.objects,
        &annotations.labels,
        catalog,
        config,
    );
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    report_supply(
        &estimate.medication_name,
        estimate.estimate.estimated_count,
        catalog,
        config,
    )
}

fn run_video(
    backend: &dyn VisionBackend,
    uri: &str,
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> Result<()> {
    let annotations = backend
        .annotate_video(uri)
        .with_context(|| format!("video analysis of {uri} failed"))?;
    let estimate = estimate_inventory_from_video(
        &annotations.object_tracks,
        &annotations.text_blocks,
        &annotations.labels,
        catalog,
        config,
    );
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    report_supply(&estimate.medication_name, estimate.median_count, catalog, config)
}

/// Follows an inventory estimate with the forecast and course status for
/// the attributed medication, when the catalog knows its dosage.
fn report_supply(
    medication_name: &str,
    estimated_count: u32,
    catalog: &[KnownMedication],
    config: &RecognitionConfig,
) -> Result<()> {
    let Some(medication) = catalog.iter().find(|m| m.name == medication_name) else {
        log::info!("{medication_name} is not in the catalog, skipping forecast");
        return Ok(());
    };
    if medication.daily_dosage == 0 {
        log::info!("no daily dosage on record for {medication_name}, skipping forecast");
        return Ok(());
    }
    let forecast = forecast_supply(
        medication_name,
        estimated_count,
        medication.daily_dosage,
        config.min_stock_days,
    )?;
    println!("{}", serde_json::to_string_pretty(&forecast)?);

    let record = MedicationRecord {
        name: medication_name.to_string(),
        ..Default::default()
    };
    let course = evaluate_course_completion(&record, estimated_count);
    println!("{}", serde_json::to_string_pretty(&course)?);
    Ok(())
}
