//! `leadboard` - CLI for the lead dashboard
//!
//! This binary runs the dashboard server and offers one-shot commands for
//! fetching leads, probing the geocoder and inspecting configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use leadboard::analytics::{self, DashboardMetrics};
use leadboard::cli::{Cli, Command, ConfigCommand, FetchCommand, ServeCommand};
use leadboard::geo::{fill_missing_coordinates, FillLimits};
use leadboard::lead::count_with_coordinates;
use leadboard::store::SmartSuiteSource;
use leadboard::web::{self, AppState};
use leadboard::{init_logging, Config, Geocoder, LeadSource, LeadStore, Refresher, SmartSuiteClient};

const REDACTED: &str = "********";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // `config validate` reports on a file itself, so it must not fail early here
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        let path = file
            .clone()
            .or_else(|| cli.config.clone())
            .unwrap_or_else(Config::default_config_path);
        return handle_validate(&path);
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, &cmd).await,
        Command::Fetch(cmd) => handle_fetch(&config, &cmd).await,
        Command::Geocode(cmd) => handle_geocode(&config, &cmd.place).await,
        Command::Config(cmd) => handle_config(&config, &cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(bind) = &cmd.bind {
        config.server.bind.clone_from(bind);
    }
    config.validate()?;

    if config.smartsuite.api_key.is_empty() {
        tracing::warn!("SmartSuite API key not configured; the dashboard will report a load error");
    }

    let geocoder = Arc::new(Geocoder::from_config(&config.geocoding)?);
    let client = SmartSuiteClient::new(config.smartsuite.clone())?;
    let source: Arc<dyn LeadSource> = Arc::new(SmartSuiteSource::new(
        client,
        Arc::clone(&geocoder),
        FillLimits::from_config(&config.geocoding),
    ));

    let store = LeadStore::new();
    let refresher = Refresher::new(store.clone(), Arc::clone(&source), config.refresh_interval());
    let handle = refresher.handle();
    let task = refresher.spawn();

    let state = Arc::new(AppState::new(config, store, source, geocoder));
    let result = web::serve(state, handle.clone()).await;

    handle.stop();
    task.await.context("refresher task panicked")?;
    result?;
    Ok(())
}

async fn handle_fetch(config: &Config, cmd: &FetchCommand) -> anyhow::Result<()> {
    let client = SmartSuiteClient::new(config.smartsuite.clone())?;
    let mut leads = client.fetch_leads().await?;

    if !cmd.no_geocode {
        let geocoder = Geocoder::from_config(&config.geocoding)?;
        let report = fill_missing_coordinates(
            &mut leads,
            &geocoder,
            &FillLimits::from_config(&config.geocoding),
        )
        .await;
        tracing::info!(
            attempted = report.attempted,
            filled = report.filled,
            "Geocoded missing coordinates"
        );
    }

    let summary = analytics::summarize(&leads);
    let metrics = DashboardMetrics::compute(&leads);

    if cmd.json {
        let output = serde_json::json!({
            "summary": summary,
            "distribution": metrics,
            "leads": leads,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Lead Summary");
    println!("============");
    println!("  Leads:              {}", summary.total_leads);
    println!("  With coordinates:   {}", count_with_coordinates(&leads));
    println!("  Estimated jobs:     {}", summary.total_jobs);
    println!("  Activity types:     {}", summary.total_activity_types);
    println!("  Avg jobs per lead:  {}", summary.avg_jobs_per_lead);

    print_counts("Activity Type", &metrics.activity_counts);
    print_counts("Timeframe", &metrics.timeframe_counts);
    print_counts("Site Type", &metrics.site_type_counts);
    print_counts("State", &metrics.state_counts);
    print_counts("City", &metrics.city_counts);
    Ok(())
}

fn print_counts(title: &str, counts: &analytics::Counts) {
    println!();
    println!("[{title}]");
    if counts.is_empty() {
        println!("  (none)");
        return;
    }
    for (label, count) in analytics::sorted_desc(counts) {
        println!("  {label:<32} {count}");
    }
}

async fn handle_geocode(config: &Config, place: &str) -> anyhow::Result<()> {
    let geocoder = Geocoder::from_config(&config.geocoding)?;
    match geocoder.geocode(place).await {
        Some(result) => {
            println!("{place}");
            println!("  Coordinates:  {}", result.coordinates);
            println!("  Matched:      {}", result.display_name);
            Ok(())
        }
        None => anyhow::bail!("could not find coordinates for \"{place}\""),
    }
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = redacted(config);
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            handle_validate(&path)?;
        }
    }
    Ok(())
}

fn handle_validate(path: &std::path::Path) -> anyhow::Result<()> {
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path.to_path_buf())) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if !config.smartsuite.api_key.is_empty() {
        config.smartsuite.api_key = REDACTED.to_string();
    }
    if config.auth.password.is_some() {
        config.auth.password = Some(REDACTED.to_string());
    }
    if config.debug.key.is_some() {
        config.debug.key = Some(REDACTED.to_string());
    }
    config
}

fn print_config(config: &Config) {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "(unset)".to_string()
        } else {
            value.to_string()
        }
    };

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Server]");
    println!("  Address:            {}", config.bind_address());
    println!("  Public dir:         {}", config.server.public_dir.display());
    println!();
    println!("[SmartSuite]");
    println!("  Base URL:           {}", config.smartsuite.base_url);
    println!("  API key:            {}", or_unset(&config.smartsuite.api_key));
    println!("  Account:            {}", or_unset(&config.smartsuite.account_id));
    println!("  Table:              {}", or_unset(&config.smartsuite.table_id));
    println!("  Timeout (secs):     {}", config.smartsuite.timeout_secs);
    println!();
    println!("[Geocoding]");
    println!("  Enabled:            {}", config.geocoding.enabled);
    println!("  Nominatim:          {}", config.geocoding.nominatim_url);
    println!("  Photon:             {}", config.geocoding.photon_url);
    println!("  Max per refresh:    {}", config.geocoding.max_per_refresh);
    println!("  Batch size:         {}", config.geocoding.batch_size);
    println!();
    println!("[Refresh]");
    println!("  Interval (secs):    {}", config.refresh.interval_secs);
    println!();
    println!("[Auth]");
    println!("  Login required:     {}", config.login_required());
    println!("  Session TTL (min):  {}", config.auth.session_ttl_minutes);
    println!();
    println!("[Debug]");
    println!("  Routes enabled:     {}", config.debug.key.is_some());
}
