//! CLI for pctopics
//!
//! Subcommands:
//! - `run`: drive point-cloud topic reconciliation for the configured world
//! - `topics`: print the topic list stored for the world
//! - `add`: append a topic to the stored list

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use pctopics::config::{Settings, load_config};
use pctopics::params::{FileParamStore, ParamStore};
use pctopics::transport::LocalBus;
use pctopics::utils::logging;
use pctopics::world::World;
use pctopics::world::driver::{clamp_rate, run_until};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pctopics")]
enum Command {
    /// Reconcile point cloud topics until interrupted
    Run,
    /// Print the stored point cloud topics
    Topics,
    /// Append a point cloud topic to the stored list
    Add {
        /// Fully qualified topic name, e.g. /ambf/env/pc/lidar
        topic: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cmd = Command::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging.level);

    let result = match cmd {
        Command::Run => run_world(&config).await,
        Command::Topics => print_topics(&config),
        Command::Add { topic } => add_topic(&config, &topic),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

fn open_world(config: &Settings) -> (World, Arc<FileParamStore>, Arc<LocalBus>) {
    let store = Arc::new(FileParamStore::new(&config.params.file));
    let bus = Arc::new(LocalBus::new());
    let world = World::new(
        &config.world.name,
        &config.world.namespace,
        store.clone(),
        bus.clone(),
    );
    (world, store, bus)
}

async fn run_world(config: &Settings) -> pctopics::Result<()> {
    let (world, _store, bus) = open_world(config);
    let rate = clamp_rate(
        config.world.reconcile_hz,
        config.world.freq_min,
        config.world.freq_max,
    );

    info!(
        "World '{}' watching '{}' at {rate} Hz",
        world.name(),
        world.params_key()
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received. Exiting gracefully.");
    };
    run_until(&world, rate, shutdown).await;

    info!("{} subscriptions left on the bus", bus.subscription_count());
    Ok(())
}

fn print_topics(config: &Settings) -> pctopics::Result<()> {
    let (world, store, _bus) = open_world(config);
    for topic in store.list_string_param(world.params_key())? {
        println!("{topic}");
    }
    Ok(())
}

fn add_topic(config: &Settings, topic: &str) -> pctopics::Result<()> {
    let (world, store, _bus) = open_world(config);
    if !Path::new(&config.params.file).exists() {
        store.set_string_param(world.params_key(), &[])?;
    }

    if world.append_point_cloud_topic(topic)? {
        info!("Added '{topic}' to '{}'", world.params_key());
    } else {
        info!("'{topic}' is already listed under '{}'", world.params_key());
    }
    Ok(())
}
