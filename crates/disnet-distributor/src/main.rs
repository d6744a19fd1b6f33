// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DIS Link Distributor CLI
//!
//! # Usage
//!
//! ```bash
//! # Run with a configuration file
//! disnet-distributor --config distributor.toml
//!
//! # Generate an example configuration file
//! disnet-distributor gen-config --output distributor.toml
//!
//! # Validate a configuration file
//! disnet-distributor validate --config distributor.toml
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use disnet_distributor::{
    DisLinkConfig, Distributor, DistributorConfig, LinkConfig, ReflectorStatsSnapshot,
    WanLinkConfig,
};

/// DIS Link Distributor
#[derive(Parser, Debug)]
#[command(name = "disnet-distributor")]
#[command(about = "DIS link distributor - relays PDU traffic between exercise networks")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Statistics reporting interval (seconds, 0 to disable)
    #[arg(long, default_value = "10")]
    stats_interval: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "distributor.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::GenConfig { output } => cmd_gen_config(&output),
            Commands::Validate { config } => cmd_validate(&config),
        };
    }

    let config_path = args
        .config
        .ok_or("Missing --config (or use the gen-config subcommand to create one)")?;
    let mut config = DistributorConfig::from_file(&config_path)?;
    if args.stats_interval != 10 {
        config.stats_interval_secs = args.stats_interval;
    }

    let mut distributor = Distributor::new(config.clone())?;

    println!("DIS Link Distributor v{}", env!("CARGO_PKG_VERSION"));
    println!("=====================================");
    println!();
    println!("Distributor: {}", distributor.name());
    for link in distributor.links() {
        println!("  {}", link.describe());
    }
    println!();

    let up = distributor.up_all();
    println!("{}/{} links up", up, distributor.links().len());
    if up == 0 {
        distributor.shutdown();
        return Err("No link came up".into());
    }
    println!("Press Ctrl+C to stop...");
    println!();

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::SeqCst);
    })?;

    let stats_interval = config.stats_interval_secs;
    let mut last_stats = Instant::now();
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(200));
        if stats_interval > 0 && last_stats.elapsed() >= Duration::from_secs(stats_interval) {
            print_stats(&distributor.stats(), &distributor.status());
            last_stats = Instant::now();
        }
    }

    println!("\nShutting down...");
    let final_stats = distributor.stats();
    let final_status = distributor.status();
    distributor.shutdown();

    println!("\nFinal Statistics:");
    print_stats(&final_stats, &final_status);
    Ok(())
}

fn cmd_gen_config(output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = DistributorConfig {
        name: "example-distributor".into(),
        ..Default::default()
    };
    config.add_link(LinkConfig::Dis(
        DisLinkConfig::new("lan", 3000, "192.168.1.255:3000").exercise(1),
    ));
    config.add_link(LinkConfig::Wan(
        WanLinkConfig::new("site-bravo", 4000, "10.0.0.2:4000").bundle(1400, 100),
    ));

    let toml_str = toml::to_string_pretty(&config)?;
    let content = format!(
        "# DIS Link Distributor Configuration\n# Generated by disnet-distributor gen-config\n\n{}",
        toml_str
    );

    std::fs::write(output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match DistributorConfig::from_file(config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Distributor: {}", config.name);
            println!("Links: {}", config.links.len());
            for (i, link) in config.links.iter().enumerate() {
                match link {
                    LinkConfig::Dis(dis) => println!(
                        "  [{}] dis '{}': :{} -> {} (exercise {})",
                        i, dis.name, dis.bind_port, dis.destination, dis.exercise_id
                    ),
                    LinkConfig::Wan(wan) => println!(
                        "  [{}] wan '{}': :{} -> {} (bundle {} B / {} ms)",
                        i, wan.name, wan.bind_port, wan.peer, wan.max_bundle_bytes,
                        wan.max_idle_ms
                    ),
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_stats(stats: &ReflectorStatsSnapshot, status: &[String]) {
    println!("--- Relay Statistics ---");
    println!(
        "  {} messages, {} deliveries, {} failures",
        stats.messages, stats.deliveries, stats.delivery_failures
    );
    for line in status {
        println!("  {}", line);
    }
}
