//! Underworld inventory console
//!
//! Interactive front end for the inventory engine: open and close
//! containers, pick up and drop objects, combine items, save and load.
//!
//! Run with: cargo run -p uw_console
//!       or: cargo run --bin uwinv

mod config;
mod console;

use config::ConsoleConfig;
use console::Console;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use uw_inventory::{CombineRuleEngine, Inventory, InventoryError, ObjectProperties};
use uw_savegame::SaveManager;

fn main() -> ExitCode {
    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    config.print_summary();

    let inventory = match build_inventory(&config) {
        Ok(inventory) => inventory,
        Err(e) => {
            log::error!("Failed to set up inventory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let saves = SaveManager::new(&config.save_dir);
    let mut console = Console::new(inventory, saves).with_player_name(&config.player_name);

    println!("Underworld inventory console, type 'help' for commands");
    let stdin = io::stdin();
    match console.run(stdin.lock(), &mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Console failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_inventory(config: &ConsoleConfig) -> Result<Inventory, InventoryError> {
    let properties = match &config.properties {
        Some(path) => ObjectProperties::load(path)?,
        None => ObjectProperties::new(),
    };

    let combine_rules = match &config.combine_rules {
        Some(path) => {
            let rules = CombineRuleEngine::from_bytes(&std::fs::read(path)?)?;
            log::info!("Loaded {} combine rules from {}", rules.len(), path.display());
            rules
        }
        None => CombineRuleEngine::new(),
    };

    let mut inventory = Inventory::with_config(config.inventory())
        .with_properties(Arc::new(properties))
        .with_combine_rules(Arc::new(combine_rules));
    inventory.create();
    Ok(inventory)
}
