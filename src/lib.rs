pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::selection::MoveTarget;
use crate::core::config::AppConfig;
use crate::core::{Board, ConversionState, RefreshScheduler};
use crate::providers::RateProvider;
use crate::store::{DiskStore, KeyValueStore, MemoryStore};
use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Show {
        base: Option<String>,
        amount: Option<String>,
    },
    Watch {
        base: Option<String>,
        amount: Option<String>,
    },
    List,
    Catalog,
    Add(String),
    Remove(String),
    Move {
        code: String,
        target: MoveTarget,
    },
}

fn conversion_state(
    config: &AppConfig,
    base: Option<String>,
    amount: Option<String>,
) -> Result<ConversionState> {
    let mut state = config.conversion_state();
    if let Some(base) = base {
        state.base_code = crate::core::currency::resolve(&base)?.code.to_string();
    }
    if let Some(amount) = amount {
        state.base_amount = amount;
    }
    Ok(state)
}

/// Opens the board on the disk store. When storage cannot be opened the
/// board still works on the default selection, but changes are not kept.
fn open_board(config: &AppConfig, conversion: ConversionState) -> Result<Board> {
    let data_path = config.default_data_path()?;
    let store: Arc<dyn KeyValueStore> = match DiskStore::open(&data_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Storage unavailable, selection will not be saved");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(Board::load(store, conversion))
}

/// Opens the board for viewing; an explicitly requested base has to be tracked.
fn open_view(config: &AppConfig, base: Option<String>, amount: Option<String>) -> Result<Board> {
    let requested = base.is_some();
    let conversion = conversion_state(config, base, amount)?;
    let board = open_board(config, conversion.clone())?;
    if requested && board.conversion().base_code != conversion.base_code {
        bail!(
            "{} is not tracked; run `fxboard add {}` first",
            conversion.base_code,
            conversion.base_code
        );
    }
    Ok(board)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Show { base, amount } => {
            let mut board = open_view(&config, base, amount)?;
            let scheduler = RefreshScheduler::new(RateProvider::from_config(&config)?);
            cli::show::run(&mut board, &scheduler).await
        }
        AppCommand::Watch { base, amount } => {
            let mut board = open_view(&config, base, amount)?;
            let mut scheduler = RefreshScheduler::new(RateProvider::from_config(&config)?);
            let interval = Duration::from_secs(config.refresh_interval_secs.max(1));
            cli::watch::run(&mut board, &mut scheduler, interval).await
        }
        AppCommand::List => {
            let board = open_board(&config, config.conversion_state())?;
            println!("{}", cli::selection::list(&board));
            Ok(())
        }
        AppCommand::Catalog => {
            let board = open_board(&config, config.conversion_state())?;
            println!("{}", cli::selection::catalog(&board));
            Ok(())
        }
        AppCommand::Add(code) => {
            let mut board = open_board(&config, config.conversion_state())?;
            println!("{}", cli::selection::add(&mut board, &code)?);
            Ok(())
        }
        AppCommand::Remove(code) => {
            let mut board = open_board(&config, config.conversion_state())?;
            println!("{}", cli::selection::remove(&mut board, &code)?);
            Ok(())
        }
        AppCommand::Move { code, target } => {
            let mut board = open_board(&config, config.conversion_state())?;
            println!(
                "{}",
                cli::selection::move_currency(&mut board, &code, &target)?
            );
            Ok(())
        }
    }
}
