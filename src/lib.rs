pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::cache::{KeyValueCollection, Store};
use crate::core::config::AppConfig;
use crate::core::Period;
use anyhow::{Context, Result};
use std::sync::Arc;
use store::KeyValueStore;
use tracing::{debug, info};

/// Commands that need a loaded configuration and a backend.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Balance {
        period: Period,
        json: bool,
    },
    Advances {
        period: Period,
    },
    Withdraw {
        participant: String,
        period: Period,
        amount: String,
    },
    Transfer {
        from: String,
        to: String,
        amount: String,
        date: Option<String>,
        period: Option<Period>,
    },
}

fn reports_collection(config: &AppConfig) -> Result<Arc<dyn KeyValueCollection>> {
    let store = KeyValueStore::open(&config.default_data_path()?);
    store
        .get_collection(cli::balance::REPORTS_COLLECTION, true, true)
        .or_else(|| {
            debug!("Falling back to in-memory report store");
            store.get_collection(cli::balance::REPORTS_COLLECTION, false, true)
        })
        .context("Could not open report store")
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("parkledger starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ledger = providers::RestLedger::new(&config.backend.base_url)?;
    let roster = &config.participants;

    match command {
        AppCommand::Balance { period, json } => {
            let reports = reports_collection(&config)?;
            cli::balance::run(
                &ledger,
                reports.as_ref(),
                roster,
                period,
                &config.currency,
                json,
            )
            .await
        }
        AppCommand::Advances { period } => {
            cli::advances::run(&ledger, period, &config.currency).await
        }
        AppCommand::Withdraw {
            participant,
            period,
            amount,
        } => cli::withdraw::run(&ledger, roster, &participant, period, &amount)
            .await
            .map(|_| ()),
        AppCommand::Transfer {
            from,
            to,
            amount,
            date,
            period,
        } => cli::transfer::run(&ledger, roster, &from, &to, &amount, date.as_deref(), period)
            .await
            .map(|_| ()),
    }
}
