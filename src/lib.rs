pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod insight;
pub mod log;
pub mod provider;
pub mod providers;
pub mod ui;
pub mod validate;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::controller::ConversionController;
use crate::error::PresentedError;
use crate::providers::frankfurter::FrankfurterProvider;
use crate::ui::CliPresenter;
use crate::validate::FormFields;

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Swap {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Currencies,
    Insight {
        from: Option<String>,
        to: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(FrankfurterProvider::new(&config.api.base_url)?);
    let presenter = Arc::new(CliPresenter::new());
    let controller = ConversionController::new(provider, presenter);

    // The catalog loads (or falls back) before any command runs.
    controller.init().await;

    // Omitted pair arguments fall back to the configured defaults; a still
    // missing code surfaces as a validation error.
    let resolve_pair = |from: Option<String>, to: Option<String>| {
        (
            from.or_else(|| config.default_from.clone()).unwrap_or_default(),
            to.or_else(|| config.default_to.clone()).unwrap_or_default(),
        )
    };

    match command {
        AppCommand::Convert { amount, from, to } => {
            let (from, to) = resolve_pair(from, to);
            controller.set_fields(FormFields::new(&amount, &from, &to));
            match controller.submit().await {
                Some(Err(_)) => Err(PresentedError.into()),
                _ => Ok(()),
            }
        }
        AppCommand::Swap { amount, from, to } => {
            // The pair as entered; swap reverses it before converting.
            let (from, to) = resolve_pair(from, to);
            controller.set_fields(FormFields::new(&amount, &from, &to));
            match controller.swap().await {
                Some(Err(_)) => Err(PresentedError.into()),
                _ => Ok(()),
            }
        }
        AppCommand::Currencies => {
            let catalog = controller.catalog();
            for (code, name) in catalog.iter() {
                println!("{code}  {name}");
            }
            Ok(())
        }
        AppCommand::Insight { from, to } => {
            let (from, to) = resolve_pair(from, to);
            controller.set_fields(FormFields::new("1", &from, &to));
            controller
                .insight()
                .await
                .map(|_| ())
                .map_err(|_| PresentedError.into())
        }
    }
}
