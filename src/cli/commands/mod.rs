pub(super) mod config;
pub(super) mod monitor;
pub(super) mod status;

use std::sync::Arc;

use tracing::info;

use super::CliError;
use crate::{
    config::Config,
    services::{ConnmanService, Presenter, TelephonyService},
};

/// The services enabled in the configuration.
struct Services {
    telephony: Option<TelephonyService>,
    connman: Option<ConnmanService>,
}

impl Services {
    async fn start(config: &Config, presenter: Arc<dyn Presenter>) -> Result<Self, CliError> {
        let telephony = if config.telephony.enabled {
            Some(TelephonyService::start(&config.telephony, presenter.clone()).await?)
        } else {
            info!("Telephony disabled in configuration");
            None
        };

        let connman = if config.connman.enabled {
            Some(ConnmanService::start(&config.connman, presenter).await?)
        } else {
            info!("ConnMan disabled in configuration");
            None
        };

        Ok(Self { telephony, connman })
    }

    fn stop(self) {
        if let Some(telephony) = self.telephony {
            telephony.stop();
        }
        if let Some(connman) = self.connman {
            connman.stop();
        }
    }
}
