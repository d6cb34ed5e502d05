use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{info, instrument};

use super::Services;
use crate::{
    cli::CommandResult,
    config::Config,
    services::{Presenter, TracingPresenter},
};

#[instrument(skip_all)]
pub(crate) async fn execute(config: &Config) -> CommandResult {
    let presenter: Arc<dyn Presenter> = Arc::new(TracingPresenter);
    let services = Services::start(config, presenter).await?;
    info!("Monitoring, press Ctrl-C to stop");

    {
        let mut fleet_status = match &services.telephony {
            Some(telephony) => telephony.status_monitored().boxed(),
            None => stream::pending().boxed(),
        };
        let mut technology_list = match &services.connman {
            Some(connman) => connman
                .technologies_monitored()
                .map(|technologies| technologies.len())
                .boxed(),
            None => stream::pending().boxed(),
        };

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    result?;
                    break;
                }
                Some(status) = fleet_status.next() => {
                    info!(%status, icon = status.icon_name(), "Modem indicator");
                }
                Some(count) = technology_list.next() => {
                    info!(technologies = count, "Technology list changed");
                }
            }
        }
    }

    info!("Stopping");
    services.stop();
    Ok(String::new())
}
