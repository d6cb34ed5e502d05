use std::{sync::Arc, time::Duration};

use futures::Stream;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, instrument};
use zbus::Connection;

use super::{
    Event, FleetRegistry, ModemStatus, ModemView, TelephonyError, UserAction, dispatch::Dispatcher,
};
use crate::{
    config::TelephonyConfig,
    services::{
        common::{
            Property,
            remote::{self, NamePresence},
        },
        presenter::Presenter,
    },
};

/// oFono modem service.
///
/// Watches `org.ofono` on the system bus and keeps a [`FleetRegistry`]
/// in sync with it on a single task. Dropping the service stops that task
/// and every subscription it holds.
pub struct TelephonyService {
    aggregate: Property<ModemStatus>,
    modems: Property<Vec<ModemView>>,
    bound: Property<bool>,
    events: mpsc::UnboundedSender<Event>,
    name_watch: JoinHandle<()>,
    task: JoinHandle<()>,
}

impl TelephonyService {
    /// Connects to the system bus and starts following oFono.
    ///
    /// oFono does not need to be running; the service binds to it whenever
    /// it appears.
    ///
    /// # Errors
    ///
    /// Returns `TelephonyError::InitializationFailed` if the system bus is
    /// not reachable.
    #[instrument(skip(config, presenter), fields(service = %config.service))]
    pub async fn start(
        config: &TelephonyConfig,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self, TelephonyError> {
        info!("Starting telephony service");

        let connection = Connection::system().await.map_err(|e| {
            TelephonyError::InitializationFailed(format!("D-Bus connection failed: {e}"))
        })?;

        let registry = FleetRegistry::new(Duration::from_secs(config.pin_timeout_secs));
        let aggregate = registry.aggregate();
        let modems = Property::new(Vec::new());
        let bound = Property::new(false);

        let (events, inbox) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(
            connection.clone(),
            config.service.clone(),
            config.wizard.clone(),
            presenter,
            events.clone(),
        );

        let presence = events.clone();
        let name_watch = remote::spawn_name_watch(connection, config.service.clone(), move |p| {
            let event = match p {
                NamePresence::Appeared => Event::ServiceAppeared,
                NamePresence::Vanished => Event::ServiceVanished,
            };
            let _ = presence.send(event);
        });

        let task = tokio::spawn(run(
            registry,
            dispatcher,
            inbox,
            modems.clone(),
            bound.clone(),
        ));

        Ok(Self {
            aggregate,
            modems,
            bound,
            events,
            name_watch,
            task,
        })
    }

    /// Current fleet-wide status.
    pub fn status(&self) -> ModemStatus {
        self.aggregate.get()
    }

    /// Stream of fleet-wide status changes, starting with the current value.
    pub fn status_monitored(&self) -> impl Stream<Item = ModemStatus> + Send {
        self.aggregate.watch()
    }

    /// Snapshot of every tracked modem.
    pub fn modems(&self) -> Vec<ModemView> {
        self.modems.get()
    }

    /// Stream of modem list changes, starting with the current list.
    pub fn modems_monitored(&self) -> impl Stream<Item = Vec<ModemView>> + Send {
        self.modems.watch()
    }

    /// Whether oFono is running and its modems have been enumerated.
    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }

    /// Queues a user action.
    ///
    /// # Errors
    ///
    /// Returns `TelephonyError::ServiceStopped` if the service task has exited.
    pub fn perform(&self, action: UserAction) -> Result<(), TelephonyError> {
        self.events
            .send(Event::Action(action))
            .map_err(|_| TelephonyError::ServiceStopped)
    }

    /// Stops following oFono and releases every subscription.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TelephonyService {
    fn drop(&mut self) {
        self.name_watch.abort();
        self.task.abort();
    }
}

async fn run(
    mut registry: FleetRegistry,
    mut dispatcher: Dispatcher,
    mut inbox: mpsc::UnboundedReceiver<Event>,
    modems: Property<Vec<ModemView>>,
    bound: Property<bool>,
) {
    while let Some(event) = inbox.recv().await {
        for effect in registry.handle(event) {
            dispatcher.execute(effect);
        }

        modems.set(registry.modems());
        bound.set(registry.is_bound());
    }

    debug!("Telephony event loop ended");
}
