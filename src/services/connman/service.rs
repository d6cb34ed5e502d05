use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, instrument, warn};
use zbus::{Connection, zvariant::Value};

use super::{
    ConnmanAction, ConnmanEffect, ConnmanError, ConnmanEvent, MANAGER_INTERFACE, MANAGER_PATH,
    ManagerProperties, Snapshot, TECHNOLOGY_INTERFACE, TechnologyProperties, TechnologyRegistry,
    TechnologyView,
    proxy::{ConnmanManagerProxy, TechnologyProxy},
};
use crate::{
    config::ConnmanConfig,
    services::{
        common::{
            ObjectPath, Property, PropertySet, RemoteFault, Token,
            remote::{self, NamePresence, RemoteTarget},
            tasks::TaskMap,
        },
        presenter::Presenter,
    },
};

/// ConnMan technology service.
///
/// Watches `net.connman` on the system bus and keeps a
/// [`TechnologyRegistry`] in sync with it on a single task.
pub struct ConnmanService {
    technologies: Property<Vec<TechnologyView>>,
    offline_mode: Property<Option<bool>>,
    running: Property<bool>,
    events: mpsc::UnboundedSender<ConnmanEvent>,
    name_watch: JoinHandle<()>,
    task: JoinHandle<()>,
}

impl ConnmanService {
    /// Connects to the system bus and starts following ConnMan.
    ///
    /// # Errors
    ///
    /// Returns `ConnmanError::InitializationFailed` if the system bus is not
    /// reachable.
    #[instrument(skip(config, presenter), fields(service = %config.service))]
    pub async fn start(
        config: &ConnmanConfig,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self, ConnmanError> {
        info!("Starting ConnMan service");

        let connection = Connection::system().await.map_err(|e| {
            ConnmanError::InitializationFailed(format!("D-Bus connection failed: {e}"))
        })?;

        let registry = TechnologyRegistry::new(config.service.clone());
        let offline_mode = registry.offline_mode();
        let technologies = Property::new(Vec::new());
        let running = Property::new(false);

        let (events, inbox) = mpsc::unbounded_channel();
        let driver = Driver {
            connection: connection.clone(),
            service: config.service.clone(),
            presenter,
            events: events.clone(),
            mirrors: TaskMap::new(),
            technology_watch: None,
        };

        let presence = events.clone();
        let name_watch = remote::spawn_name_watch(connection, config.service.clone(), move |p| {
            let event = match p {
                NamePresence::Appeared => ConnmanEvent::ServiceAppeared,
                NamePresence::Vanished => ConnmanEvent::ServiceVanished,
            };
            let _ = presence.send(event);
        });

        let task = tokio::spawn(run(
            registry,
            driver,
            inbox,
            technologies.clone(),
            running.clone(),
        ));

        Ok(Self {
            technologies,
            offline_mode,
            running,
            events,
            name_watch,
            task,
        })
    }

    /// Snapshot of every technology.
    pub fn technologies(&self) -> Vec<TechnologyView> {
        self.technologies.get()
    }

    /// Stream of technology list changes, starting with the current list.
    pub fn technologies_monitored(&self) -> impl Stream<Item = Vec<TechnologyView>> + Send {
        self.technologies.watch()
    }

    /// Current offline mode, `None` while ConnMan is not running.
    pub fn offline_mode(&self) -> Option<bool> {
        self.offline_mode.get()
    }

    /// Whether ConnMan is running and its technologies have been enumerated.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Queues a user action.
    ///
    /// # Errors
    ///
    /// Returns `ConnmanError::ServiceStopped` if the service task has exited.
    pub fn perform(&self, action: ConnmanAction) -> Result<(), ConnmanError> {
        self.events
            .send(ConnmanEvent::Action(action))
            .map_err(|_| ConnmanError::ServiceStopped)
    }

    /// Stops following ConnMan and releases every subscription.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for ConnmanService {
    fn drop(&mut self) {
        self.name_watch.abort();
        self.task.abort();
    }
}

async fn run(
    mut registry: TechnologyRegistry,
    mut driver: Driver,
    mut inbox: mpsc::UnboundedReceiver<ConnmanEvent>,
    technologies: Property<Vec<TechnologyView>>,
    running: Property<bool>,
) {
    while let Some(event) = inbox.recv().await {
        for effect in registry.handle(event) {
            driver.execute(effect);
        }

        technologies.set(registry.technologies());
        running.set(registry.is_bound());
    }

    debug!("ConnMan event loop ended");
}

struct Driver {
    connection: Connection,
    service: String,
    presenter: Arc<dyn Presenter>,
    events: mpsc::UnboundedSender<ConnmanEvent>,
    mirrors: TaskMap,
    technology_watch: Option<JoinHandle<()>>,
}

impl Driver {
    fn execute(&mut self, effect: ConnmanEffect) {
        match effect {
            ConnmanEffect::OpenManager { token } => {
                self.follow(token, MANAGER_PATH.to_string(), MANAGER_INTERFACE);
            }
            ConnmanEffect::OpenTechnology { token, path } => {
                self.follow(token, path, TECHNOLOGY_INTERFACE);
            }
            ConnmanEffect::CloseMirror { token } => {
                self.mirrors.abort(token);
            }
            ConnmanEffect::EnumerateTechnologies { token } => self.enumerate(token),
            ConnmanEffect::WatchTechnologies { token } => self.watch(token),
            ConnmanEffect::UnwatchTechnologies => {
                if let Some(handle) = self.technology_watch.take() {
                    handle.abort();
                }
            }
            ConnmanEffect::SetProperty {
                token,
                path,
                interface,
                name,
                value,
            } => {
                let connection = self.connection.clone();
                let target = RemoteTarget {
                    service: self.service.clone(),
                    path,
                    interface,
                };
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = remote::set_property(&connection, &target, name, Value::from(value))
                        .await
                        .map_err(|err| RemoteFault::new("SetProperty", err));
                    let _ = events.send(ConnmanEvent::CallFinished {
                        token,
                        method: "SetProperty",
                        result,
                    });
                });
            }
            ConnmanEffect::Scan { token, path } => {
                let connection = self.connection.clone();
                let service = self.service.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = async {
                        let technology = TechnologyProxy::builder(&connection)
                            .destination(service)?
                            .path(path)?
                            .build()
                            .await?;
                        technology.scan().await
                    }
                    .await
                    .map_err(|err| RemoteFault::new("Scan", err));
                    let _ = events.send(ConnmanEvent::CallFinished {
                        token,
                        method: "Scan",
                        result,
                    });
                });
            }
            ConnmanEffect::Present(presentation) => self.presenter.present(&presentation),
        }
    }

    fn follow(&mut self, token: Token, path: ObjectPath, interface: &'static str) {
        let connection = self.connection.clone();
        let target = RemoteTarget {
            service: self.service.clone(),
            path,
            interface,
        };
        let snapshots = self.events.clone();
        let changes = self.events.clone();
        let failures = self.events.clone();
        let is_manager = interface == MANAGER_INTERFACE;

        let handle = tokio::spawn(async move {
            let followed = remote::follow_properties(
                connection,
                target,
                move |snapshot| {
                    let result = snapshot
                        .map(|properties| {
                            if is_manager {
                                Snapshot::Manager(ManagerProperties::from_properties(&properties))
                            } else {
                                Snapshot::Technology(TechnologyProperties::from_properties(
                                    &properties,
                                ))
                            }
                        })
                        .map_err(|err| RemoteFault::new("GetProperties", err));
                    let _ = snapshots.send(ConnmanEvent::PropertiesFetched { token, result });
                },
                move |name, value| {
                    let change = if is_manager {
                        Snapshot::Manager(ManagerProperties::from_change(name, value))
                    } else {
                        Snapshot::Technology(TechnologyProperties::from_change(name, value))
                    };
                    let _ = changes.send(ConnmanEvent::PropertyChanged { token, change });
                },
            )
            .await;

            if let Err(err) = followed {
                let _ = failures.send(ConnmanEvent::PropertiesFetched {
                    token,
                    result: Err(RemoteFault::new("PropertyChanged", err)),
                });
            }
        });

        self.mirrors.insert(token, handle);
    }

    fn enumerate(&self, token: Token) {
        let connection = self.connection.clone();
        let service = self.service.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = async {
                let manager = connman_manager(&connection, &service).await?;
                manager.get_technologies().await
            }
            .await
            .map(remote::decode_objects::<TechnologyProperties>)
            .map_err(|err| RemoteFault::new("GetTechnologies", err));

            let _ = events.send(ConnmanEvent::TechnologiesEnumerated { token, result });
        });
    }

    fn watch(&mut self, token: Token) {
        let connection = self.connection.clone();
        let service = self.service.clone();
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let manager = match connman_manager(&connection, &service).await {
                Ok(manager) => manager,
                Err(err) => {
                    warn!("Cannot follow technologies: {err}");
                    return;
                }
            };

            let (mut added, mut removed) = match tokio::try_join!(
                manager.receive_technology_added(),
                manager.receive_technology_removed()
            ) {
                Ok(streams) => streams,
                Err(err) => {
                    warn!("Cannot subscribe to technology signals: {err}");
                    return;
                }
            };

            loop {
                let event = tokio::select! {
                    Some(signal) = added.next() => {
                        let Ok(args) = signal.args() else { continue };
                        ConnmanEvent::TechnologyAdded {
                            token,
                            path: args.path().as_str().to_owned(),
                            properties: TechnologyProperties::from_properties(args.properties()),
                        }
                    }
                    Some(signal) = removed.next() => {
                        let Ok(args) = signal.args() else { continue };
                        ConnmanEvent::TechnologyRemoved {
                            token,
                            path: args.path().as_str().to_owned(),
                        }
                    }
                    else => break,
                };

                if events.send(event).is_err() {
                    break;
                }
            }

            debug!("Technology signals ended");
        });

        if let Some(previous) = self.technology_watch.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Some(handle) = self.technology_watch.take() {
            handle.abort();
        }
    }
}

async fn connman_manager(
    connection: &Connection,
    service: &str,
) -> zbus::Result<ConnmanManagerProxy<'static>> {
    ConnmanManagerProxy::builder(connection)
        .destination(service.to_owned())?
        .build()
        .await
}
