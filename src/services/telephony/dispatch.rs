use std::sync::Arc;

use futures::{StreamExt, future, stream};
use tokio::{process::Command, sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};
use zbus::{Connection, zvariant::Value};

use super::{
    Effect, Event, Interface, PinKind, PropertyUpdate, PropertyWrite,
    proxy::{ConnectionManagerProxy, OfonoManagerProxy, SimManagerProxy},
};
use crate::services::{
    common::{
        ObjectPath, PropertySet, RemoteFault, Token,
        remote::{self, RemoteTarget},
        tasks::TaskMap,
    },
    presenter::{CredentialResponse, Presentation, Presenter},
    telephony::{ContextProperties, INTERNET_CONTEXT, ModemProperties},
};

/// Carries out the effects of the fleet registry.
///
/// Long-lived work (signal subscriptions, prompt timers, open prompts) is
/// kept by token so it can be aborted as soon as the registry says so.
/// One-shot calls are fire-and-forget; their completions come back as
/// events and are dropped by the registry when the token is dead.
pub(crate) struct Dispatcher {
    connection: Connection,
    service: String,
    wizard: String,
    presenter: Arc<dyn Presenter>,
    events: mpsc::UnboundedSender<Event>,
    mirrors: TaskMap,
    timers: TaskMap,
    prompts: TaskMap,
    contexts: TaskMap,
    modem_watch: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(
        connection: Connection,
        service: String,
        wizard: String,
        presenter: Arc<dyn Presenter>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            connection,
            service,
            wizard,
            presenter,
            events,
            mirrors: TaskMap::new(),
            timers: TaskMap::new(),
            prompts: TaskMap::new(),
            contexts: TaskMap::new(),
            modem_watch: None,
        }
    }

    pub fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::OpenMirror {
                token,
                interface,
                path,
            } => self.open_mirror(token, interface, path),
            Effect::CloseMirror { token } => {
                self.mirrors.abort(token);
                self.contexts.abort(token);
            }
            Effect::EnumerateModems { token } => self.enumerate_modems(token),
            Effect::WatchModems { token } => self.watch_modems(token),
            Effect::UnwatchModems => {
                if let Some(handle) = self.modem_watch.take() {
                    handle.abort();
                }
            }
            Effect::FollowContexts { token, modem } => self.follow_contexts(token, modem),
            Effect::AddContext { token, modem } => self.add_context(token, modem),
            Effect::SetProperty { token, path, write } => self.set_property(token, path, write),
            Effect::EnterPin { modem, kind, pin } => {
                self.unlock(modem, kind, move |sim| async move {
                    sim.enter_pin(kind.as_ofono(), &pin).await
                });
            }
            Effect::ResetPin {
                modem,
                kind,
                puk,
                new_pin,
            } => {
                self.unlock(modem, kind, move |sim| async move {
                    sim.reset_pin(kind.as_ofono(), &puk, &new_pin).await
                });
            }
            Effect::StartTimer { token, after } => {
                let events = self.events.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = events.send(Event::PromptExpired { token });
                });
                self.timers.insert(token, handle);
            }
            Effect::CancelTimer { token } => {
                self.timers.abort(token);
            }
            Effect::LaunchWizard { modem } => self.launch_wizard(&modem),
            Effect::Present(Presentation::Prompt(request)) => {
                self.prompts.prune();

                let token = request.token;
                let presenter = Arc::clone(&self.presenter);
                let events = self.events.clone();
                let handle = tokio::spawn(async move {
                    let event = match presenter.prompt_credential(request).await {
                        CredentialResponse::Submitted(credential) => {
                            Event::CredentialEntered { token, credential }
                        }
                        CredentialResponse::Cancelled => Event::CredentialCancelled { token },
                    };
                    let _ = events.send(event);
                });
                self.prompts.insert(token, handle);
            }
            Effect::Present(Presentation::Dismiss(token)) => {
                self.prompts.abort(token);
                self.presenter.dismiss_credential(token);
            }
            Effect::Present(presentation) => self.presenter.present(&presentation),
        }
    }

    fn target(&self, path: ObjectPath, interface: Interface) -> RemoteTarget {
        RemoteTarget {
            service: self.service.clone(),
            path,
            interface: interface.name(),
        }
    }

    fn open_mirror(&mut self, token: Token, interface: Interface, path: ObjectPath) {
        let target = self.target(path, interface);
        let connection = self.connection.clone();
        let snapshots = self.events.clone();
        let changes = self.events.clone();
        let failures = self.events.clone();

        let handle = tokio::spawn(async move {
            let followed = remote::follow_properties(
                connection,
                target,
                move |snapshot| {
                    let result = snapshot
                        .map(|properties| PropertyUpdate::from_properties(interface, &properties))
                        .map_err(|err| RemoteFault::new("GetProperties", err));
                    let _ = snapshots.send(Event::PropertiesFetched { token, result });
                },
                move |name, value| {
                    let update = PropertyUpdate::from_change(interface, name, value);
                    if !update.is_empty() {
                        let _ = changes.send(Event::PropertyChanged { token, update });
                    }
                },
            )
            .await;

            if let Err(err) = followed {
                let _ = failures.send(Event::PropertiesFetched {
                    token,
                    result: Err(RemoteFault::new("PropertyChanged", err)),
                });
            }
        });

        self.mirrors.insert(token, handle);
    }

    /// Follows the contexts of one connection manager.
    ///
    /// `GetContexts` is only issued once both context signals are
    /// subscribed, and its reply reaches the registry ahead of them.
    fn follow_contexts(&mut self, token: Token, modem: ObjectPath) {
        let connection = self.connection.clone();
        let service = self.service.clone();
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let proxy = match connection_manager(&connection, &service, &modem).await {
                Ok(proxy) => proxy,
                Err(err) => {
                    warn!(%modem, "Cannot follow contexts: {err}");
                    return;
                }
            };

            let (added, removed) = match tokio::try_join!(
                proxy.receive_context_added(),
                proxy.receive_context_removed()
            ) {
                Ok(streams) => streams,
                Err(err) => {
                    warn!(%modem, "Cannot subscribe to context signals: {err}");
                    return;
                }
            };

            let added = added.filter_map(move |signal| {
                future::ready(signal.args().ok().map(|args| Event::ContextAdded {
                    token,
                    path: args.path().as_str().to_owned(),
                    properties: ContextProperties::from_properties(args.properties()),
                }))
            });
            let removed = removed.filter_map(move |signal| {
                future::ready(signal.args().ok().map(|args| Event::ContextRemoved {
                    token,
                    path: args.path().as_str().to_owned(),
                }))
            });

            let listing = async {
                let result = proxy
                    .get_contexts()
                    .await
                    .map(remote::decode_objects::<ContextProperties>)
                    .map_err(|err| RemoteFault::new("GetContexts", err));
                Event::ContextsEnumerated { token, result }
            };

            remote::list_then_follow(listing, stream::select(added, removed), |event| {
                events.send(event).is_ok()
            })
            .await;

            debug!(%modem, "Context signals ended");
        });

        self.contexts.insert(token, handle);
    }

    fn enumerate_modems(&self, token: Token) {
        let connection = self.connection.clone();
        let service = self.service.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = async {
                let manager = ofono_manager(&connection, &service).await?;
                manager.get_modems().await
            }
            .await
            .map(remote::decode_objects::<ModemProperties>)
            .map_err(|err| RemoteFault::new("GetModems", err));

            let _ = events.send(Event::ModemsEnumerated { token, result });
        });
    }

    fn watch_modems(&mut self, token: Token) {
        let connection = self.connection.clone();
        let service = self.service.clone();
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let manager = match ofono_manager(&connection, &service).await {
                Ok(manager) => manager,
                Err(err) => {
                    warn!("Cannot follow modems: {err}");
                    return;
                }
            };

            let (mut added, mut removed) = match tokio::try_join!(
                manager.receive_modem_added(),
                manager.receive_modem_removed()
            ) {
                Ok(streams) => streams,
                Err(err) => {
                    warn!("Cannot subscribe to modem signals: {err}");
                    return;
                }
            };

            loop {
                let event = tokio::select! {
                    Some(signal) = added.next() => {
                        let Ok(args) = signal.args() else { continue };
                        Event::ModemAdded {
                            token,
                            path: args.path().as_str().to_owned(),
                            properties: ModemProperties::from_properties(args.properties()),
                        }
                    }
                    Some(signal) = removed.next() => {
                        let Ok(args) = signal.args() else { continue };
                        Event::ModemRemoved {
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

            debug!("Modem signals ended");
        });

        if let Some(previous) = self.modem_watch.replace(handle) {
            previous.abort();
        }
    }

    fn add_context(&self, token: Token, modem: ObjectPath) {
        let connection = self.connection.clone();
        let service = self.service.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = async {
                let proxy = connection_manager(&connection, &service, &modem).await?;
                proxy.add_context(INTERNET_CONTEXT).await
            }
            .await
            .map(|path| path.as_str().to_owned())
            .map_err(|err| RemoteFault::new("AddContext", err));

            let _ = events.send(Event::ContextCreated { token, result });
        });
    }

    fn set_property(&self, token: Token, path: ObjectPath, write: PropertyWrite) {
        let connection = self.connection.clone();
        let target = self.target(path, write.interface());
        let events = self.events.clone();

        tokio::spawn(async move {
            let result =
                remote::set_property(&connection, &target, write.name(), Value::from(write.value()))
                    .await
                    .map_err(|err| RemoteFault::new("SetProperty", err));

            let _ = events.send(Event::WriteFinished {
                token,
                write,
                result,
            });
        });
    }

    /// Runs one unlock call. The outcome shows up as a SIM property change.
    fn unlock<F, Fut>(&self, modem: ObjectPath, kind: PinKind, call: F)
    where
        F: FnOnce(SimManagerProxy<'static>) -> Fut + Send + 'static,
        Fut: Future<Output = zbus::Result<()>> + Send,
    {
        let connection = self.connection.clone();
        let service = self.service.clone();

        tokio::spawn(async move {
            let result = match sim_manager(&connection, &service, &modem).await {
                Ok(sim) => call(sim).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => debug!(%modem, %kind, "Unlock call accepted"),
                Err(err) => warn!(%modem, %kind, "Unlock call failed: {err}"),
            }
        });
    }

    fn launch_wizard(&self, modem: &str) {
        match Command::new(&self.wizard).arg("-p").arg(modem).spawn() {
            Ok(_) => debug!(modem, wizard = %self.wizard, "Wizard launched"),
            Err(err) => warn!(modem, wizard = %self.wizard, "Cannot launch wizard: {err}"),
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if let Some(handle) = self.modem_watch.take() {
            handle.abort();
        }
    }
}

async fn ofono_manager(
    connection: &Connection,
    service: &str,
) -> zbus::Result<OfonoManagerProxy<'static>> {
    OfonoManagerProxy::builder(connection)
        .destination(service.to_owned())?
        .build()
        .await
}

async fn connection_manager(
    connection: &Connection,
    service: &str,
    modem: &str,
) -> zbus::Result<ConnectionManagerProxy<'static>> {
    ConnectionManagerProxy::builder(connection)
        .destination(service.to_owned())?
        .path(modem.to_owned())?
        .build()
        .await
}

async fn sim_manager(
    connection: &Connection,
    service: &str,
    modem: &str,
) -> zbus::Result<SimManagerProxy<'static>> {
    SimManagerProxy::builder(connection)
        .destination(service.to_owned())?
        .path(modem.to_owned())?
        .build()
        .await
}
