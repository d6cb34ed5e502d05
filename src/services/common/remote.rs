use std::{collections::HashMap, pin::pin};

use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zbus::{
    Connection, Proxy, fdo,
    names::BusName,
    zvariant::{OwnedObjectPath, OwnedValue, Value},
};

use super::{ObjectPath, PropertySet};

/// One remote object addressed by service, path and interface.
#[derive(Debug, Clone)]
pub(crate) struct RemoteTarget {
    pub service: String,
    pub path: String,
    pub interface: &'static str,
}

impl RemoteTarget {
    async fn proxy(&self, connection: &Connection) -> zbus::Result<Proxy<'static>> {
        Proxy::new(
            connection,
            self.service.clone(),
            self.path.clone(),
            self.interface,
        )
        .await
    }
}

/// Follows the `GetProperties` / `PropertyChanged` pair of one remote object.
///
/// The change subscription is established before the bulk fetch is issued,
/// and the snapshot is delivered before any buffered notification, so the
/// receiver sees every change at least once and in bus order. Runs until
/// the signal stream ends or the task is aborted.
///
/// # Errors
/// Returns error if the proxy or the signal subscription cannot be created.
/// A failed bulk fetch is reported through `on_snapshot` instead.
pub(crate) async fn follow_properties<S, C>(
    connection: Connection,
    target: RemoteTarget,
    on_snapshot: S,
    mut on_change: C,
) -> zbus::Result<()>
where
    S: FnOnce(zbus::Result<HashMap<String, OwnedValue>>),
    C: FnMut(&str, &Value<'_>),
{
    let proxy = target.proxy(&connection).await?;
    let mut changes = proxy.receive_signal("PropertyChanged").await?;

    let snapshot = proxy
        .call::<_, _, HashMap<String, OwnedValue>>("GetProperties", &())
        .await;
    on_snapshot(snapshot);

    while let Some(message) = changes.next().await {
        match message.body().deserialize::<(String, OwnedValue)>() {
            Ok((name, value)) => on_change(&name, &value),
            Err(err) => debug!(path = %target.path, "Ignoring malformed PropertyChanged: {err}"),
        }
    }

    debug!(path = %target.path, interface = target.interface, "Property stream ended");
    Ok(())
}

/// Delivers an enumeration reply, then the notifications that follow it.
///
/// `changes` must already be subscribed when this is called and `listing`
/// must not have been polled yet, so nothing emitted between the two is
/// lost. The listing goes out before any buffered notification. Stops when
/// `deliver` returns `false` or the stream ends.
pub(crate) async fn list_then_follow<T, L, S, D>(listing: L, changes: S, mut deliver: D)
where
    L: Future<Output = T>,
    S: Stream<Item = T>,
    D: FnMut(T) -> bool,
{
    if !deliver(listing.await) {
        return;
    }

    let mut changes = pin!(changes);
    while let Some(change) = changes.next().await {
        if !deliver(change) {
            break;
        }
    }
}

/// Issues `SetProperty(name, value)` on a remote object.
///
/// # Errors
/// Returns error if the proxy cannot be created or the call fails.
pub(crate) async fn set_property(
    connection: &Connection,
    target: &RemoteTarget,
    name: &str,
    value: Value<'_>,
) -> zbus::Result<()> {
    let proxy = target.proxy(connection).await?;
    proxy.call::<_, _, ()>("SetProperty", &(name, value)).await
}

/// Decodes an `a(oa{sv})` enumeration reply into typed records.
pub(crate) fn decode_objects<P: PropertySet>(
    objects: Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>,
) -> Vec<(ObjectPath, P)> {
    objects
        .into_iter()
        .map(|(path, properties)| (path.as_str().to_owned(), P::from_properties(&properties)))
        .collect()
}

/// Presence of a well-known bus name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NamePresence {
    Appeared,
    Vanished,
}

/// Watches a well-known bus name and reports its owner coming and going.
///
/// The current state is reported once the owner-change subscription is in
/// place. An owner hand-over is reported as a vanish followed by an appear.
pub(crate) fn spawn_name_watch<F>(connection: Connection, name: String, notify: F) -> JoinHandle<()>
where
    F: Fn(NamePresence) + Send + 'static,
{
    tokio::spawn(async move {
        let dbus = match fdo::DBusProxy::new(&connection).await {
            Ok(proxy) => proxy,
            Err(e) => {
                warn!("Failed to create DBus proxy for {name}: {e}");
                return;
            }
        };

        let mut owner_changes = match dbus.receive_name_owner_changed().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to subscribe to NameOwnerChanged for {name}: {e}");
                return;
            }
        };

        let has_owner = match BusName::try_from(name.as_str()) {
            Ok(bus_name) => dbus.name_has_owner(bus_name).await.unwrap_or_else(|e| {
                warn!("Failed to query owner of {name}: {e}");
                false
            }),
            Err(e) => {
                warn!("Invalid bus name {name}: {e}");
                return;
            }
        };

        if has_owner {
            notify(NamePresence::Appeared);
        } else {
            notify(NamePresence::Vanished);
        }

        while let Some(signal) = owner_changes.next().await {
            let Ok(args) = signal.args() else {
                continue;
            };

            if args.name().as_str() != name {
                continue;
            }

            match (args.old_owner().is_some(), args.new_owner().is_some()) {
                (_, false) => notify(NamePresence::Vanished),
                (false, true) => notify(NamePresence::Appeared),
                (true, true) => {
                    notify(NamePresence::Vanished);
                    notify(NamePresence::Appeared);
                }
            }
        }
    })
}
