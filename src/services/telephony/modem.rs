use tracing::{debug, info, warn};

use super::{
    Effect, Event, Interface, ModemProperties, ModemStatus, ModemView, PropertyWrite, UserAction,
    derive_status,
    outbox::Outbox,
    subsystems::{self, ConnectionSubsystem, SimSubsystem},
};
use crate::services::{
    common::{Mirror, ObjectPath, Token},
    presenter::Presentation,
};

/// One hardware modem and the subsystems it advertises.
#[derive(Debug)]
pub(crate) struct Modem {
    path: ObjectPath,
    mirror: Mirror<ModemProperties>,
    sim: Option<SimSubsystem>,
    connection: Option<ConnectionSubsystem>,
    status: ModemStatus,
    shown: Option<ModemView>,
}

impl Modem {
    /// Opens the modem mirror, seeded with the properties from the
    /// enumeration or `ModemAdded` signal, and publishes it.
    pub fn create(path: ObjectPath, seed: ModemProperties, outbox: &mut Outbox) -> Self {
        let token = outbox.issue();
        info!(modem = %path, %token, "Modem added");

        outbox.push(Effect::OpenMirror {
            token,
            interface: Interface::Modem,
            path: path.clone(),
        });

        let mut modem = Self {
            path,
            mirror: Mirror::open(token, seed),
            sim: None,
            connection: None,
            status: ModemStatus::Disabled,
            shown: None,
        };
        modem.sync_interfaces(outbox);
        modem.refresh(outbox);
        modem
    }

    pub fn status(&self) -> ModemStatus {
        self.status
    }

    pub fn label(&self) -> String {
        self.mirror.values().display_name(&self.path)
    }

    fn online(&self) -> bool {
        self.mirror.values().online.unwrap_or(false)
    }

    /// Whether any entity of this modem was issued `token`.
    pub fn owns(&self, token: Token) -> bool {
        self.mirror.token() == token
            || self
                .sim
                .as_ref()
                .is_some_and(|sim| sim.owns(token) || sim.owns_prompt(token))
            || self
                .connection
                .as_ref()
                .is_some_and(|conn| conn.owns(token) || conn.contexts().owns(token))
    }

    /// Applies a completion or signal that carries one of this modem's tokens.
    pub fn handle(&mut self, event: Event, outbox: &mut Outbox) {
        let label = self.label();

        match event {
            Event::PropertiesFetched { token, result } => {
                if self.mirror.token() == token {
                    if subsystems::apply_fetched(&mut self.mirror, &result) {
                        self.sync_interfaces(outbox);
                    }
                } else if let Some(sim) = self.sim.as_mut().filter(|sim| sim.owns(token)) {
                    if sim.on_fetched(&result) {
                        sim.sync_prompt(&self.path, &label, outbox);
                    }
                } else if let Some(conn) = self.connection.as_mut() {
                    if conn.owns(token) {
                        conn.on_fetched(&result);
                    } else {
                        conn.contexts_mut().on_fetched(&result);
                    }
                }
            }
            Event::PropertyChanged { token, update } => {
                if self.mirror.token() == token {
                    if subsystems::apply_changed(&mut self.mirror, &update) {
                        self.sync_interfaces(outbox);
                    }
                } else if let Some(sim) = self.sim.as_mut().filter(|sim| sim.owns(token)) {
                    if sim.on_changed(&update) {
                        sim.sync_prompt(&self.path, &label, outbox);
                    }
                } else if let Some(conn) = self.connection.as_mut() {
                    if conn.owns(token) {
                        conn.on_changed(&update);
                    } else {
                        conn.contexts_mut().on_changed(&update);
                    }
                }
            }
            Event::ContextsEnumerated { result, .. } => {
                if let Some(conn) = self.connection.as_mut() {
                    conn.contexts_mut().on_enumerated(result, outbox);
                }
            }
            Event::ContextAdded {
                path, properties, ..
            } => {
                if let Some(conn) = self.connection.as_mut() {
                    conn.contexts_mut().on_added(path, properties, outbox);
                }
            }
            Event::ContextRemoved { path, .. } => {
                if let Some(conn) = self.connection.as_mut() {
                    conn.contexts_mut().on_removed(&path, outbox);
                }
            }
            Event::ContextCreated { result, .. } => {
                if let Some(conn) = self.connection.as_mut() {
                    conn.contexts_mut().on_created(result, outbox);
                }
            }
            Event::WriteFinished { write, result, .. } => match (write, &result) {
                (PropertyWrite::Active(_), _) => {
                    if let Some(conn) = self.connection.as_ref() {
                        conn.contexts().on_toggle_finished(&result, &label, outbox);
                    }
                }
                (_, Err(fault)) => {
                    warn!(modem = %self.path, property = write.name(), "Write failed: {fault}");
                }
                (_, Ok(())) => {}
            },
            Event::CredentialEntered { token, credential } => {
                if let Some(sim) = self.sim.as_mut() {
                    sim.submit(token, credential, outbox);
                }
            }
            Event::CredentialCancelled { token } => {
                if let Some(sim) = self.sim.as_mut() {
                    sim.cancel(token, outbox);
                }
            }
            Event::PromptExpired { token } => {
                if let Some(sim) = self.sim.as_mut() {
                    sim.expire(token, outbox);
                }
            }
            other => debug!(modem = %self.path, "Unroutable event {other:?}"),
        }

        self.refresh(outbox);
    }

    /// Applies a user action aimed at this modem.
    pub fn perform(&mut self, action: &UserAction, outbox: &mut Outbox) {
        match action {
            UserAction::SetPowered { powered, .. } => {
                self.write(PropertyWrite::Powered(*powered), outbox);
            }
            UserAction::SetOnline { online, .. } => {
                self.write(PropertyWrite::Online(*online), outbox);
            }
            UserAction::SetRoamingAllowed { allowed, .. } => match self.connection.as_ref() {
                Some(conn) => conn.set_roaming_allowed(*allowed, outbox),
                None => debug!(modem = %self.path, "No connection manager, roaming unchanged"),
            },
            UserAction::ToggleContext { .. } => match self.connection.as_ref() {
                Some(conn) => conn.contexts().toggle(self.online(), &self.label(), outbox),
                None => debug!(modem = %self.path, "No connection manager, nothing to toggle"),
            },
            UserAction::Reconfigure { .. } => outbox.push(Effect::LaunchWizard {
                modem: self.path.clone(),
            }),
        }
    }

    /// Tears the modem down. Every subscription and prompt it holds is released.
    pub fn close(&mut self, outbox: &mut Outbox) {
        info!(modem = %self.path, "Modem removed");

        if let Some(mut sim) = self.sim.take() {
            sim.close(outbox);
        }
        if let Some(mut conn) = self.connection.take() {
            conn.close(outbox);
        }
        if self.mirror.close() {
            outbox.push(Effect::CloseMirror {
                token: self.mirror.token(),
            });
        }
        if self.shown.take().is_some() {
            outbox.present(Presentation::RemoveModem(self.path.clone()));
        }
    }

    fn write(&self, write: PropertyWrite, outbox: &mut Outbox) {
        outbox.push(Effect::SetProperty {
            token: self.mirror.token(),
            path: self.path.clone(),
            write,
        });
    }

    /// Opens or closes subsystems to follow the modem's `Interfaces` list.
    fn sync_interfaces(&mut self, outbox: &mut Outbox) {
        let values = self.mirror.values();
        let has_sim = values.has_interface(Interface::SimManager);
        let has_connection = values.has_interface(Interface::ConnectionManager);

        match (has_sim, self.sim.is_some()) {
            (Some(true), false) => {
                debug!(modem = %self.path, "SIM manager appeared");
                self.sim = Some(SimSubsystem::open(&self.path, outbox));
            }
            (Some(false), true) => {
                debug!(modem = %self.path, "SIM manager went away");
                if let Some(mut sim) = self.sim.take() {
                    sim.close(outbox);
                }
            }
            _ => {}
        }

        match (has_connection, self.connection.is_some()) {
            (Some(true), false) => {
                debug!(modem = %self.path, "Connection manager appeared");
                self.connection = Some(ConnectionSubsystem::open(&self.path, outbox));
            }
            (Some(false), true) => {
                debug!(modem = %self.path, "Connection manager went away");
                if let Some(mut conn) = self.connection.take() {
                    conn.close(outbox);
                }
            }
            _ => {}
        }
    }

    /// Recomputes the status and republishes the view if anything changed.
    fn refresh(&mut self, outbox: &mut Outbox) {
        self.status = derive_status(
            self.mirror.values().powered.unwrap_or(false),
            self.sim.as_ref().is_some_and(SimSubsystem::present),
            self.sim
                .as_ref()
                .map(SimSubsystem::pin_required)
                .unwrap_or_default(),
            self.connection
                .as_ref()
                .is_some_and(ConnectionSubsystem::attached),
            self.connection
                .as_ref()
                .map(ConnectionSubsystem::bearer)
                .unwrap_or_default(),
        );

        let view = self.view();
        if self.shown.as_ref() != Some(&view) {
            outbox.present(Presentation::ShowModem(view.clone()));
            self.shown = Some(view);
        }
    }

    pub fn view(&self) -> ModemView {
        let values = self.mirror.values();
        ModemView {
            path: self.path.clone(),
            name: self.label(),
            powered: values.powered.unwrap_or(false),
            online: values.online.unwrap_or(false),
            status: self.status,
            sim: self.sim.as_ref().map(SimSubsystem::view),
            connection: self.connection.as_ref().map(ConnectionSubsystem::view),
        }
    }
}
