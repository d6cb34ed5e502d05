use std::{collections::BTreeMap, time::Duration};

use tracing::{debug, info, instrument, warn};

use super::{
    Effect, Event, ModemProperties, ModemStatus, ModemView, UserAction, aggregate_status,
    modem::Modem, outbox::Outbox,
};
use crate::services::common::{ObjectPath, Property, RemoteFault, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// `org.ofono` has no owner.
    Absent,
    /// `GetModems` is outstanding for this bus generation.
    Enumerating(Token),
    /// Enumeration applied and add/remove signals are being followed.
    Bound(Token),
}

/// The set of oFono modems and the fleet-wide status indicator.
///
/// A synchronous state machine: every input is an [`Event`], every output
/// an [`Effect`] for the driver to carry out. Completions are tagged with
/// the token of the entity that asked for them; completions for entities
/// that no longer exist are dropped.
#[derive(Debug)]
pub struct FleetRegistry {
    phase: Phase,
    modems: BTreeMap<ObjectPath, Modem>,
    aggregate: Property<ModemStatus>,
    outbox: Outbox,
}

impl FleetRegistry {
    /// Creates an unbound registry. Credential prompts expire after `prompt_timeout`.
    pub fn new(prompt_timeout: Duration) -> Self {
        Self {
            phase: Phase::Absent,
            modems: BTreeMap::new(),
            aggregate: Property::new(ModemStatus::Disabled),
            outbox: Outbox::new(prompt_timeout),
        }
    }

    /// Fleet-wide status, updated after every event.
    pub fn aggregate(&self) -> Property<ModemStatus> {
        self.aggregate.clone()
    }

    /// Current fleet-wide status.
    pub fn status(&self) -> ModemStatus {
        self.aggregate.get()
    }

    /// Whether the registry is following a live `org.ofono`.
    pub fn is_bound(&self) -> bool {
        matches!(self.phase, Phase::Bound(_))
    }

    /// Views of every tracked modem, ordered by path.
    pub fn modems(&self) -> Vec<ModemView> {
        self.modems.values().map(Modem::view).collect()
    }

    /// Feeds one event through the registry and returns the work it produced.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::ServiceAppeared => self.on_appeared(),
            Event::ServiceVanished => self.on_vanished(),
            Event::ModemsEnumerated { token, result } => self.on_enumerated(token, result),
            Event::ModemAdded {
                token,
                path,
                properties,
            } => {
                if self.phase == Phase::Bound(token) {
                    self.add_modem(path, properties);
                } else {
                    debug!(modem = %path, "Dropping ModemAdded from a stale watch");
                }
            }
            Event::ModemRemoved { token, path } => {
                if self.phase == Phase::Bound(token) {
                    self.remove_modem(&path);
                } else {
                    debug!(modem = %path, "Dropping ModemRemoved from a stale watch");
                }
            }
            Event::Action(action) => self.perform(&action),
            event => self.route(event),
        }

        self.recompute();
        self.outbox.take()
    }

    #[instrument(skip(self))]
    fn on_appeared(&mut self) {
        self.reset();

        let token = self.outbox.issue();
        info!(%token, "oFono appeared, enumerating modems");
        self.phase = Phase::Enumerating(token);
        self.outbox.push(Effect::EnumerateModems { token });
    }

    fn on_vanished(&mut self) {
        if self.phase != Phase::Absent || !self.modems.is_empty() {
            info!("oFono vanished, tearing down {} modem(s)", self.modems.len());
        }
        self.reset();
    }

    #[instrument(skip(self, result))]
    fn on_enumerated(
        &mut self,
        token: Token,
        result: Result<Vec<(ObjectPath, ModemProperties)>, RemoteFault>,
    ) {
        if self.phase != Phase::Enumerating(token) {
            debug!("Dropping stale modem enumeration");
            return;
        }

        let modems = result.unwrap_or_else(|fault| {
            warn!("Cannot enumerate modems: {fault}");
            Vec::new()
        });

        for (path, properties) in modems {
            self.add_modem(path, properties);
        }

        self.phase = Phase::Bound(token);
        self.outbox.push(Effect::WatchModems { token });
    }

    fn add_modem(&mut self, path: ObjectPath, properties: ModemProperties) {
        if self.modems.contains_key(&path) {
            debug!(modem = %path, "Modem already tracked");
            return;
        }

        if !properties.is_hardware() {
            debug!(modem = %path, kind = ?properties.kind, "Skipping non-hardware modem");
            return;
        }

        let modem = Modem::create(path.clone(), properties, &mut self.outbox);
        self.modems.insert(path, modem);
    }

    fn remove_modem(&mut self, path: &str) {
        match self.modems.remove(path) {
            Some(mut modem) => modem.close(&mut self.outbox),
            None => debug!(modem = path, "Removal of untracked modem"),
        }
    }

    fn perform(&mut self, action: &UserAction) {
        let path = match action {
            UserAction::SetPowered { modem, .. }
            | UserAction::SetOnline { modem, .. }
            | UserAction::SetRoamingAllowed { modem, .. }
            | UserAction::ToggleContext { modem }
            | UserAction::Reconfigure { modem } => modem,
        };

        match self.modems.get_mut(path) {
            Some(modem) => modem.perform(action, &mut self.outbox),
            None => warn!(modem = %path, "Action for unknown modem"),
        }
    }

    fn route(&mut self, event: Event) {
        let Some(token) = event_token(&event) else {
            return;
        };

        match self.modems.values_mut().find(|modem| modem.owns(token)) {
            Some(modem) => modem.handle(event, &mut self.outbox),
            None => debug!(%token, "Dropping completion for a dead entity"),
        }
    }

    /// Tears down every modem and forgets the bus generation.
    fn reset(&mut self) {
        if self.is_bound() {
            self.outbox.push(Effect::UnwatchModems);
        }
        self.phase = Phase::Absent;

        for (_, mut modem) in std::mem::take(&mut self.modems) {
            modem.close(&mut self.outbox);
        }
    }

    fn recompute(&mut self) {
        let status = aggregate_status(self.modems.values().map(Modem::status));
        if self.aggregate.set(status) {
            info!(%status, "Aggregate modem status changed");
        }
    }
}

fn event_token(event: &Event) -> Option<Token> {
    match event {
        Event::PropertiesFetched { token, .. }
        | Event::PropertyChanged { token, .. }
        | Event::ContextsEnumerated { token, .. }
        | Event::ContextAdded { token, .. }
        | Event::ContextRemoved { token, .. }
        | Event::ContextCreated { token, .. }
        | Event::WriteFinished { token, .. }
        | Event::CredentialEntered { token, .. }
        | Event::CredentialCancelled { token }
        | Event::PromptExpired { token } => Some(*token),
        Event::ServiceAppeared
        | Event::ServiceVanished
        | Event::ModemsEnumerated { .. }
        | Event::ModemAdded { .. }
        | Event::ModemRemoved { .. }
        | Event::Action(_) => None,
    }
}
