use super::{apply_changed, apply_fetched};
use crate::services::{
    common::{Mirror, RemoteFault, Token},
    telephony::{
        BearerKind, ConnectionProperties, ConnectionView, Effect, Interface, PropertyUpdate,
        PropertyWrite, context::ContextRegistry, outbox::Outbox,
    },
};

/// `org.ofono.ConnectionManager` of one modem and its internet context.
///
/// Context enumeration, creation and the `ContextAdded` / `ContextRemoved`
/// signals all travel under the connection manager's own token.
#[derive(Debug)]
pub(crate) struct ConnectionSubsystem {
    modem: String,
    mirror: Mirror<ConnectionProperties>,
    contexts: ContextRegistry,
}

impl ConnectionSubsystem {
    pub fn open(modem: &str, outbox: &mut Outbox) -> Self {
        let token = outbox.issue();
        outbox.push(Effect::OpenMirror {
            token,
            interface: Interface::ConnectionManager,
            path: modem.to_string(),
        });
        let contexts = ContextRegistry::attach(modem, token, outbox);

        Self {
            modem: modem.to_string(),
            mirror: Mirror::open(token, ConnectionProperties::default()),
            contexts,
        }
    }

    pub fn token(&self) -> Token {
        self.mirror.token()
    }

    pub fn owns(&self, token: Token) -> bool {
        self.mirror.token() == token
    }

    pub fn contexts(&self) -> &ContextRegistry {
        &self.contexts
    }

    pub fn contexts_mut(&mut self) -> &mut ContextRegistry {
        &mut self.contexts
    }

    pub fn on_fetched(&mut self, result: &Result<PropertyUpdate, RemoteFault>) -> bool {
        apply_fetched(&mut self.mirror, result)
    }

    pub fn on_changed(&mut self, update: &PropertyUpdate) -> bool {
        apply_changed(&mut self.mirror, update)
    }

    /// Packet service attached. Unknown counts as detached.
    pub fn attached(&self) -> bool {
        self.mirror.values().attached.unwrap_or(false)
    }

    pub fn bearer(&self) -> BearerKind {
        self.mirror.values().bearer.unwrap_or_default()
    }

    pub fn set_roaming_allowed(&self, allowed: bool, outbox: &mut Outbox) {
        outbox.push(Effect::SetProperty {
            token: self.token(),
            path: self.modem.clone(),
            write: PropertyWrite::RoamingAllowed(allowed),
        });
    }

    pub fn view(&self) -> ConnectionView {
        ConnectionView {
            attached: self.attached(),
            bearer: self.bearer(),
            roaming_allowed: self.mirror.values().roaming_allowed.unwrap_or(false),
            context: self.contexts.view(),
        }
    }

    pub fn close(&mut self, outbox: &mut Outbox) {
        self.contexts.close(outbox);
        if self.mirror.close() {
            outbox.push(Effect::CloseMirror {
                token: self.mirror.token(),
            });
        }
    }
}
