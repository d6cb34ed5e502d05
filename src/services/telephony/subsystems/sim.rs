use std::collections::BTreeMap;

use tracing::warn;

use super::{apply_changed, apply_fetched};
use crate::services::{
    common::{Mirror, RemoteFault, Token},
    telephony::{
        Credential, Effect, Interface, PinKind, PropertyUpdate, SimProperties, SimView,
        credential::CredentialGate, outbox::Outbox,
    },
};

/// `org.ofono.SimManager` of one modem, plus its credential prompt.
#[derive(Debug)]
pub(crate) struct SimSubsystem {
    mirror: Mirror<SimProperties>,
    gate: CredentialGate,
}

impl SimSubsystem {
    pub fn open(modem: &str, outbox: &mut Outbox) -> Self {
        let token = outbox.issue();
        outbox.push(Effect::OpenMirror {
            token,
            interface: Interface::SimManager,
            path: modem.to_string(),
        });

        Self {
            mirror: Mirror::open(token, SimProperties::default()),
            gate: CredentialGate::default(),
        }
    }

    pub fn owns(&self, token: Token) -> bool {
        self.mirror.token() == token
    }

    pub fn owns_prompt(&self, token: Token) -> bool {
        self.gate.active_token() == Some(token)
    }

    pub fn on_fetched(&mut self, result: &Result<PropertyUpdate, RemoteFault>) -> bool {
        apply_fetched(&mut self.mirror, result)
    }

    pub fn on_changed(&mut self, update: &PropertyUpdate) -> bool {
        apply_changed(&mut self.mirror, update)
    }

    /// Card inserted. Unknown counts as absent.
    pub fn present(&self) -> bool {
        self.mirror.values().present.unwrap_or(false)
    }

    pub fn pin_required(&self) -> PinKind {
        self.mirror.values().pin_required.unwrap_or_default()
    }

    /// Opens, keeps or dismisses the prompt to match the card's state.
    pub fn sync_prompt(&mut self, modem: &str, label: &str, outbox: &mut Outbox) {
        self.gate.evaluate(self.mirror.values(), modem, label, outbox);
    }

    pub fn submit(&mut self, token: Token, credential: Credential, outbox: &mut Outbox) {
        if let Err(err) = self.gate.submit(token, credential, outbox) {
            warn!(%token, "{err}");
        }
    }

    pub fn cancel(&mut self, token: Token, outbox: &mut Outbox) {
        self.gate.cancel(token, outbox);
    }

    pub fn expire(&mut self, token: Token, outbox: &mut Outbox) {
        self.gate.expire(token, outbox);
    }

    pub fn view(&self) -> SimView {
        let values = self.mirror.values();
        SimView {
            present: self.present(),
            pin_required: self.pin_required(),
            retries: values
                .retries
                .iter()
                .flatten()
                .map(|(kind, left)| (*kind, *left))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    pub fn close(&mut self, outbox: &mut Outbox) {
        self.gate.close(outbox);
        if self.mirror.close() {
            outbox.push(Effect::CloseMirror {
                token: self.mirror.token(),
            });
        }
    }
}
