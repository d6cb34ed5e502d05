use std::{collections::HashMap, fmt};

use tracing::{debug, info};

use super::{Effect, PinKind, SimProperties, TelephonyError, outbox::Outbox};
use crate::services::{
    common::{ObjectPath, Token},
    presenter::Presentation,
};

const MIN_PIN_LEN: usize = 4;
const MIN_PUK_LEN: usize = 8;

/// What the user typed into a credential prompt.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Answer to a `pin` / `pin2` prompt.
    Pin(String),
    /// Answer to a `puk` / `puk2` prompt.
    Unblock {
        /// The unblock key.
        puk: String,
        /// PIN to set once unblocked.
        new_pin: String,
    },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(_) => f.write_str("Pin(..)"),
            Self::Unblock { .. } => f.write_str("Unblock { .. }"),
        }
    }
}

/// Checks a credential against the kind it is meant to answer.
///
/// # Errors
/// Returns [`TelephonyError::ValidationRejected`] when the credential has
/// the wrong shape for `kind` or is too short.
pub fn validate(kind: PinKind, credential: &Credential) -> Result<(), TelephonyError> {
    let reject = |reason: &'static str| -> Result<(), TelephonyError> {
        Err(TelephonyError::ValidationRejected { kind, reason })
    };

    match (kind, credential) {
        (PinKind::None, _) => reject("no credential is required"),
        (PinKind::Pin | PinKind::Pin2, Credential::Pin(pin)) => {
            if pin.chars().count() < MIN_PIN_LEN {
                return reject("PIN must be at least 4 digits");
            }
            Ok(())
        }
        (PinKind::Puk | PinKind::Puk2, Credential::Unblock { puk, new_pin }) => {
            if puk.chars().count() < MIN_PUK_LEN {
                return reject("PUK must be at least 8 digits");
            }
            if new_pin.chars().count() < MIN_PIN_LEN {
                return reject("new PIN must be at least 4 digits");
            }
            Ok(())
        }
        (PinKind::Pin | PinKind::Pin2, Credential::Unblock { .. }) => reject("expected a PIN"),
        (PinKind::Puk | PinKind::Puk2, Credential::Pin(_)) => {
            reject("expected an unblock key and a new PIN")
        }
    }
}

/// A prompt the presenter should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    /// Token answers must carry.
    pub token: Token,
    /// Modem object path.
    pub modem: ObjectPath,
    /// Modem menu label.
    pub modem_name: String,
    /// Credential being asked for.
    pub kind: PinKind,
    /// Attempts left before the card escalates to the unblock key.
    pub retries: u8,
}

#[derive(Debug)]
struct ActivePrompt {
    request: CredentialRequest,
}

/// PIN / PUK challenge for one modem's SIM.
///
/// Idle until the SIM reports a required credential with attempts left, then
/// prompting until the user answers, cancels, the timer fires, or the SIM
/// stops asking for that credential. At most one prompt is active at a time.
#[derive(Debug, Default)]
pub(crate) struct CredentialGate {
    prompt: Option<ActivePrompt>,
}

impl CredentialGate {
    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn active_token(&self) -> Option<Token> {
        self.prompt.as_ref().map(|prompt| prompt.request.token)
    }

    /// Re-examines the SIM state after it changed.
    pub fn evaluate(&mut self, sim: &SimProperties, modem: &str, label: &str, outbox: &mut Outbox) {
        let present = sim.present.unwrap_or(false);
        let asking = present
            .then_some(sim.pin_required)
            .flatten()
            .filter(|kind| kind.is_required());

        if let Some(prompt) = &self.prompt {
            if asking == Some(prompt.request.kind) {
                return;
            }
            debug!(modem, kind = %prompt.request.kind, "SIM no longer asks for the prompted credential");
            self.finish(outbox, true);
        }

        let Some(kind) = asking else {
            return;
        };

        let Some(retries) = attempts_left(sim.retries.as_ref(), kind) else {
            debug!(modem, %kind, "Not prompting without a known retry count");
            return;
        };

        if retries == 0 {
            info!(modem, %kind, "No attempts left, not prompting");
            return;
        }

        let token = outbox.issue();
        let request = CredentialRequest {
            token,
            modem: modem.to_string(),
            modem_name: label.to_string(),
            kind,
            retries,
        };

        info!(modem, %kind, retries, %token, "Prompting for SIM credential");
        let after = outbox.prompt_timeout();
        outbox.push(Effect::StartTimer { token, after });
        outbox.present(Presentation::Prompt(request.clone()));
        self.prompt = Some(ActivePrompt { request });
    }

    /// Handles a submitted credential.
    ///
    /// Returns `Ok(false)` when `token` does not belong to the active
    /// prompt. A valid credential ends the prompt and issues exactly one
    /// unlock call; whether the card accepts it is reported by the SIM's
    /// next property change.
    ///
    /// # Errors
    /// Returns [`TelephonyError::ValidationRejected`] for malformed input.
    /// The prompt is shown again and stays active.
    pub fn submit(
        &mut self,
        token: Token,
        credential: Credential,
        outbox: &mut Outbox,
    ) -> Result<bool, TelephonyError> {
        let Some(prompt) = self.prompt.as_ref().filter(|p| p.request.token == token) else {
            return Ok(false);
        };

        let kind = prompt.request.kind;
        if let Err(err) = validate(kind, &credential) {
            outbox.present(Presentation::Prompt(prompt.request.clone()));
            return Err(err);
        }

        let modem = prompt.request.modem.clone();
        self.finish(outbox, false);

        let effect = match credential {
            Credential::Pin(pin) => Effect::EnterPin { modem, kind, pin },
            Credential::Unblock { puk, new_pin } => Effect::ResetPin {
                modem,
                kind,
                puk,
                new_pin,
            },
        };
        outbox.push(effect);
        Ok(true)
    }

    /// The user closed the prompt.
    pub fn cancel(&mut self, token: Token, outbox: &mut Outbox) -> bool {
        if self.active_token() != Some(token) {
            return false;
        }
        self.finish(outbox, false);
        true
    }

    /// The prompt timer fired.
    pub fn expire(&mut self, token: Token, outbox: &mut Outbox) -> bool {
        if self.active_token() != Some(token) {
            return false;
        }
        debug!(%token, "Credential prompt timed out");
        self.finish(outbox, true);
        true
    }

    /// Ends any active prompt because the owner is going away.
    pub fn close(&mut self, outbox: &mut Outbox) {
        if self.prompt.is_some() {
            self.finish(outbox, true);
        }
    }

    fn finish(&mut self, outbox: &mut Outbox, dismiss: bool) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };

        let token = prompt.request.token;
        outbox.push(Effect::CancelTimer { token });
        if dismiss {
            outbox.present(Presentation::Dismiss(token));
        }
    }
}

fn attempts_left(retries: Option<&HashMap<PinKind, u8>>, kind: PinKind) -> Option<u8> {
    retries.and_then(|map| map.get(&kind).copied())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const MODEM: &str = "/hw_0";

    fn outbox() -> Outbox {
        Outbox::new(Duration::from_secs(120))
    }

    fn locked(kind: PinKind, left: u8) -> SimProperties {
        SimProperties {
            present: Some(true),
            pin_required: Some(kind),
            retries: Some(HashMap::from([(kind, left)])),
        }
    }

    fn prompts(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Present(Presentation::Prompt(_))))
            .count()
    }

    fn open_gate(kind: PinKind) -> (CredentialGate, Outbox, Token) {
        let mut gate = CredentialGate::default();
        let mut outbox = outbox();
        gate.evaluate(&locked(kind, 3), MODEM, "Modem", &mut outbox);
        outbox.take();
        let token = gate.active_token().unwrap_or_else(|| panic!("gate did not open"));
        (gate, outbox, token)
    }

    #[test]
    fn repeated_notifications_raise_a_single_prompt() {
        let mut gate = CredentialGate::default();
        let mut outbox = outbox();
        let sim = locked(PinKind::Pin, 3);

        gate.evaluate(&sim, MODEM, "Modem", &mut outbox);
        gate.evaluate(&sim, MODEM, "Modem", &mut outbox);
        gate.evaluate(&sim, MODEM, "Modem", &mut outbox);

        let effects = outbox.take();
        assert_eq!(prompts(&effects), 1);
        assert!(matches!(
            effects[0],
            Effect::StartTimer { after, .. } if after == Duration::from_secs(120)
        ));
    }

    #[test]
    fn no_prompt_without_attempts_left() {
        let mut gate = CredentialGate::default();
        let mut outbox = outbox();

        gate.evaluate(&locked(PinKind::Pin, 0), MODEM, "Modem", &mut outbox);
        assert!(!gate.is_prompting());

        let unknown = SimProperties {
            retries: None,
            ..locked(PinKind::Pin, 3)
        };
        gate.evaluate(&unknown, MODEM, "Modem", &mut outbox);
        assert!(!gate.is_prompting());
        assert!(outbox.take().is_empty());
    }

    #[test]
    fn no_prompt_for_an_absent_card() {
        let mut gate = CredentialGate::default();
        let mut outbox = outbox();
        let sim = SimProperties {
            present: Some(false),
            ..locked(PinKind::Pin, 3)
        };

        gate.evaluate(&sim, MODEM, "Modem", &mut outbox);
        assert!(!gate.is_prompting());
    }

    #[test]
    fn short_pin_is_rejected_and_prompt_stays() {
        let (mut gate, mut outbox, token) = open_gate(PinKind::Pin);

        let result = gate.submit(token, Credential::Pin("123".to_string()), &mut outbox);
        assert!(matches!(
            result,
            Err(TelephonyError::ValidationRejected {
                kind: PinKind::Pin,
                ..
            })
        ));
        assert!(gate.is_prompting());

        let effects = outbox.take();
        assert_eq!(prompts(&effects), 1);
        assert!(
            !effects
                .iter()
                .any(|effect| matches!(effect, Effect::EnterPin { .. }))
        );
    }

    #[test]
    fn four_digit_pin_issues_one_enter_pin() {
        let (mut gate, mut outbox, token) = open_gate(PinKind::Pin);

        let sent = gate.submit(token, Credential::Pin("1234".to_string()), &mut outbox);
        assert!(matches!(sent, Ok(true)));
        assert!(!gate.is_prompting());

        let effects = outbox.take();
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimer { token },
                Effect::EnterPin {
                    modem: MODEM.to_string(),
                    kind: PinKind::Pin,
                    pin: "1234".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unblock_key_rules() {
        assert!(
            validate(
                PinKind::Puk,
                &Credential::Unblock {
                    puk: "1234567".to_string(),
                    new_pin: "1234".to_string(),
                }
            )
            .is_err()
        );
        assert!(
            validate(
                PinKind::Puk2,
                &Credential::Unblock {
                    puk: "12345678".to_string(),
                    new_pin: "123".to_string(),
                }
            )
            .is_err()
        );
        assert!(
            validate(
                PinKind::Puk,
                &Credential::Unblock {
                    puk: "12345678".to_string(),
                    new_pin: "1234".to_string(),
                }
            )
            .is_ok()
        );
        assert!(validate(PinKind::Puk, &Credential::Pin("12345678".to_string())).is_err());
    }

    #[test]
    fn valid_puk_issues_reset_pin() {
        let (mut gate, mut outbox, token) = open_gate(PinKind::Puk);
        let credential = Credential::Unblock {
            puk: "87654321".to_string(),
            new_pin: "0000".to_string(),
        };

        assert!(matches!(gate.submit(token, credential, &mut outbox), Ok(true)));
        assert!(outbox.take().iter().any(|effect| matches!(
            effect,
            Effect::ResetPin { kind: PinKind::Puk, puk, new_pin, .. }
                if puk == "87654321" && new_pin == "0000"
        )));
    }

    #[test]
    fn stale_tokens_are_ignored() {
        let (mut gate, mut outbox, token) = open_gate(PinKind::Pin);
        gate.cancel(token, &mut outbox);

        let late = gate.submit(token, Credential::Pin("1234".to_string()), &mut outbox);
        assert!(matches!(late, Ok(false)));
        assert!(!gate.expire(token, &mut outbox));
    }

    #[test]
    fn timeout_dismisses_and_cancels_timer() {
        let (mut gate, mut outbox, token) = open_gate(PinKind::Pin2);

        assert!(gate.expire(token, &mut outbox));
        assert_eq!(
            outbox.take(),
            vec![
                Effect::CancelTimer { token },
                Effect::Present(Presentation::Dismiss(token)),
            ]
        );
        assert!(!gate.is_prompting());
    }

    #[test]
    fn unlocking_elsewhere_dismisses_the_prompt() {
        let (mut gate, mut outbox, token) = open_gate(PinKind::Pin);
        let unlocked = SimProperties {
            pin_required: Some(PinKind::None),
            ..locked(PinKind::Pin, 3)
        };

        gate.evaluate(&unlocked, MODEM, "Modem", &mut outbox);

        assert!(!gate.is_prompting());
        assert!(
            outbox
                .take()
                .contains(&Effect::Present(Presentation::Dismiss(token)))
        );
    }

    #[test]
    fn escalation_to_puk_replaces_the_prompt() {
        let (mut gate, mut outbox, first) = open_gate(PinKind::Pin);

        gate.evaluate(&locked(PinKind::Puk, 10), MODEM, "Modem", &mut outbox);

        let second = gate.active_token();
        assert!(second.is_some());
        assert_ne!(second, Some(first));
        assert_eq!(prompts(&outbox.take()), 1);
    }
}
