use std::fmt;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    common::{ObjectPath, Token},
    connman::TechnologyView,
    telephony::{Credential, CredentialRequest, ModemView},
};

/// A one-off message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A context was toggled while the modem's RF is off.
    ModemOffline {
        /// Modem menu label.
        modem: String,
    },
    /// Activating or deactivating a context failed; offers the wizard.
    UnableToConnect {
        /// Modem path, passed to the wizard if the user accepts.
        modem: ObjectPath,
        /// Modem menu label.
        label: String,
    },
    /// A watched bus service went away.
    ServiceUnavailable {
        /// Well-known bus name.
        service: String,
    },
    /// A watched bus service (re)appeared.
    ServiceAvailable {
        /// Well-known bus name.
        service: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModemOffline { modem } => {
                write!(f, "{modem} is offline; turn off flight mode to connect")
            }
            Self::UnableToConnect { label, .. } => {
                write!(f, "Unable to connect with {label}; check the APN settings")
            }
            Self::ServiceUnavailable { service } => write!(f, "{service} is not running"),
            Self::ServiceAvailable { service } => write!(f, "{service} is running"),
        }
    }
}

/// Outward state changes handed from a registry to its presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    /// A modem was created or its view changed.
    ShowModem(ModemView),
    /// A modem was torn down.
    RemoveModem(ObjectPath),
    /// A technology was created or its view changed.
    ShowTechnology(TechnologyView),
    /// A technology was torn down.
    RemoveTechnology(ObjectPath),
    /// ConnMan's global flight mode changed.
    ShowOfflineMode(bool),
    /// Ask the user for a SIM credential.
    Prompt(CredentialRequest),
    /// Withdraw the prompt issued under this token.
    Dismiss(Token),
    /// Show a notice.
    Notify(Notice),
}

/// Answer to a credential prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialResponse {
    /// The user typed something and confirmed.
    Submitted(Credential),
    /// The user closed the prompt.
    Cancelled,
}

/// Render sink for the registries.
///
/// Everything except [`prompt_credential`](Presenter::prompt_credential) is
/// fire-and-forget. The prompt call may be aborted at any time when the
/// registry dismisses it.
#[async_trait]
pub trait Presenter: Send + Sync + 'static {
    /// Draws or refreshes a modem.
    fn show_modem(&self, view: &ModemView);

    /// Removes a modem from the panel.
    fn remove_modem(&self, path: &str);

    /// Draws or refreshes a technology switch.
    fn show_technology(&self, view: &TechnologyView);

    /// Removes a technology switch.
    fn remove_technology(&self, path: &str);

    /// Reflects ConnMan's offline mode.
    fn show_offline_mode(&self, enabled: bool);

    /// Shows a notice.
    fn notify(&self, notice: &Notice);

    /// Asks the user for a credential and waits for the answer.
    async fn prompt_credential(&self, request: CredentialRequest) -> CredentialResponse;

    /// Withdraws a prompt that is still on screen.
    fn dismiss_credential(&self, token: Token);

    /// Routes a [`Presentation`] to the matching method. Prompts are not
    /// routed here; drivers run them as tasks.
    fn present(&self, presentation: &Presentation) {
        match presentation {
            Presentation::ShowModem(view) => self.show_modem(view),
            Presentation::RemoveModem(path) => self.remove_modem(path),
            Presentation::ShowTechnology(view) => self.show_technology(view),
            Presentation::RemoveTechnology(path) => self.remove_technology(path),
            Presentation::ShowOfflineMode(enabled) => self.show_offline_mode(*enabled),
            Presentation::Dismiss(token) => self.dismiss_credential(*token),
            Presentation::Notify(notice) => self.notify(notice),
            Presentation::Prompt(_) => {}
        }
    }
}

/// Presenter that writes everything to the log.
///
/// Used by the CLI. Credential prompts are declined because there is no
/// interactive surface to type into.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

#[async_trait]
impl Presenter for TracingPresenter {
    fn show_modem(&self, view: &ModemView) {
        info!(
            path = %view.path,
            status = %view.status,
            powered = view.powered,
            online = view.online,
            "{}",
            view.name
        );
    }

    fn remove_modem(&self, path: &str) {
        info!(path, "Modem removed");
    }

    fn show_technology(&self, view: &TechnologyView) {
        info!(path = %view.path, kind = %view.kind, powered = view.powered, "{}", view.name);
    }

    fn remove_technology(&self, path: &str) {
        info!(path, "Technology removed");
    }

    fn show_offline_mode(&self, enabled: bool) {
        info!(enabled, "Offline mode");
    }

    fn notify(&self, notice: &Notice) {
        warn!("{notice}");
    }

    async fn prompt_credential(&self, request: CredentialRequest) -> CredentialResponse {
        warn!(
            modem = %request.modem,
            kind = %request.kind,
            retries = ?request.retries,
            "{} needs a {}; unlock it from an interactive panel",
            request.modem_name,
            request.kind
        );
        CredentialResponse::Cancelled
    }

    fn dismiss_credential(&self, token: Token) {
        info!(%token, "Credential prompt dismissed");
    }
}
