use std::time::Duration;

use super::{ContextProperties, Credential, Interface, ModemProperties, PinKind, PropertyUpdate};
use crate::services::{
    common::{ObjectPath, RemoteFault, Token},
    presenter::Presentation,
};

/// A boolean property the registry writes on a remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyWrite {
    /// `org.ofono.Modem.Powered`
    Powered(bool),
    /// `org.ofono.Modem.Online`
    Online(bool),
    /// `org.ofono.ConnectionManager.RoamingAllowed`
    RoamingAllowed(bool),
    /// `org.ofono.ConnectionContext.Active`
    Active(bool),
}

impl PropertyWrite {
    /// D-Bus property name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Powered(_) => "Powered",
            Self::Online(_) => "Online",
            Self::RoamingAllowed(_) => "RoamingAllowed",
            Self::Active(_) => "Active",
        }
    }

    /// Value being written.
    pub fn value(self) -> bool {
        match self {
            Self::Powered(value)
            | Self::Online(value)
            | Self::RoamingAllowed(value)
            | Self::Active(value) => value,
        }
    }

    /// Interface the property lives on.
    pub fn interface(self) -> Interface {
        match self {
            Self::Powered(_) | Self::Online(_) => Interface::Modem,
            Self::RoamingAllowed(_) => Interface::ConnectionManager,
            Self::Active(_) => Interface::ConnectionContext,
        }
    }
}

/// Something the user asked for through the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Switch modem radio power.
    SetPowered {
        /// Modem path.
        modem: ObjectPath,
        /// Requested power state.
        powered: bool,
    },
    /// Switch modem RF (flight mode).
    SetOnline {
        /// Modem path.
        modem: ObjectPath,
        /// Requested RF state.
        online: bool,
    },
    /// Allow or forbid data roaming.
    SetRoamingAllowed {
        /// Modem path.
        modem: ObjectPath,
        /// Requested roaming policy.
        allowed: bool,
    },
    /// Click on the modem's internet context.
    ToggleContext {
        /// Modem path.
        modem: ObjectPath,
    },
    /// Open the configuration wizard for a modem.
    Reconfigure {
        /// Modem path.
        modem: ObjectPath,
    },
}

/// Input to [`FleetRegistry::handle`](super::FleetRegistry::handle).
///
/// Completion events carry the token of the entity that issued the request.
#[derive(Debug, Clone)]
pub enum Event {
    /// `org.ofono` gained an owner.
    ServiceAppeared,
    /// `org.ofono` lost its owner.
    ServiceVanished,
    /// `GetModems` finished.
    ModemsEnumerated {
        /// Bus generation the enumeration belongs to.
        token: Token,
        /// Modems with their initial properties.
        result: Result<Vec<(ObjectPath, ModemProperties)>, RemoteFault>,
    },
    /// `ModemAdded` signal.
    ModemAdded {
        /// Bus generation of the watch.
        token: Token,
        /// Modem path.
        path: ObjectPath,
        /// Initial properties.
        properties: ModemProperties,
    },
    /// `ModemRemoved` signal.
    ModemRemoved {
        /// Bus generation of the watch.
        token: Token,
        /// Modem path.
        path: ObjectPath,
    },
    /// `GetProperties` on a mirrored object finished.
    PropertiesFetched {
        /// Mirror token.
        token: Token,
        /// Decoded snapshot.
        result: Result<PropertyUpdate, RemoteFault>,
    },
    /// `PropertyChanged` on a mirrored object.
    PropertyChanged {
        /// Mirror token.
        token: Token,
        /// Decoded change.
        update: PropertyUpdate,
    },
    /// `GetContexts` finished.
    ContextsEnumerated {
        /// Connection manager token.
        token: Token,
        /// Contexts with their properties.
        result: Result<Vec<(ObjectPath, ContextProperties)>, RemoteFault>,
    },
    /// `ContextAdded` signal.
    ContextAdded {
        /// Connection manager token.
        token: Token,
        /// Context path.
        path: ObjectPath,
        /// Initial properties.
        properties: ContextProperties,
    },
    /// `ContextRemoved` signal.
    ContextRemoved {
        /// Connection manager token.
        token: Token,
        /// Context path.
        path: ObjectPath,
    },
    /// `AddContext` finished.
    ContextCreated {
        /// Connection manager token.
        token: Token,
        /// Path of the new context.
        result: Result<ObjectPath, RemoteFault>,
    },
    /// `SetProperty` finished.
    WriteFinished {
        /// Token of the entity written to.
        token: Token,
        /// The write that was attempted.
        write: PropertyWrite,
        /// Outcome.
        result: Result<(), RemoteFault>,
    },
    /// The user submitted a credential prompt.
    CredentialEntered {
        /// Prompt token.
        token: Token,
        /// What was typed.
        credential: Credential,
    },
    /// The user dismissed a credential prompt.
    CredentialCancelled {
        /// Prompt token.
        token: Token,
    },
    /// A credential prompt timer fired.
    PromptExpired {
        /// Prompt token.
        token: Token,
    },
    /// A user action from the panel.
    Action(UserAction),
}

/// Work the registry asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Subscribe to `PropertyChanged`, then issue `GetProperties`.
    ///
    /// For connection managers the driver also forwards `ContextAdded` and
    /// `ContextRemoved` under the same token.
    OpenMirror {
        /// Mirror token.
        token: Token,
        /// Interface to mirror.
        interface: Interface,
        /// Object path.
        path: ObjectPath,
    },
    /// Drop the subscription opened under `token`.
    CloseMirror {
        /// Mirror token.
        token: Token,
    },
    /// Issue `GetModems`.
    EnumerateModems {
        /// Bus generation.
        token: Token,
    },
    /// Subscribe to `ModemAdded` / `ModemRemoved`.
    WatchModems {
        /// Bus generation.
        token: Token,
    },
    /// Drop the modem add/remove subscription.
    UnwatchModems,
    /// Subscribe to `ContextAdded` / `ContextRemoved` on a modem's
    /// connection manager, then issue `GetContexts`.
    FollowContexts {
        /// Connection manager token.
        token: Token,
        /// Modem path.
        modem: ObjectPath,
    },
    /// Issue `AddContext("internet")` on a modem's connection manager.
    AddContext {
        /// Connection manager token.
        token: Token,
        /// Modem path.
        modem: ObjectPath,
    },
    /// Issue `SetProperty` on a remote object.
    SetProperty {
        /// Token of the entity written to.
        token: Token,
        /// Object path.
        path: ObjectPath,
        /// Property and value.
        write: PropertyWrite,
    },
    /// Issue `EnterPin(kind, pin)` on a modem's SIM manager.
    EnterPin {
        /// Modem path.
        modem: ObjectPath,
        /// Credential kind.
        kind: PinKind,
        /// PIN.
        pin: String,
    },
    /// Issue `ResetPin(kind, puk, new_pin)` on a modem's SIM manager.
    ResetPin {
        /// Modem path.
        modem: ObjectPath,
        /// Credential kind.
        kind: PinKind,
        /// Unblock key.
        puk: String,
        /// Replacement PIN.
        new_pin: String,
    },
    /// Arm a one-shot timer that reports [`Event::PromptExpired`].
    StartTimer {
        /// Prompt token.
        token: Token,
        /// Delay.
        after: Duration,
    },
    /// Disarm a timer.
    CancelTimer {
        /// Prompt token.
        token: Token,
    },
    /// Spawn the configuration wizard for a modem.
    LaunchWizard {
        /// Modem path.
        modem: ObjectPath,
    },
    /// Hand something to the presenter.
    Present(Presentation),
}
