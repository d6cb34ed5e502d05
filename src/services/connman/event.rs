use super::{ManagerProperties, TechnologyProperties};
use crate::services::{
    common::{ObjectPath, RemoteFault, Token},
    presenter::Presentation,
};

/// Something the user asked ConnMan to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnmanAction {
    /// Toggle global flight mode.
    SetOfflineMode(bool),
    /// Toggle one technology.
    SetPowered {
        /// Technology path.
        path: ObjectPath,
        /// Requested state.
        powered: bool,
    },
    /// Ask a technology to scan for networks.
    Scan {
        /// Technology path.
        path: ObjectPath,
    },
}

/// Input to [`TechnologyRegistry::handle`](super::TechnologyRegistry::handle).
#[derive(Debug, Clone)]
pub enum ConnmanEvent {
    /// `net.connman` gained an owner.
    ServiceAppeared,
    /// `net.connman` lost its owner.
    ServiceVanished,
    /// `GetProperties` on the manager or a technology finished.
    PropertiesFetched {
        /// Mirror token.
        token: Token,
        /// Raw snapshot, decoded by whichever mirror owns the token.
        result: Result<Snapshot, RemoteFault>,
    },
    /// `PropertyChanged` on the manager or a technology.
    PropertyChanged {
        /// Mirror token.
        token: Token,
        /// Decoded change.
        change: Snapshot,
    },
    /// `GetTechnologies` finished.
    TechnologiesEnumerated {
        /// Bus generation.
        token: Token,
        /// Technologies with their properties.
        result: Result<Vec<(ObjectPath, TechnologyProperties)>, RemoteFault>,
    },
    /// `TechnologyAdded` signal.
    TechnologyAdded {
        /// Bus generation of the watch.
        token: Token,
        /// Technology path.
        path: ObjectPath,
        /// Initial properties.
        properties: TechnologyProperties,
    },
    /// `TechnologyRemoved` signal.
    TechnologyRemoved {
        /// Bus generation of the watch.
        token: Token,
        /// Technology path.
        path: ObjectPath,
    },
    /// `SetProperty` or `Scan` finished.
    CallFinished {
        /// Token of the entity called.
        token: Token,
        /// Method name.
        method: &'static str,
        /// Outcome.
        result: Result<(), RemoteFault>,
    },
    /// A user action.
    Action(ConnmanAction),
}

/// A decoded ConnMan property payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Root manager properties.
    Manager(ManagerProperties),
    /// Technology properties.
    Technology(TechnologyProperties),
}

/// Work the technology registry asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnmanEffect {
    /// Follow properties of the root manager under `token`.
    OpenManager {
        /// Mirror token.
        token: Token,
    },
    /// Follow properties of a technology under `token`.
    OpenTechnology {
        /// Mirror token.
        token: Token,
        /// Technology path.
        path: ObjectPath,
    },
    /// Drop the subscription opened under `token`.
    CloseMirror {
        /// Mirror token.
        token: Token,
    },
    /// Issue `GetTechnologies`.
    EnumerateTechnologies {
        /// Bus generation.
        token: Token,
    },
    /// Subscribe to `TechnologyAdded` / `TechnologyRemoved`.
    WatchTechnologies {
        /// Bus generation.
        token: Token,
    },
    /// Drop the technology add/remove subscription.
    UnwatchTechnologies,
    /// Issue `SetProperty(name, value)`.
    SetProperty {
        /// Token of the entity written to.
        token: Token,
        /// Object path.
        path: ObjectPath,
        /// Interface the property lives on.
        interface: &'static str,
        /// Property name.
        name: &'static str,
        /// Value.
        value: bool,
    },
    /// Issue `Scan` on a technology.
    Scan {
        /// Technology token.
        token: Token,
        /// Technology path.
        path: ObjectPath,
    },
    /// Hand something to the presenter.
    Present(Presentation),
}
