/// ConnMan service errors
mod error;
/// Registry inputs and outputs
mod event;
/// ConnMan D-Bus proxies
pub mod proxy;
/// Offline mode and technology state machine
mod registry;
/// High-level service API for ConnMan.
mod service;
/// Type definitions for ConnMan properties and views.
mod types;

pub use error::ConnmanError;
pub use event::{ConnmanAction, ConnmanEffect, ConnmanEvent, Snapshot};
pub use registry::TechnologyRegistry;
pub use service::ConnmanService;
pub use types::{
    MANAGER_INTERFACE, MANAGER_PATH, ManagerProperties, TECHNOLOGY_INTERFACE, TechnologyProperties,
    TechnologyView,
};
