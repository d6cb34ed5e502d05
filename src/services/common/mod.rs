//! Common utilities and abstractions for services

/// Typed property records decoded from D-Bus property bags
#[macro_use]
mod macros;
/// Property value decoders shared by the record definitions
pub mod decode;
/// Remote call failures
pub mod fault;
/// Local shadows of remote property bags
pub mod mirror;
/// Reactive property system for fine-grained state updates
pub mod property;
/// Generic D-Bus plumbing shared by the service drivers
pub(crate) mod remote;
/// Abortable background tasks keyed by entity
pub(crate) mod tasks;
/// Entity liveness tokens
pub mod token;
/// Shared type aliases
pub mod types;

pub use fault::RemoteFault;
pub use mirror::{Mirror, MirrorState, PropertySet};
pub use property::Property;
pub use token::{Token, TokenSource};
pub use types::ObjectPath;
