/// Internet context tracking and creation
mod context;
/// SIM credential prompts and validation
mod credential;
/// Effect execution against the system bus
mod dispatch;
/// Telephony service errors
mod error;
/// Registry inputs and outputs
mod event;
/// Modem fleet state machine
mod fleet;
/// Per-modem state and derived status
mod modem;
mod outbox;
/// oFono D-Bus proxies
pub mod proxy;
/// High-level service API for the modem fleet.
mod service;
/// SIM and connection manager mirrors
mod subsystems;
/// Type definitions for oFono properties, states and views.
mod types;

pub use credential::{Credential, CredentialRequest, validate};
pub use error::TelephonyError;
pub use event::{Effect, Event, PropertyWrite, UserAction};
pub use fleet::FleetRegistry;
pub use service::TelephonyService;
pub use types::*;
