//! oFono D-Bus proxy definitions.
//!
//! `org.ofono.Modem` and `org.ofono.ConnectionContext` only need the generic
//! `GetProperties` / `SetProperty` / `PropertyChanged` triple and are driven
//! through the shared remote helpers instead.

#![allow(missing_docs)]
mod connection_manager;
mod manager;
mod sim_manager;

pub use connection_manager::*;
pub use manager::*;
pub use sim_manager::*;
