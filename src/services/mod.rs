/// Shared mirroring and D-Bus plumbing
pub mod common;
/// ConnMan technology service
pub mod connman;
/// Render sink the registries report to
pub mod presenter;
/// oFono modem service
pub mod telephony;

pub use connman::{ConnmanService, TechnologyRegistry};
pub use presenter::{Notice, Presentation, Presenter, TracingPresenter};
pub use telephony::{FleetRegistry, ModemStatus, TelephonyService};
