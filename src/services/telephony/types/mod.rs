mod bearer;
mod interface;
mod pin;
mod properties;
mod status;
mod view;

pub use bearer::BearerKind;
pub use interface::Interface;
pub use pin::PinKind;
pub use properties::{
    ConnectionProperties, ContextProperties, INTERNET_CONTEXT, InterfaceRecord, ModemProperties,
    PropertyUpdate, SimProperties,
};
pub use status::{ModemStatus, aggregate_status, derive_status};
pub use view::{ConnectionView, ContextView, ModemView, SimView};
