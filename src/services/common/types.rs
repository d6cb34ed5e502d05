/// D-Bus object path reference.
///
/// Represents a D-Bus object path as a string (e.g., "/ril_0" or "/ril_0/context1").
/// Entities are keyed by these paths; proxies are built from them on demand when a
/// call has to be made.
pub type ObjectPath = String;
