use std::collections::HashMap;

use zbus::zvariant::{OwnedValue, Value};

use super::{BearerKind, Interface, PinKind};
use crate::services::common::{PropertySet, decode};

/// Context type oFono uses for general internet access.
pub const INTERNET_CONTEXT: &str = "internet";

/// Modem type backed by real radio hardware.
pub const HARDWARE_MODEM: &str = "hardware";

/// Locks a panel cannot unlock (phone, network, ...) count as unlocked.
fn pin_kind(value: &Value<'_>) -> Option<PinKind> {
    decode::string(value).map(|kind| PinKind::from_ofono(&kind).unwrap_or_default())
}

fn retries(value: &Value<'_>) -> Option<HashMap<PinKind, u8>> {
    let counters = decode::byte_map(value)?;
    Some(
        counters
            .into_iter()
            .filter_map(|(kind, left)| PinKind::from_ofono(&kind).map(|kind| (kind, left)))
            .collect(),
    )
}

fn bearer(value: &Value<'_>) -> Option<BearerKind> {
    decode::string(value).map(|bearer| BearerKind::from_ofono(&bearer))
}

crate::property_record! {
    /// Properties of `org.ofono.Modem`.
    pub struct ModemProperties {
        /// Radio power.
        powered: bool = "Powered" => decode::boolean,
        /// RF enabled (not in flight mode).
        online: bool = "Online" => decode::boolean,
        /// `hardware`, `hfp`, `sap` or `test`.
        kind: String = "Type" => decode::string,
        /// Friendly name, when the driver provides one.
        name: String = "Name" => decode::string,
        /// Vendor.
        manufacturer: String = "Manufacturer" => decode::string,
        /// Model.
        model: String = "Model" => decode::string,
        /// Interfaces currently exposed on the modem object.
        interfaces: Vec<String> = "Interfaces" => decode::string_list,
    }
}

impl ModemProperties {
    /// Whether the modem is real hardware rather than a handsfree or test device.
    pub fn is_hardware(&self) -> bool {
        self.kind.as_deref() == Some(HARDWARE_MODEM)
    }

    /// Whether the modem advertises the given interface.
    ///
    /// `None` when the interface list has not been reported yet.
    pub fn has_interface(&self, interface: Interface) -> Option<bool> {
        self.interfaces
            .as_ref()
            .map(|list| list.iter().any(|name| name == interface.name()))
    }

    /// Label for menus: `Name`, else `Manufacturer Model`, else the path.
    pub fn display_name(&self, path: &str) -> String {
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            return name.to_string();
        }

        let parts: Vec<&str> = [self.manufacturer.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            path.to_string()
        } else {
            parts.join(" ")
        }
    }
}

crate::property_record! {
    /// Properties of `org.ofono.SimManager`.
    pub struct SimProperties {
        /// Whether a card is inserted.
        present: bool = "Present" => decode::boolean,
        /// Credential currently blocking the card.
        pin_required: PinKind = "PinRequired" => pin_kind,
        /// Attempts left per credential kind.
        retries: HashMap<PinKind, u8> = "Retries" => retries,
    }
}

crate::property_record! {
    /// Properties of `org.ofono.ConnectionManager`.
    pub struct ConnectionProperties {
        /// Packet service attached.
        attached: bool = "Attached" => decode::boolean,
        /// Current data bearer.
        bearer: BearerKind = "Bearer" => bearer,
        /// Whether data is allowed while roaming.
        roaming_allowed: bool = "RoamingAllowed" => decode::boolean,
    }
}

crate::property_record! {
    /// Properties of `org.ofono.ConnectionContext`.
    pub struct ContextProperties {
        /// Whether the context is connected.
        active: bool = "Active" => decode::boolean,
        /// Friendly name.
        name: String = "Name" => decode::string,
        /// APN; empty until the user configures one.
        access_point_name: String = "AccessPointName" => decode::string,
        /// `internet`, `mms`, `wap` or `ims`.
        kind: String = "Type" => decode::string,
    }
}

impl ContextProperties {
    /// Whether this profile carries general internet traffic.
    pub fn is_internet(&self) -> bool {
        self.kind.as_deref() == Some(INTERNET_CONTEXT)
    }
}

/// A decoded property payload for one of the mirrored interfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyUpdate {
    /// `org.ofono.Modem` properties.
    Modem(ModemProperties),
    /// `org.ofono.SimManager` properties.
    Sim(SimProperties),
    /// `org.ofono.ConnectionManager` properties.
    Connection(ConnectionProperties),
    /// `org.ofono.ConnectionContext` properties.
    Context(ContextProperties),
}

impl PropertyUpdate {
    /// Decodes a `GetProperties` reply from the given interface.
    pub fn from_properties(interface: Interface, properties: &HashMap<String, OwnedValue>) -> Self {
        match interface {
            Interface::Modem => Self::Modem(ModemProperties::from_properties(properties)),
            Interface::SimManager => Self::Sim(SimProperties::from_properties(properties)),
            Interface::ConnectionManager => {
                Self::Connection(ConnectionProperties::from_properties(properties))
            }
            Interface::ConnectionContext => {
                Self::Context(ContextProperties::from_properties(properties))
            }
        }
    }

    /// Decodes one `PropertyChanged` signal from the given interface.
    pub fn from_change(interface: Interface, name: &str, value: &Value<'_>) -> Self {
        match interface {
            Interface::Modem => Self::Modem(ModemProperties::from_change(name, value)),
            Interface::SimManager => Self::Sim(SimProperties::from_change(name, value)),
            Interface::ConnectionManager => {
                Self::Connection(ConnectionProperties::from_change(name, value))
            }
            Interface::ConnectionContext => {
                Self::Context(ContextProperties::from_change(name, value))
            }
        }
    }

    /// Whether the payload carried no recognised property.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Modem(props) => props.is_empty(),
            Self::Sim(props) => props.is_empty(),
            Self::Connection(props) => props.is_empty(),
            Self::Context(props) => props.is_empty(),
        }
    }
}

/// A record that can be picked out of a [`PropertyUpdate`].
pub trait InterfaceRecord: PropertySet {
    /// Returns the record if `update` carries this record type.
    fn narrow(update: &PropertyUpdate) -> Option<&Self>;
}

macro_rules! interface_record {
    ($record:ty => $variant:ident) => {
        impl InterfaceRecord for $record {
            fn narrow(update: &PropertyUpdate) -> Option<&Self> {
                match update {
                    PropertyUpdate::$variant(record) => Some(record),
                    _ => None,
                }
            }
        }
    };
}

interface_record!(ModemProperties => Modem);
interface_record!(SimProperties => Sim);
interface_record!(ConnectionProperties => Connection);
interface_record!(ContextProperties => Context);

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn owned(value: Value<'_>) -> OwnedValue {
        value.try_to_owned().unwrap()
    }

    #[test]
    fn decodes_sim_manager_bag() {
        let mut counters = HashMap::new();
        counters.insert("pin", 3u8);
        counters.insert("puk", 10u8);
        counters.insert("network", 5u8);

        let mut bag = HashMap::new();
        bag.insert("Present".to_string(), owned(Value::from(true)));
        bag.insert("PinRequired".to_string(), owned(Value::from("pin")));
        bag.insert("Retries".to_string(), owned(Value::from(counters)));
        bag.insert("CardIdentifier".to_string(), owned(Value::from("8944")));

        let PropertyUpdate::Sim(sim) = PropertyUpdate::from_properties(Interface::SimManager, &bag)
        else {
            panic!("decoded into the wrong record");
        };

        assert_eq!(sim.present, Some(true));
        assert_eq!(sim.pin_required, Some(PinKind::Pin));

        let retries = sim.retries.unwrap();
        assert_eq!(retries.get(&PinKind::Pin), Some(&3));
        assert_eq!(retries.get(&PinKind::Puk), Some(&10));
        assert_eq!(retries.len(), 2);
    }

    #[test]
    fn single_change_sets_one_field() {
        let update =
            PropertyUpdate::from_change(Interface::ConnectionManager, "Bearer", &Value::from("lte"));

        assert_eq!(
            update,
            PropertyUpdate::Connection(ConnectionProperties {
                bearer: Some(BearerKind::Lte),
                ..Default::default()
            })
        );
    }

    #[test]
    fn unknown_property_names_decode_to_nothing() {
        let update = PropertyUpdate::from_change(Interface::Modem, "Serial", &Value::from("42"));
        assert!(update.is_empty());
    }

    #[test]
    fn unsupported_lock_types_read_as_unlocked() {
        let sim = SimProperties::from_change("PinRequired", &Value::from("phone"));
        assert_eq!(sim.pin_required, Some(PinKind::None));
        assert!(!sim.is_empty());
    }

    #[test]
    fn display_name_falls_back_to_vendor_then_path() {
        let named = ModemProperties {
            name: Some("Phone".to_string()),
            manufacturer: Some("Huawei".to_string()),
            ..Default::default()
        };
        assert_eq!(named.display_name("/hw_0"), "Phone");

        let vendor = ModemProperties {
            manufacturer: Some("Huawei".to_string()),
            model: Some("E3372".to_string()),
            ..Default::default()
        };
        assert_eq!(vendor.display_name("/hw_0"), "Huawei E3372");

        assert_eq!(ModemProperties::default().display_name("/hw_0"), "/hw_0");
    }

    #[test]
    fn interface_presence_is_unknown_until_reported() {
        let mut modem = ModemProperties::default();
        assert_eq!(modem.has_interface(Interface::SimManager), None);

        modem.interfaces = Some(vec!["org.ofono.SimManager".to_string()]);
        assert_eq!(modem.has_interface(Interface::SimManager), Some(true));
        assert_eq!(modem.has_interface(Interface::ConnectionManager), Some(false));
    }
}
