use std::collections::HashMap;

use zbus::{
    Result, proxy,
    zvariant::{OwnedObjectPath, OwnedValue},
};

/// oFono root manager
///
/// Lists modems and announces them coming and going.
#[proxy(
    interface = "org.ofono.Manager",
    default_service = "org.ofono",
    default_path = "/"
)]
pub trait OfonoManager {
    /// Every modem with its `org.ofono.Modem` properties
    fn get_modems(&self) -> Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

    /// A modem was registered
    #[zbus(signal)]
    fn modem_added(
        &self,
        path: OwnedObjectPath,
        properties: HashMap<String, OwnedValue>,
    ) -> Result<()>;

    /// A modem was unregistered
    #[zbus(signal)]
    fn modem_removed(&self, path: OwnedObjectPath) -> Result<()>;
}
