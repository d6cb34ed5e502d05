use std::collections::HashMap;

use zbus::{
    Result, proxy,
    zvariant::{OwnedObjectPath, OwnedValue},
};

/// Packet data service of one modem
#[proxy(interface = "org.ofono.ConnectionManager", default_service = "org.ofono")]
pub trait ConnectionManager {
    /// Every context profile with its properties
    fn get_contexts(&self) -> Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

    /// Create a context profile of the given type
    fn add_context(&self, kind: &str) -> Result<OwnedObjectPath>;

    /// A context profile was created
    #[zbus(signal)]
    fn context_added(
        &self,
        path: OwnedObjectPath,
        properties: HashMap<String, OwnedValue>,
    ) -> Result<()>;

    /// A context profile was deleted
    #[zbus(signal)]
    fn context_removed(&self, path: OwnedObjectPath) -> Result<()>;
}
