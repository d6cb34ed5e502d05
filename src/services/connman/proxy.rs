#![allow(missing_docs)]

use std::collections::HashMap;

use zbus::{
    Result, proxy,
    zvariant::{OwnedObjectPath, OwnedValue},
};

/// ConnMan root manager
///
/// Properties go through the generic `GetProperties` / `PropertyChanged`
/// pair; this proxy covers technology discovery.
#[proxy(
    interface = "net.connman.Manager",
    default_service = "net.connman",
    default_path = "/"
)]
pub trait ConnmanManager {
    /// Every technology with its properties
    fn get_technologies(&self) -> Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

    /// A technology became available
    #[zbus(signal)]
    fn technology_added(
        &self,
        path: OwnedObjectPath,
        properties: HashMap<String, OwnedValue>,
    ) -> Result<()>;

    /// A technology went away
    #[zbus(signal)]
    fn technology_removed(&self, path: OwnedObjectPath) -> Result<()>;
}

/// One ConnMan technology
#[proxy(interface = "net.connman.Technology", default_service = "net.connman")]
pub trait Technology {
    /// Trigger a scan for networks of this technology
    fn scan(&self) -> Result<()>;
}
