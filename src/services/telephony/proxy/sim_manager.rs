use zbus::{Result, proxy};

/// SIM card of one modem
///
/// Properties are followed through the generic `GetProperties` /
/// `PropertyChanged` pair; this proxy only carries the unlock calls.
#[proxy(interface = "org.ofono.SimManager", default_service = "org.ofono")]
pub trait SimManager {
    /// Answer a `pin` / `pin2` challenge
    fn enter_pin(&self, kind: &str, pin: &str) -> Result<()>;

    /// Answer a `puk` / `puk2` challenge and set a new PIN
    fn reset_pin(&self, kind: &str, puk: &str, new_pin: &str) -> Result<()>;
}
