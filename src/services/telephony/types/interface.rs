/// oFono interfaces this crate mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interface {
    /// `org.ofono.Modem`
    Modem,
    /// `org.ofono.SimManager`
    SimManager,
    /// `org.ofono.ConnectionManager`
    ConnectionManager,
    /// `org.ofono.ConnectionContext`
    ConnectionContext,
}

impl Interface {
    /// Fully qualified D-Bus interface name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Modem => "org.ofono.Modem",
            Self::SimManager => "org.ofono.SimManager",
            Self::ConnectionManager => "org.ofono.ConnectionManager",
            Self::ConnectionContext => "org.ofono.ConnectionContext",
        }
    }
}
