use std::fmt;

use serde::Serialize;

/// Credential a SIM card is asking for.
///
/// oFono reports more exotic lock types (phone, network, corporate) as
/// well. [`PinKind::from_ofono`] does not parse them, and a `PinRequired`
/// carrying one is read as [`PinKind::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    /// Nothing required, the SIM is unlocked.
    #[default]
    None,
    /// SIM PIN.
    Pin,
    /// SIM PIN unblock key.
    Puk,
    /// Secondary PIN.
    Pin2,
    /// Secondary PIN unblock key.
    Puk2,
}

impl PinKind {
    /// Parses an oFono `PinRequired` / `Retries` key.
    pub fn from_ofono(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "pin" => Some(Self::Pin),
            "puk" => Some(Self::Puk),
            "pin2" => Some(Self::Pin2),
            "puk2" => Some(Self::Puk2),
            _ => None,
        }
    }

    /// The oFono spelling, as passed to `EnterPin` / `ResetPin`.
    pub fn as_ofono(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pin => "pin",
            Self::Puk => "puk",
            Self::Pin2 => "pin2",
            Self::Puk2 => "puk2",
        }
    }

    /// Whether this kind blocks SIM access.
    pub fn is_required(self) -> bool {
        self != Self::None
    }

    /// Whether this is an unblock key that also sets a new PIN.
    pub fn is_unblock_key(self) -> bool {
        matches!(self, Self::Puk | Self::Puk2)
    }
}

impl fmt::Display for PinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Pin => write!(f, "PIN"),
            Self::Puk => write!(f, "PUK"),
            Self::Pin2 => write!(f, "PIN2"),
            Self::Puk2 => write!(f, "PUK2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_kinds() {
        assert_eq!(PinKind::from_ofono("pin"), Some(PinKind::Pin));
        assert_eq!(PinKind::from_ofono("puk2"), Some(PinKind::Puk2));
        assert_eq!(PinKind::from_ofono("none"), Some(PinKind::None));
        assert_eq!(PinKind::from_ofono("phone"), None);
    }

    #[test]
    fn unblock_keys_are_puks() {
        assert!(PinKind::Puk.is_unblock_key());
        assert!(PinKind::Puk2.is_unblock_key());
        assert!(!PinKind::Pin.is_unblock_key());
        assert!(!PinKind::None.is_required());
    }
}
