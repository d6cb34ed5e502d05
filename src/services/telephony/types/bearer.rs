use std::fmt;

use serde::Serialize;

/// Radio access technology class carrying packet data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BearerKind {
    /// No bearer, or one this crate does not rank.
    #[default]
    None,
    /// GPRS.
    Gsm,
    /// EDGE.
    Edge,
    /// UMTS.
    Umts,
    /// HSPA, including the HSDPA and HSUPA variants.
    Hspa,
    /// LTE.
    Lte,
}

impl BearerKind {
    /// Parses an oFono `Bearer` value. Unrecognised values map to `None`.
    pub fn from_ofono(value: &str) -> Self {
        match value {
            "gsm" | "gprs" => Self::Gsm,
            "edge" => Self::Edge,
            "umts" => Self::Umts,
            "hsdpa" | "hsupa" | "hspa" => Self::Hspa,
            "lte" => Self::Lte,
            _ => Self::None,
        }
    }
}

impl fmt::Display for BearerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Gsm => "GPRS",
            Self::Edge => "EDGE",
            Self::Umts => "UMTS",
            Self::Hspa => "HSPA",
            Self::Lte => "LTE",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_hspa_variants() {
        assert_eq!(BearerKind::from_ofono("hsdpa"), BearerKind::Hspa);
        assert_eq!(BearerKind::from_ofono("hsupa"), BearerKind::Hspa);
        assert_eq!(BearerKind::from_ofono("hspa"), BearerKind::Hspa);
    }

    #[test]
    fn unknown_bearers_are_unranked() {
        assert_eq!(BearerKind::from_ofono("5g-nr"), BearerKind::None);
        assert_eq!(BearerKind::from_ofono("none"), BearerKind::None);
    }
}
