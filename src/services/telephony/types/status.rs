use std::fmt;

use serde::Serialize;

use super::{BearerKind, PinKind};

/// Ranked state of a modem.
///
/// The declaration order is the ranking used for the fleet-wide indicator:
/// a later variant always wins over an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModemStatus {
    /// Radio powered off, or no modem at all.
    #[default]
    Disabled,
    /// No SIM card inserted.
    NoSim,
    /// SIM locked behind a PIN.
    PinRequired,
    /// SIM blocked behind a PUK.
    PukRequired,
    /// SIM unlocked, packet service not attached.
    SimReady,
    /// Attached on an unranked bearer.
    Available,
    /// Attached on GPRS.
    Gsm,
    /// Attached on EDGE.
    Edge,
    /// Attached on UMTS.
    Umts,
    /// Attached on HSPA.
    Hspa,
    /// Attached on LTE.
    Lte,
}

impl ModemStatus {
    /// Freedesktop icon name for a panel indicator.
    pub fn icon_name(self) -> &'static str {
        match self {
            Self::Disabled => "network-cellular-disabled-symbolic",
            Self::NoSim => "network-cellular-no-route-symbolic",
            Self::PinRequired | Self::PukRequired => "network-cellular-acquiring-symbolic",
            Self::SimReady => "network-cellular-offline-symbolic",
            Self::Available | Self::Gsm => "network-cellular-gprs-symbolic",
            Self::Edge => "network-cellular-edge-symbolic",
            Self::Umts => "network-cellular-3g-symbolic",
            Self::Hspa => "network-cellular-4g-symbolic",
            Self::Lte => "network-cellular-connected-symbolic",
        }
    }
}

impl fmt::Display for ModemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Disabled => "disabled",
            Self::NoSim => "no SIM",
            Self::PinRequired => "PIN required",
            Self::PukRequired => "PUK required",
            Self::SimReady => "SIM ready",
            Self::Available => "available",
            Self::Gsm => "GSM",
            Self::Edge => "EDGE",
            Self::Umts => "UMTS",
            Self::Hspa => "HSPA",
            Self::Lte => "LTE",
        };
        f.write_str(label)
    }
}

/// Derives a modem's status from its power, SIM and packet-service state.
///
/// The first matching rule wins: power, then SIM presence, then a pending
/// credential, then the attached bearer.
pub fn derive_status(
    powered: bool,
    sim_present: bool,
    pin: PinKind,
    attached: bool,
    bearer: BearerKind,
) -> ModemStatus {
    if !powered {
        return ModemStatus::Disabled;
    }

    if !sim_present {
        return ModemStatus::NoSim;
    }

    match pin {
        PinKind::Pin | PinKind::Pin2 => return ModemStatus::PinRequired,
        PinKind::Puk | PinKind::Puk2 => return ModemStatus::PukRequired,
        PinKind::None => {}
    }

    if !attached {
        return ModemStatus::SimReady;
    }

    match bearer {
        BearerKind::Gsm => ModemStatus::Gsm,
        BearerKind::Edge => ModemStatus::Edge,
        BearerKind::Umts => ModemStatus::Umts,
        BearerKind::Hspa => ModemStatus::Hspa,
        BearerKind::Lte => ModemStatus::Lte,
        BearerKind::None => ModemStatus::Available,
    }
}

/// Best status across a set of modems; `Disabled` when there are none.
pub fn aggregate_status<I>(statuses: I) -> ModemStatus
where
    I: IntoIterator<Item = ModemStatus>,
{
    statuses.into_iter().max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIN_KINDS: [PinKind; 5] = [
        PinKind::None,
        PinKind::Pin,
        PinKind::Puk,
        PinKind::Pin2,
        PinKind::Puk2,
    ];

    const BEARERS: [BearerKind; 6] = [
        BearerKind::None,
        BearerKind::Gsm,
        BearerKind::Edge,
        BearerKind::Umts,
        BearerKind::Hspa,
        BearerKind::Lte,
    ];

    #[test]
    fn power_check_short_circuits() {
        let status = derive_status(false, true, PinKind::None, true, BearerKind::Lte);
        assert_eq!(status, ModemStatus::Disabled);
    }

    #[test]
    fn hsupa_bearer_ranks_as_hspa() {
        let bearer = BearerKind::from_ofono("hsupa");
        let status = derive_status(true, true, PinKind::None, true, bearer);
        assert_eq!(status, ModemStatus::Hspa);
    }

    #[test]
    fn sim_absence_precedes_pin_check() {
        let status = derive_status(true, false, PinKind::Puk, false, BearerKind::None);
        assert_eq!(status, ModemStatus::NoSim);
    }

    #[test]
    fn pin_kinds_map_to_their_lock_status() {
        assert_eq!(
            derive_status(true, true, PinKind::Pin2, true, BearerKind::Lte),
            ModemStatus::PinRequired
        );
        assert_eq!(
            derive_status(true, true, PinKind::Puk2, true, BearerKind::Lte),
            ModemStatus::PukRequired
        );
    }

    #[test]
    fn unattached_ready_sim_is_sim_ready() {
        let status = derive_status(true, true, PinKind::None, false, BearerKind::Lte);
        assert_eq!(status, ModemStatus::SimReady);
    }

    #[test]
    fn unranked_bearer_is_available() {
        let status = derive_status(true, true, PinKind::None, true, BearerKind::None);
        assert_eq!(status, ModemStatus::Available);
    }

    #[test]
    fn every_input_follows_the_priority_table() {
        for powered in [false, true] {
            for sim_present in [false, true] {
                for pin in PIN_KINDS {
                    for attached in [false, true] {
                        for bearer in BEARERS {
                            let status = derive_status(powered, sim_present, pin, attached, bearer);

                            if !powered {
                                assert_eq!(status, ModemStatus::Disabled);
                            } else if !sim_present {
                                assert_eq!(status, ModemStatus::NoSim);
                            } else if pin.is_required() {
                                assert!(matches!(
                                    status,
                                    ModemStatus::PinRequired | ModemStatus::PukRequired
                                ));
                            } else if !attached {
                                assert_eq!(status, ModemStatus::SimReady);
                            } else {
                                assert!(status >= ModemStatus::Available);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn ranking_matches_declaration_order() {
        assert!(ModemStatus::Disabled < ModemStatus::NoSim);
        assert!(ModemStatus::NoSim < ModemStatus::PinRequired);
        assert!(ModemStatus::PinRequired < ModemStatus::PukRequired);
        assert!(ModemStatus::PukRequired < ModemStatus::SimReady);
        assert!(ModemStatus::SimReady < ModemStatus::Available);
        assert!(ModemStatus::Available < ModemStatus::Gsm);
        assert!(ModemStatus::Umts < ModemStatus::Hspa);
        assert!(ModemStatus::Hspa < ModemStatus::Lte);
    }

    #[test]
    fn aggregate_of_nothing_is_disabled() {
        assert_eq!(aggregate_status([]), ModemStatus::Disabled);
        assert_eq!(
            aggregate_status([ModemStatus::NoSim, ModemStatus::Umts, ModemStatus::SimReady]),
            ModemStatus::Umts
        );
    }
}
