//! Per-modem subsystems opened when the modem advertises their interface.

mod connection;
mod sim;

pub(crate) use connection::ConnectionSubsystem;
pub(crate) use sim::SimSubsystem;

use tracing::warn;

use super::{InterfaceRecord, PropertyUpdate};
use crate::services::common::{Mirror, RemoteFault};

/// Applies a bulk fetch result to a mirror.
///
/// Returns whether any value changed. A payload for another interface is
/// ignored.
pub(crate) fn apply_fetched<P: InterfaceRecord>(
    mirror: &mut Mirror<P>,
    result: &Result<PropertyUpdate, RemoteFault>,
) -> bool {
    match result {
        Ok(update) => P::narrow(update).is_some_and(|snapshot| mirror.apply_snapshot(snapshot)),
        Err(fault) => {
            warn!(token = %mirror.token(), "Property fetch failed: {fault}");
            mirror.mark_unavailable();
            false
        }
    }
}

/// Applies one change notification to a mirror.
pub(crate) fn apply_changed<P: InterfaceRecord>(mirror: &mut Mirror<P>, update: &PropertyUpdate) -> bool {
    P::narrow(update).is_some_and(|change| mirror.apply_change(change))
}
