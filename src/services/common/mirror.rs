use std::collections::HashMap;

use zbus::zvariant::{OwnedValue, Value};

use super::Token;

/// A typed view of one remote property bag.
///
/// Implemented by the records declared with [`property_record!`](crate::property_record).
/// Every field is optional, so a record doubles as a partial update: a
/// single `PropertyChanged` signal decodes into a record with exactly one
/// field set.
pub trait PropertySet: Clone + Default + PartialEq + Send + 'static {
    /// Copies every field reported in `update` into `self`.
    ///
    /// Returns whether any field changed value.
    fn merge(&mut self, update: &Self) -> bool;

    /// Returns a copy of `self` with every field reported in `mask` cleared.
    fn without(&self, mask: &Self) -> Self;

    /// Whether no field is reported.
    fn is_empty(&self) -> bool;

    /// Decodes one named property into its field. Unknown names are ignored.
    fn decode(&mut self, name: &str, value: &Value<'_>);

    /// Decodes a full `GetProperties` result.
    fn from_properties(properties: &HashMap<String, OwnedValue>) -> Self {
        let mut record = Self::default();
        for (name, value) in properties {
            record.decode(name, value);
        }
        record
    }

    /// Decodes a single `PropertyChanged` payload.
    fn from_change(name: &str, value: &Value<'_>) -> Self {
        let mut record = Self::default();
        record.decode(name, value);
        record
    }
}

/// Lifecycle of a [`Mirror`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    /// Subscribed, bulk fetch outstanding.
    Pending,
    /// Bulk fetch applied.
    Ready,
    /// Bulk fetch failed; values are whatever was seeded or notified.
    Unavailable,
    /// Subscription released. Nothing is applied any more.
    Closed,
}

/// Local shadow of one remote object's properties.
///
/// The driver subscribes to change notifications before it issues the bulk
/// fetch, so notifications may be delivered around the snapshot in either
/// order. Notifications are authoritative: once a field has been written by
/// a notification, a snapshot that arrives later never overwrites it.
#[derive(Debug, Clone)]
pub struct Mirror<P: PropertySet> {
    token: Token,
    state: MirrorState,
    values: P,
    notified: P,
}

impl<P: PropertySet> Mirror<P> {
    /// Opens a mirror with values already known from an enumeration reply.
    pub fn open(token: Token, seed: P) -> Self {
        Self {
            token,
            state: MirrorState::Pending,
            values: seed,
            notified: P::default(),
        }
    }

    /// The token of the subscription backing this mirror.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MirrorState {
        self.state
    }

    /// Last known values.
    pub fn values(&self) -> &P {
        &self.values
    }

    /// Whether the subscription is still held.
    pub fn is_open(&self) -> bool {
        self.state != MirrorState::Closed
    }

    /// Applies the bulk fetch result.
    ///
    /// Returns whether any value changed.
    pub fn apply_snapshot(&mut self, snapshot: &P) -> bool {
        if !self.is_open() {
            return false;
        }

        self.state = MirrorState::Ready;
        let fresh = snapshot.without(&self.notified);
        self.values.merge(&fresh)
    }

    /// Records that the bulk fetch failed. Known values stay as they are.
    pub fn mark_unavailable(&mut self) {
        if self.state == MirrorState::Pending {
            self.state = MirrorState::Unavailable;
        }
    }

    /// Applies one change notification.
    ///
    /// Returns whether any value changed.
    pub fn apply_change(&mut self, change: &P) -> bool {
        if !self.is_open() {
            return false;
        }

        self.notified.merge(change);
        self.values.merge(change)
    }

    /// Releases the subscription.
    ///
    /// Returns `true` only the first time, so the caller emits exactly one
    /// unsubscribe for the mirror's lifetime.
    pub fn close(&mut self) -> bool {
        if self.state == MirrorState::Closed {
            return false;
        }

        self.state = MirrorState::Closed;
        true
    }
}
