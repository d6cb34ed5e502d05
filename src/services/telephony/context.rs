use tracing::{debug, info, warn};

use super::{
    ContextProperties, ContextView, Effect, INTERNET_CONTEXT, Interface, PropertyUpdate,
    PropertyWrite, outbox::Outbox, subsystems,
};
use crate::services::{
    common::{Mirror, ObjectPath, RemoteFault, Token},
    presenter::{Notice, Presentation},
};

#[derive(Debug)]
struct ContextProfile {
    path: ObjectPath,
    mirror: Mirror<ContextProperties>,
}

impl ContextProfile {
    fn apn(&self) -> &str {
        self.mirror
            .values()
            .access_point_name
            .as_deref()
            .unwrap_or_default()
    }

    fn is_active(&self) -> bool {
        self.mirror.values().active.unwrap_or(false)
    }
}

/// The internet context of one modem.
///
/// Tracks the first `internet` profile the connection manager reports. When
/// there is none, asks for one to be created, at most once per absence.
#[derive(Debug)]
pub(crate) struct ContextRegistry {
    modem: ObjectPath,
    owner: Token,
    tracked: Option<ContextProfile>,
    creation_pending: bool,
}

impl ContextRegistry {
    /// Starts tracking contexts of the connection manager opened under `owner`.
    pub fn attach(modem: &str, owner: Token, outbox: &mut Outbox) -> Self {
        outbox.push(Effect::FollowContexts {
            token: owner,
            modem: modem.to_string(),
        });

        Self {
            modem: modem.to_string(),
            owner,
            tracked: None,
            creation_pending: false,
        }
    }

    pub fn creation_pending(&self) -> bool {
        self.creation_pending
    }

    pub fn tracked_path(&self) -> Option<&str> {
        self.tracked.as_ref().map(|profile| profile.path.as_str())
    }

    /// Whether `token` belongs to the tracked context's mirror.
    pub fn owns(&self, token: Token) -> bool {
        self.tracked
            .as_ref()
            .is_some_and(|profile| profile.mirror.token() == token)
    }

    pub fn on_enumerated(
        &mut self,
        result: Result<Vec<(ObjectPath, ContextProperties)>, RemoteFault>,
        outbox: &mut Outbox,
    ) -> bool {
        let contexts = match result {
            Ok(contexts) => contexts,
            Err(fault) => {
                warn!(modem = %self.modem, "Cannot list contexts: {fault}");
                Vec::new()
            }
        };

        if self.tracked.is_some() {
            return false;
        }

        match contexts.into_iter().find(|(_, props)| props.is_internet()) {
            Some((path, props)) => {
                self.adopt(path, props, outbox);
                true
            }
            None => {
                self.request_creation(outbox);
                false
            }
        }
    }

    pub fn on_added(&mut self, path: ObjectPath, props: ContextProperties, outbox: &mut Outbox) -> bool {
        if !props.is_internet() || self.tracked.is_some() {
            debug!(modem = %self.modem, context = %path, "Ignoring context");
            return false;
        }

        self.adopt(path, props, outbox);
        true
    }

    pub fn on_removed(&mut self, path: &str, outbox: &mut Outbox) -> bool {
        if self.tracked_path() != Some(path) {
            return false;
        }

        info!(modem = %self.modem, context = path, "Internet context removed");
        self.release(outbox);
        self.request_creation(outbox);
        true
    }

    pub fn on_created(&mut self, result: Result<ObjectPath, RemoteFault>, outbox: &mut Outbox) -> bool {
        self.creation_pending = false;

        match result {
            Ok(path) if self.tracked.is_none() => {
                let seed = ContextProperties {
                    kind: Some(INTERNET_CONTEXT.to_string()),
                    ..Default::default()
                };
                self.adopt(path, seed, outbox);
                true
            }
            Ok(path) => {
                debug!(modem = %self.modem, context = %path, "Created context already tracked");
                false
            }
            Err(fault) => {
                warn!(modem = %self.modem, "Cannot create internet context: {fault}");
                false
            }
        }
    }

    pub fn on_fetched(&mut self, result: &Result<PropertyUpdate, RemoteFault>) -> bool {
        self.tracked
            .as_mut()
            .is_some_and(|profile| subsystems::apply_fetched(&mut profile.mirror, result))
    }

    pub fn on_changed(&mut self, update: &PropertyUpdate) -> bool {
        self.tracked
            .as_mut()
            .is_some_and(|profile| subsystems::apply_changed(&mut profile.mirror, update))
    }

    /// Handles a click on the context entry.
    ///
    /// An unconfigured or missing context opens the wizard. Activating
    /// while the modem's RF is off only tells the user.
    pub fn toggle(&self, online: bool, label: &str, outbox: &mut Outbox) {
        let Some(profile) = self.tracked.as_ref().filter(|p| !p.apn().is_empty()) else {
            outbox.push(Effect::LaunchWizard {
                modem: self.modem.clone(),
            });
            return;
        };

        let active = profile.is_active();
        if !active && !online {
            outbox.present(Presentation::Notify(Notice::ModemOffline {
                modem: label.to_string(),
            }));
            return;
        }

        outbox.push(Effect::SetProperty {
            token: profile.mirror.token(),
            path: profile.path.clone(),
            write: PropertyWrite::Active(!active),
        });
    }

    pub fn on_toggle_finished(&self, result: &Result<(), RemoteFault>, label: &str, outbox: &mut Outbox) {
        if let Err(fault) = result {
            warn!(modem = %self.modem, "Context toggle failed: {fault}");
            outbox.present(Presentation::Notify(Notice::UnableToConnect {
                modem: self.modem.clone(),
                label: label.to_string(),
            }));
        }
    }

    pub fn close(&mut self, outbox: &mut Outbox) {
        self.release(outbox);
        self.creation_pending = false;
    }

    pub fn view(&self) -> Option<ContextView> {
        self.tracked.as_ref().map(|profile| {
            let values = profile.mirror.values();
            let apn = profile.apn().to_string();
            ContextView {
                path: profile.path.clone(),
                name: values.name.clone().unwrap_or_default(),
                configured: !apn.is_empty(),
                apn,
                active: profile.is_active(),
            }
        })
    }

    fn adopt(&mut self, path: ObjectPath, props: ContextProperties, outbox: &mut Outbox) {
        let token = outbox.issue();
        info!(modem = %self.modem, context = %path, %token, "Tracking internet context");

        outbox.push(Effect::OpenMirror {
            token,
            interface: Interface::ConnectionContext,
            path: path.clone(),
        });
        self.tracked = Some(ContextProfile {
            path,
            mirror: Mirror::open(token, props),
        });
        self.creation_pending = false;
    }

    fn release(&mut self, outbox: &mut Outbox) {
        if let Some(mut profile) = self.tracked.take() {
            if profile.mirror.close() {
                outbox.push(Effect::CloseMirror {
                    token: profile.mirror.token(),
                });
            }
        }
    }

    fn request_creation(&mut self, outbox: &mut Outbox) {
        if self.tracked.is_some() || self.creation_pending {
            return;
        }

        info!(modem = %self.modem, "No internet context, requesting one");
        self.creation_pending = true;
        outbox.push(Effect::AddContext {
            token: self.owner,
            modem: self.modem.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const MODEM: &str = "/hw_0";

    fn setup() -> (ContextRegistry, Outbox, Token) {
        let mut outbox = Outbox::new(Duration::from_secs(120));
        let owner = outbox.issue();
        let registry = ContextRegistry::attach(MODEM, owner, &mut outbox);
        outbox.take();
        (registry, outbox, owner)
    }

    fn internet(apn: &str, active: bool) -> ContextProperties {
        ContextProperties {
            active: Some(active),
            name: Some("Internet".to_string()),
            access_point_name: Some(apn.to_string()),
            kind: Some(INTERNET_CONTEXT.to_string()),
        }
    }

    fn mms() -> ContextProperties {
        ContextProperties {
            kind: Some("mms".to_string()),
            ..Default::default()
        }
    }

    fn creations(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::AddContext { .. }))
            .count()
    }

    #[test]
    fn attach_follows_contexts_under_owner_token() {
        let mut outbox = Outbox::new(Duration::from_secs(1));
        let owner = outbox.issue();
        ContextRegistry::attach(MODEM, owner, &mut outbox);

        assert_eq!(
            outbox.take(),
            vec![Effect::FollowContexts {
                token: owner,
                modem: MODEM.to_string(),
            }]
        );
    }

    #[test]
    fn first_internet_context_wins() {
        let (mut registry, mut outbox, _) = setup();

        registry.on_enumerated(
            Ok(vec![
                ("/hw_0/context1".to_string(), mms()),
                ("/hw_0/context2".to_string(), internet("apn.a", false)),
                ("/hw_0/context3".to_string(), internet("apn.b", false)),
            ]),
            &mut outbox,
        );

        assert_eq!(registry.tracked_path(), Some("/hw_0/context2"));
        assert_eq!(creations(&outbox.take()), 0);
    }

    #[test]
    fn empty_listing_requests_exactly_one_creation() {
        let (mut registry, mut outbox, owner) = setup();

        registry.on_enumerated(Ok(Vec::new()), &mut outbox);
        registry.on_added("/hw_0/mms".to_string(), mms(), &mut outbox);
        registry.on_removed("/hw_0/unknown", &mut outbox);

        let effects = outbox.take();
        assert_eq!(creations(&effects), 1);
        assert!(effects.contains(&Effect::AddContext {
            token: owner,
            modem: MODEM.to_string(),
        }));
        assert!(registry.creation_pending());
    }

    #[test]
    fn enumeration_fault_also_requests_creation() {
        let (mut registry, mut outbox, _) = setup();

        registry.on_enumerated(
            Err(RemoteFault::new("GetContexts", "org.ofono.Error.Failed")),
            &mut outbox,
        );

        assert_eq!(creations(&outbox.take()), 1);
    }

    #[test]
    fn added_context_fills_the_slot_and_clears_pending() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_enumerated(Ok(Vec::new()), &mut outbox);

        assert!(registry.on_added("/hw_0/context1".to_string(), internet("", false), &mut outbox));
        assert!(!registry.creation_pending());

        let late = registry.on_created(Ok("/hw_0/context1".to_string()), &mut outbox);
        assert!(!late);
        assert_eq!(registry.tracked_path(), Some("/hw_0/context1"));
    }

    #[test]
    fn creation_reply_is_adopted_when_signal_is_missed() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_enumerated(Ok(Vec::new()), &mut outbox);
        outbox.take();

        registry.on_created(Ok("/hw_0/context7".to_string()), &mut outbox);

        assert_eq!(registry.tracked_path(), Some("/hw_0/context7"));
        assert!(
            outbox
                .take()
                .iter()
                .any(|effect| matches!(effect, Effect::OpenMirror { path, .. } if path == "/hw_0/context7"))
        );
    }

    #[test]
    fn creation_fault_is_not_retried_immediately() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_enumerated(Ok(Vec::new()), &mut outbox);
        outbox.take();

        registry.on_created(
            Err(RemoteFault::new("AddContext", "org.ofono.Error.NotAttached")),
            &mut outbox,
        );

        assert!(!registry.creation_pending());
        assert_eq!(creations(&outbox.take()), 0);
    }

    #[test]
    fn removal_of_tracked_context_requests_one_replacement() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_added("/hw_0/context1".to_string(), internet("apn", true), &mut outbox);
        outbox.take();

        assert!(registry.on_removed("/hw_0/context1", &mut outbox));
        assert!(!registry.on_removed("/hw_0/context1", &mut outbox));

        let effects = outbox.take();
        assert_eq!(creations(&effects), 1);
        assert!(matches!(effects[0], Effect::CloseMirror { .. }));
        assert_eq!(registry.tracked_path(), None);
    }

    #[test]
    fn toggle_without_apn_opens_the_wizard() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_added("/hw_0/context1".to_string(), internet("", false), &mut outbox);
        outbox.take();

        registry.toggle(true, "Modem", &mut outbox);

        assert_eq!(
            outbox.take(),
            vec![Effect::LaunchWizard {
                modem: MODEM.to_string(),
            }]
        );
    }

    #[test]
    fn toggle_while_offline_only_notifies() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_added("/hw_0/context1".to_string(), internet("apn", false), &mut outbox);
        outbox.take();

        registry.toggle(false, "Modem", &mut outbox);

        assert_eq!(
            outbox.take(),
            vec![Effect::Present(Presentation::Notify(Notice::ModemOffline {
                modem: "Modem".to_string(),
            }))]
        );
    }

    #[test]
    fn toggle_flips_active_and_fault_offers_wizard() {
        let (mut registry, mut outbox, _) = setup();
        registry.on_added("/hw_0/context1".to_string(), internet("apn", true), &mut outbox);
        outbox.take();

        registry.toggle(false, "Modem", &mut outbox);
        let effects = outbox.take();
        assert!(matches!(
            effects.as_slice(),
            [Effect::SetProperty {
                write: PropertyWrite::Active(false),
                ..
            }]
        ));

        registry.on_toggle_finished(
            &Err(RemoteFault::new("SetProperty", "org.ofono.Error.Failed")),
            "Modem",
            &mut outbox,
        );
        assert!(matches!(
            outbox.take().as_slice(),
            [Effect::Present(Presentation::Notify(Notice::UnableToConnect { .. }))]
        ));
    }
}
