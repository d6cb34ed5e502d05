use std::{collections::BTreeMap, mem};

use tracing::{debug, info, warn};

use super::{
    ConnmanAction, ConnmanEffect, ConnmanEvent, MANAGER_INTERFACE, MANAGER_PATH,
    ManagerProperties, Snapshot, TECHNOLOGY_INTERFACE, TechnologyProperties, TechnologyView,
};
use crate::services::{
    common::{Mirror, ObjectPath, Property, RemoteFault, Token, TokenSource},
    presenter::{Notice, Presentation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Absent,
    Loading(Token),
    Bound(Token),
}

#[derive(Debug)]
struct Technology {
    mirror: Mirror<TechnologyProperties>,
    shown: Option<TechnologyView>,
}

/// ConnMan's offline mode and its technology switches.
#[derive(Debug)]
pub struct TechnologyRegistry {
    service: String,
    phase: Phase,
    manager: Option<Mirror<ManagerProperties>>,
    technologies: BTreeMap<ObjectPath, Technology>,
    offline_mode: Property<Option<bool>>,
    tokens: TokenSource,
    effects: Vec<ConnmanEffect>,
}

impl TechnologyRegistry {
    /// Creates an unbound registry for the given bus name.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            phase: Phase::Absent,
            manager: None,
            technologies: BTreeMap::new(),
            offline_mode: Property::new(None),
            tokens: TokenSource::default(),
            effects: Vec::new(),
        }
    }

    /// Whether the registry is following a live ConnMan.
    pub fn is_bound(&self) -> bool {
        matches!(self.phase, Phase::Bound(_))
    }

    /// Offline mode, `None` while ConnMan is absent or has not reported it.
    pub fn offline_mode(&self) -> Property<Option<bool>> {
        self.offline_mode.clone()
    }

    /// Views of every tracked technology, ordered by path.
    pub fn technologies(&self) -> Vec<TechnologyView> {
        self.technologies
            .iter()
            .map(|(path, tech)| TechnologyView::new(path, tech.mirror.values()))
            .collect()
    }

    /// Feeds one event through the registry and returns the work it produced.
    pub fn handle(&mut self, event: ConnmanEvent) -> Vec<ConnmanEffect> {
        match event {
            ConnmanEvent::ServiceAppeared => self.on_appeared(),
            ConnmanEvent::ServiceVanished => self.on_vanished(),
            ConnmanEvent::PropertiesFetched { token, result } => self.on_fetched(token, result),
            ConnmanEvent::PropertyChanged { token, change } => self.on_changed(token, &change),
            ConnmanEvent::TechnologiesEnumerated { token, result } => {
                self.on_enumerated(token, result);
            }
            ConnmanEvent::TechnologyAdded {
                token,
                path,
                properties,
            } => {
                if self.phase == Phase::Bound(token) {
                    self.add_technology(path, properties);
                }
            }
            ConnmanEvent::TechnologyRemoved { token, path } => {
                if self.phase == Phase::Bound(token) {
                    self.remove_technology(&path);
                }
            }
            ConnmanEvent::CallFinished {
                token,
                method,
                result,
            } => {
                if let Err(fault) = result {
                    warn!(%token, method, "ConnMan call failed: {fault}");
                }
            }
            ConnmanEvent::Action(action) => self.perform(action),
        }

        mem::take(&mut self.effects)
    }

    fn on_appeared(&mut self) {
        self.reset();

        let token = self.tokens.issue();
        info!(%token, "ConnMan appeared");
        self.phase = Phase::Loading(token);
        self.manager = Some(Mirror::open(token, ManagerProperties::default()));

        self.effects.push(ConnmanEffect::OpenManager { token });
        self.effects.push(ConnmanEffect::EnumerateTechnologies { token });
        self.present(Presentation::Notify(Notice::ServiceAvailable {
            service: self.service.clone(),
        }));
    }

    fn on_vanished(&mut self) {
        info!("ConnMan vanished");
        self.reset();
        self.present(Presentation::Notify(Notice::ServiceUnavailable {
            service: self.service.clone(),
        }));
    }

    fn on_enumerated(
        &mut self,
        token: Token,
        result: Result<Vec<(ObjectPath, TechnologyProperties)>, RemoteFault>,
    ) {
        if self.phase != Phase::Loading(token) {
            debug!("Dropping stale technology enumeration");
            return;
        }

        let technologies = result.unwrap_or_else(|fault| {
            warn!("Cannot enumerate technologies: {fault}");
            Vec::new()
        });
        for (path, properties) in technologies {
            self.add_technology(path, properties);
        }

        self.phase = Phase::Bound(token);
        self.effects.push(ConnmanEffect::WatchTechnologies { token });
    }

    fn on_fetched(&mut self, token: Token, result: Result<Snapshot, RemoteFault>) {
        match result {
            Ok(snapshot) => self.apply(token, &snapshot, true),
            Err(fault) => {
                warn!(%token, "ConnMan property fetch failed: {fault}");
                if let Some(manager) = self.manager.as_mut().filter(|m| m.token() == token) {
                    manager.mark_unavailable();
                } else if let Some(tech) = self.technology_mut(token) {
                    tech.mirror.mark_unavailable();
                }
            }
        }
    }

    fn on_changed(&mut self, token: Token, change: &Snapshot) {
        self.apply(token, change, false);
    }

    fn apply(&mut self, token: Token, payload: &Snapshot, snapshot: bool) {
        match payload {
            Snapshot::Manager(props) => {
                let Some(manager) = self.manager.as_mut().filter(|m| m.token() == token) else {
                    debug!(%token, "Dropping manager update for a dead mirror");
                    return;
                };
                let changed = if snapshot {
                    manager.apply_snapshot(props)
                } else {
                    manager.apply_change(props)
                };
                let offline = manager.values().offline_mode;
                if changed {
                    if let Some(offline) = offline {
                        self.offline_mode.set(Some(offline));
                        self.present(Presentation::ShowOfflineMode(offline));
                    }
                }
            }
            Snapshot::Technology(props) => {
                let Some((path, tech)) = self
                    .technologies
                    .iter_mut()
                    .find(|(_, tech)| tech.mirror.token() == token)
                else {
                    debug!(%token, "Dropping technology update for a dead mirror");
                    return;
                };
                if snapshot {
                    tech.mirror.apply_snapshot(props);
                } else {
                    tech.mirror.apply_change(props);
                }
                let view = TechnologyView::new(path, tech.mirror.values());
                if tech.shown.as_ref() != Some(&view) {
                    tech.shown = Some(view.clone());
                    self.effects
                        .push(ConnmanEffect::Present(Presentation::ShowTechnology(view)));
                }
            }
        }
    }

    fn add_technology(&mut self, path: ObjectPath, properties: TechnologyProperties) {
        if self.technologies.contains_key(&path) {
            debug!(technology = %path, "Technology already tracked");
            return;
        }

        let token = self.tokens.issue();
        info!(technology = %path, %token, "Technology added");

        let view = TechnologyView::new(&path, &properties);
        self.effects.push(ConnmanEffect::OpenTechnology {
            token,
            path: path.clone(),
        });
        self.present(Presentation::ShowTechnology(view.clone()));
        self.technologies.insert(
            path,
            Technology {
                mirror: Mirror::open(token, properties),
                shown: Some(view),
            },
        );
    }

    fn remove_technology(&mut self, path: &str) {
        let Some(mut tech) = self.technologies.remove(path) else {
            debug!(technology = path, "Removal of untracked technology");
            return;
        };

        info!(technology = path, "Technology removed");
        if tech.mirror.close() {
            self.effects.push(ConnmanEffect::CloseMirror {
                token: tech.mirror.token(),
            });
        }
        self.present(Presentation::RemoveTechnology(path.to_string()));
    }

    fn perform(&mut self, action: ConnmanAction) {
        match action {
            ConnmanAction::SetOfflineMode(enabled) => match &self.manager {
                Some(manager) => self.effects.push(ConnmanEffect::SetProperty {
                    token: manager.token(),
                    path: MANAGER_PATH.to_string(),
                    interface: MANAGER_INTERFACE,
                    name: "OfflineMode",
                    value: enabled,
                }),
                None => warn!("ConnMan is not running, offline mode unchanged"),
            },
            ConnmanAction::SetPowered { path, powered } => match self.technologies.get(&path) {
                Some(tech) => self.effects.push(ConnmanEffect::SetProperty {
                    token: tech.mirror.token(),
                    path,
                    interface: TECHNOLOGY_INTERFACE,
                    name: "Powered",
                    value: powered,
                }),
                None => warn!(technology = %path, "Action for unknown technology"),
            },
            ConnmanAction::Scan { path } => match self.technologies.get(&path) {
                Some(tech) => self.effects.push(ConnmanEffect::Scan {
                    token: tech.mirror.token(),
                    path,
                }),
                None => warn!(technology = %path, "Action for unknown technology"),
            },
        }
    }

    fn technology_mut(&mut self, token: Token) -> Option<&mut Technology> {
        self.technologies
            .values_mut()
            .find(|tech| tech.mirror.token() == token)
    }

    fn reset(&mut self) {
        if self.is_bound() {
            self.effects.push(ConnmanEffect::UnwatchTechnologies);
        }
        self.phase = Phase::Absent;

        let paths: Vec<ObjectPath> = self.technologies.keys().cloned().collect();
        for path in paths {
            self.remove_technology(&path);
        }

        if let Some(mut manager) = self.manager.take() {
            if manager.close() {
                self.effects.push(ConnmanEffect::CloseMirror {
                    token: manager.token(),
                });
            }
        }
        self.offline_mode.set(None);
    }

    fn present(&mut self, presentation: Presentation) {
        self.effects.push(ConnmanEffect::Present(presentation));
    }
}
