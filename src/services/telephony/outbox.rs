use std::{mem, time::Duration};

use super::Effect;
use crate::services::{
    common::{Token, TokenSource},
    presenter::Presentation,
};

/// Collects the effects produced while handling one event.
///
/// Also hands out entity tokens, so every child registry that creates an
/// entity can tag it without reaching back into the fleet.
#[derive(Debug)]
pub(crate) struct Outbox {
    tokens: TokenSource,
    effects: Vec<Effect>,
    prompt_timeout: Duration,
}

impl Outbox {
    pub fn new(prompt_timeout: Duration) -> Self {
        Self {
            tokens: TokenSource::default(),
            effects: Vec::new(),
            prompt_timeout,
        }
    }

    pub fn issue(&mut self) -> Token {
        self.tokens.issue()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn present(&mut self, presentation: Presentation) {
        self.effects.push(Effect::Present(presentation));
    }

    pub fn prompt_timeout(&self) -> Duration {
        self.prompt_timeout
    }

    pub fn take(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }
}
